//! Boundary to the external language-model service.
//!
//! The service is a black box: a prompt (plus optional attachments) goes in,
//! free-form text comes out. [`CommandOracle`] reaches it through any command
//! line client that reads a prompt on stdin and answers on stdout.

use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle transport failed: {0}")]
    Transport(String),
    #[error("oracle returned an empty response")]
    EmptyResponse,
    #[error("oracle command exited with {status}: {stderr}")]
    Command { status: String, stderr: String },
    #[error("oracle io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    Path(PathBuf),
    Buffer(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub source: AttachmentSource,
    pub display_name: String,
}

impl Attachment {
    pub fn path(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self { source: AttachmentSource::Path(path.into()), display_name: display_name.into() }
    }

    pub fn buffer(bytes: impl Into<Vec<u8>>, display_name: impl Into<String>) -> Self {
        Self { source: AttachmentSource::Buffer(bytes.into()), display_name: display_name.into() }
    }

    /// Attachment content as text (lossy for non UTF-8 bytes).
    pub fn read_text(&self) -> Result<String, OracleError> {
        match &self.source {
            AttachmentSource::Path(p) => {
                let bytes = std::fs::read(p)?;
                Ok(String::from_utf8_lossy(&bytes).into_owned())
            }
            AttachmentSource::Buffer(b) => Ok(String::from_utf8_lossy(b).into_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleResponse {
    pub content: String,
}

impl OracleResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

pub trait Oracle: Send + Sync {
    fn name(&self) -> &str {
        "oracle"
    }

    fn send_and_wait(&self, prompt: &str, attachments: &[Attachment]) -> Result<OracleResponse, OracleError>;

    /// Like [`send_and_wait`](Self::send_and_wait) but reports text deltas as they arrive.
    /// Only the returned response is complete; deltas are for progress display.
    fn send_streaming(
        &self,
        prompt: &str,
        attachments: &[Attachment],
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<OracleResponse, OracleError> {
        let response = self.send_and_wait(prompt, attachments)?;
        on_delta(&response.content);
        Ok(response)
    }
}

/// Inline attachments after the prompt as delimited blocks.
pub fn render_prompt_with_attachments(prompt: &str, attachments: &[Attachment]) -> Result<String, OracleError> {
    let mut out = String::from(prompt);
    for a in attachments {
        let text = a.read_text()?;
        out.push_str(&format!("\n\n--- attachment: {} ---\n", a.display_name));
        out.push_str(&text);
        if !text.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("--- end of {} ---\n", a.display_name));
    }
    Ok(out)
}

/// Runs an external program per request: prompt on stdin, response on stdout.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
}

impl CommandOracle {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    /// Split a shell-like command line on whitespace (no quoting support).
    pub fn from_command_line(cmd: &str) -> Option<Self> {
        let mut parts = cmd.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }

    fn run(
        &self,
        prompt: &str,
        attachments: &[Attachment],
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<OracleResponse, OracleError> {
        let input = render_prompt_with_attachments(prompt, attachments)?;
        debug!(program = %self.program, prompt_bytes = input.len(), "spawning oracle command");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OracleError::Transport(format!("failed to start '{}': {e}", self.program)))?;

        let mut stdin = child.stdin.take().ok_or_else(|| OracleError::Transport("stdin not captured".into()))?;
        // stdout must be drained while stdin is still being written
        let writer = thread::spawn(move || -> std::io::Result<()> {
            stdin.write_all(input.as_bytes())?;
            Ok(())
        });
        let mut stderr = child.stderr.take().ok_or_else(|| OracleError::Transport("stderr not captured".into()))?;
        let err_reader = thread::spawn(move || {
            let mut s = String::new();
            let _ = stderr.read_to_string(&mut s);
            s
        });

        let stdout = child.stdout.take().ok_or_else(|| OracleError::Transport("stdout not captured".into()))?;
        let mut content = String::new();
        let mut reader = BufReader::new(stdout);
        let mut line: Vec<u8> = Vec::new();
        let read_result = loop {
            line.clear();
            match reader.read_until(b'\n', &mut line) {
                Ok(0) => break Ok(()),
                Ok(_) => {
                    let text = String::from_utf8_lossy(&line);
                    on_delta(&text);
                    content.push_str(&text);
                }
                Err(e) => break Err(e),
            }
        };
        if let Err(e) = read_result {
            let _ = child.kill();
            let _ = child.wait();
            let _ = writer.join();
            let _ = err_reader.join();
            return Err(OracleError::Io(e));
        }

        let status = child.wait()?;
        let stderr_text = err_reader.join().unwrap_or_default();
        match writer.join() {
            Ok(Ok(())) => {}
            // the child may legitimately stop reading early
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(OracleError::Io(e)),
            Err(_) => return Err(OracleError::Transport("stdin writer panicked".into())),
        }
        if !status.success() {
            return Err(OracleError::Command { status: status.to_string(), stderr: stderr_text.trim().to_string() });
        }
        let response = OracleResponse::new(content);
        if response.is_blank() {
            return Err(OracleError::EmptyResponse);
        }
        Ok(response)
    }
}

impl Oracle for CommandOracle {
    fn name(&self) -> &str {
        &self.program
    }

    fn send_and_wait(&self, prompt: &str, attachments: &[Attachment]) -> Result<OracleResponse, OracleError> {
        self.run(prompt, attachments, &mut |_| {})
    }

    fn send_streaming(
        &self,
        prompt: &str,
        attachments: &[Attachment],
        on_delta: &mut dyn FnMut(&str),
    ) -> Result<OracleResponse, OracleError> {
        self.run(prompt, attachments, on_delta)
    }
}
