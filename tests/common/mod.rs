#![allow(dead_code)]

use logsift::oracle::{Attachment, Oracle, OracleError, OracleResponse};
use std::collections::VecDeque;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&str) -> Result<String, OracleError> + Send + Sync>;

/// In-memory oracle: answers from a queue, or from a function of the prompt.
/// Every prompt and attachment name is recorded.
pub struct ScriptedOracle {
    queue: Mutex<VecDeque<Result<String, OracleError>>>,
    responder: Option<Responder>,
    pub prompts: Mutex<Vec<String>>,
    pub attachments: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            responder: None,
            prompts: Mutex::new(Vec::new()),
            attachments: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let o = Self::new();
        {
            let mut q = o.queue.lock().unwrap();
            for r in responses {
                q.push_back(Ok(r.into()));
            }
        }
        o
    }

    pub fn with_responder<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<String, OracleError> + Send + Sync + 'static,
    {
        let mut o = Self::new();
        o.responder = Some(Box::new(f));
        o
    }

    pub fn push_error(&self, e: OracleError) {
        self.queue.lock().unwrap().push_back(Err(e));
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

impl Oracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    fn send_and_wait(&self, prompt: &str, attachments: &[Attachment]) -> Result<OracleResponse, OracleError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.attachments.lock().unwrap().extend(attachments.iter().map(|a| a.display_name.clone()));
        if let Some(f) = &self.responder {
            return f(prompt).map(OracleResponse::new);
        }
        match self.queue.lock().unwrap().pop_front() {
            Some(r) => r.map(OracleResponse::new),
            None => Err(OracleError::Transport("no scripted response left".into())),
        }
    }
}

pub fn analysis_text(patterns: &[&str], anomalies: &[&str], root_causes: &[&str], summary: &str) -> String {
    let mut s = String::from("## PATTERNS\n");
    for p in patterns {
        s.push_str(&format!("- {p}\n"));
    }
    s.push_str("\n## ANOMALIES\n");
    for a in anomalies {
        s.push_str(&format!("- {a}\n"));
    }
    s.push_str("\n## ROOT CAUSES\n");
    for r in root_causes {
        s.push_str(&format!("- {r}\n"));
    }
    s.push_str(&format!("\n## SUMMARY\n{summary}\n"));
    s
}
