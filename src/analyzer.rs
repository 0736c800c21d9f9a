use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::aggregate::aggregate_chunks;
use crate::chunking::{needs_chunking, split_into_chunks};
use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::exact_match::{find_exact_matches, FileContent};
use crate::issues::{collect_issue_suggestions, parse_issue_queries, IssueRecord, IssueSearch};
use crate::oracle::{Attachment, Oracle, OracleError};
use crate::pool::run_bounded;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::prompts;
use crate::sections::parse_analysis;
use crate::similarity::aggregate_similarity;
use crate::types::{
    ChunkAnalysisResult, ChunkDescriptor, ExactLineMatch, FileAnalysisResult, LogAnalysisResult, MultiFileAnalysis,
};

const MAX_ISSUE_QUERIES: usize = 5;

/// A log file loaded for analysis.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub filename: String,
    pub size: u64,
    pub content: String,
}

/// Read `path` as (lossy) UTF-8; a missing path is [`AnalysisError::InputNotFound`].
pub fn load_file(path: &Path) -> Result<LoadedFile, AnalysisError> {
    if !path.exists() {
        return Err(AnalysisError::InputNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(LoadedFile { filename, size: bytes.len() as u64, content: String::from_utf8_lossy(&bytes).into_owned() })
}

/// Drives the oracle and the local components: chunking, parsing,
/// consolidation, cross-file comparison.
pub struct LogAnalyzer {
    config: AnalyzerConfig,
    oracle: Option<Arc<dyn Oracle>>,
}

impl LogAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config, oracle: None }
    }

    pub fn with_oracle(mut self, oracle: Arc<dyn Oracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    fn oracle(&self) -> Result<&dyn Oracle, AnalysisError> {
        self.oracle.as_deref().ok_or(AnalysisError::NotInitialized)
    }

    pub fn analyze_file(&self, path: &Path, progress: &dyn ProgressSink) -> Result<FileAnalysisResult, AnalysisError> {
        let file = load_file(path)?;
        let analysis = self.analyze_content(&file.filename, &file.content, progress)?;
        Ok(FileAnalysisResult { filename: file.filename, file_size: file.size, analysis })
    }

    /// Analyze one log. Content that fits a single chunk is sent whole as an
    /// attachment; larger content is split and analyzed chunk by chunk.
    pub fn analyze_content(
        &self,
        name: &str,
        content: &str,
        progress: &dyn ProgressSink,
    ) -> Result<LogAnalysisResult, AnalysisError> {
        let oracle = self.oracle()?;
        if content.trim().is_empty() {
            return Err(AnalysisError::EmptyInput(name.to_string()));
        }
        let started = Instant::now();
        progress.on_progress(&ProgressEvent::AnalysisStarted { name: name.to_string(), bytes: content.len() });

        let result = if needs_chunking(content, &self.config.chunk_limits) {
            self.analyze_chunked(oracle, name, content, progress)?
        } else {
            self.analyze_single(oracle, name, content, progress)?
        };

        progress.on_progress(&ProgressEvent::Completed { name: name.to_string(), elapsed: started.elapsed() });
        Ok(result)
    }

    fn analyze_single(
        &self,
        oracle: &dyn Oracle,
        name: &str,
        content: &str,
        progress: &dyn ProgressSink,
    ) -> Result<LogAnalysisResult, AnalysisError> {
        let prompt = prompts::analysis_prompt(name);
        let attachment = Attachment::buffer(content.as_bytes(), name);
        let response = oracle.send_streaming(&prompt, &[attachment], &mut |delta| {
            progress.on_progress(&ProgressEvent::ResponseDelta { text: delta.to_string() })
        })?;
        if response.is_blank() {
            return Err(OracleError::EmptyResponse.into());
        }
        let parsed = parse_analysis(&response.content);
        if parsed.is_empty() {
            debug!(input = %name, "response had no recognizable sections");
        }
        Ok(parsed)
    }

    fn analyze_chunked(
        &self,
        oracle: &dyn Oracle,
        name: &str,
        content: &str,
        progress: &dyn ProgressSink,
    ) -> Result<LogAnalysisResult, AnalysisError> {
        let chunks = split_into_chunks(content, &self.config.chunk_limits);
        let total = chunks.len();
        info!(input = %name, chunks = total, concurrency = self.config.concurrency, "analyzing in chunks");
        progress.on_progress(&ProgressEvent::ChunkingPlanned { name: name.to_string(), chunks: total });

        let analyze_one = |i: usize, chunk: &ChunkDescriptor| -> Result<ChunkAnalysisResult, AnalysisError> {
            progress.on_progress(&ProgressEvent::ChunkStarted { chunk_id: i, total, line_range: chunk.line_range });
            let started = Instant::now();
            // a trailing newline can leave a chunk holding only an empty line
            if chunk.content.trim().is_empty() {
                progress.on_progress(&ProgressEvent::ChunkCompleted { chunk_id: i, total, elapsed: started.elapsed() });
                return Ok(ChunkAnalysisResult::from_analysis(i, chunk, LogAnalysisResult::default()));
            }
            let prompt = prompts::chunk_prompt(name, chunk, i, total);
            let response = oracle.send_and_wait(&prompt, &[])?;
            if response.is_blank() {
                return Err(OracleError::EmptyResponse.into());
            }
            let analysis = parse_analysis(&response.content);
            progress.on_progress(&ProgressEvent::ChunkCompleted { chunk_id: i, total, elapsed: started.elapsed() });
            Ok(ChunkAnalysisResult::from_analysis(i, chunk, analysis))
        };
        // index-ordered, fails as a unit
        let results = run_bounded(&chunks, self.config.concurrency, analyze_one)?;

        Ok(aggregate_chunks(name, &results, Some(oracle), progress))
    }

    /// Analyze every file, then look for what they share: oracle-derived
    /// shared findings plus exact line matches across the raw contents.
    pub fn compare_files<P: AsRef<Path>>(
        &self,
        paths: &[P],
        progress: &dyn ProgressSink,
    ) -> Result<MultiFileAnalysis, AnalysisError> {
        let oracle = self.oracle()?;
        let loaded = paths.iter().map(|p| load_file(p.as_ref())).collect::<Result<Vec<_>, _>>()?;

        let mut files = Vec::with_capacity(loaded.len());
        for f in &loaded {
            let analysis = self.analyze_content(&f.filename, &f.content, progress)?;
            files.push(FileAnalysisResult { filename: f.filename.clone(), file_size: f.size, analysis });
        }

        progress.on_progress(&ProgressEvent::ComparisonStarted { files: files.len() });
        let mut similarity = aggregate_similarity(&files, Some(oracle), self.config.similarity_min_files);
        let matches = self.exact_matches(&loaded);
        similarity.exact_matches = (!matches.is_empty()).then_some(matches);
        Ok(MultiFileAnalysis { files, similarity })
    }

    /// Exact line matches between files on disk; needs no oracle.
    pub fn match_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<ExactLineMatch>, AnalysisError> {
        let loaded = paths.iter().map(|p| load_file(p.as_ref())).collect::<Result<Vec<_>, _>>()?;
        Ok(self.exact_matches(&loaded))
    }

    fn exact_matches(&self, loaded: &[LoadedFile]) -> Vec<ExactLineMatch> {
        if loaded.len() < 2 {
            return Vec::new();
        }
        let inputs: Vec<FileContent<'_>> =
            loaded.iter().map(|f| FileContent { filename: &f.filename, content: &f.content }).collect();
        find_exact_matches(&inputs, &self.config.exact_match)
    }

    /// Ask the oracle for issue-tracker queries matching `analysis` and run them.
    pub fn suggest_issues(
        &self,
        analysis: &LogAnalysisResult,
        search: &dyn IssueSearch,
        repo_scope: Option<&str>,
        limit: usize,
    ) -> Result<Vec<IssueRecord>, AnalysisError> {
        let oracle = self.oracle()?;
        let prompt = prompts::issue_keywords_prompt(analysis, MAX_ISSUE_QUERIES);
        let response = oracle.send_and_wait(&prompt, &[])?;
        let queries = parse_issue_queries(&response.content);
        debug!(queries = queries.len(), "issue search queries proposed");
        Ok(collect_issue_suggestions(&queries, search, repo_scope, limit))
    }
}
