use itertools::Itertools;
use tracing::{debug, warn};

use crate::oracle::Oracle;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::prompts;
use crate::sections::parse_analysis;
use crate::types::{ChunkAnalysisResult, LogAnalysisResult};

pub const SINGLE_CHUNK_SUMMARY: &str =
    "The log was analyzed as a single chunk; no cross-chunk consolidation was needed.";

pub fn fallback_summary(chunks: usize) -> String {
    format!(
        "Analyzed {chunks} chunks. Findings were merged without AI consolidation, \
         so related items may still be listed separately."
    )
}

/// Union of every list across chunks: first-seen order, exact (case-sensitive) dedup.
pub fn merge_chunk_results(chunks: &[ChunkAnalysisResult]) -> LogAnalysisResult {
    LogAnalysisResult {
        patterns: union(chunks.iter().map(|c| c.patterns.as_slice())),
        anomalies: union(chunks.iter().map(|c| c.anomalies.as_slice())),
        root_causes: union(chunks.iter().map(|c| c.root_causes.as_slice())),
        summary: fallback_summary(chunks.len()),
    }
}

fn union<'a>(lists: impl Iterator<Item = &'a [String]>) -> Vec<String> {
    lists.flatten().unique().cloned().collect()
}

/// Combine per-chunk results (in chunk order) into one analysis.
///
/// One chunk is returned as-is with a fixed summary. Several chunks go to the
/// oracle for consolidation; when it fails or answers with nothing usable the
/// lists are merged locally instead. Callers must not pass zero chunks; an
/// empty result comes back if they do.
pub fn aggregate_chunks(
    filename: &str,
    chunks: &[ChunkAnalysisResult],
    oracle: Option<&dyn Oracle>,
    progress: &dyn ProgressSink,
) -> LogAnalysisResult {
    match chunks {
        [] => LogAnalysisResult::default(),
        [only] => LogAnalysisResult {
            patterns: only.patterns.clone(),
            anomalies: only.anomalies.clone(),
            root_causes: only.root_causes.clone(),
            summary: SINGLE_CHUNK_SUMMARY.to_string(),
        },
        _ => {
            progress.on_progress(&ProgressEvent::AggregationStarted { chunks: chunks.len() });
            match consolidate_with_oracle(filename, chunks, oracle) {
                Ok(result) => result,
                Err(reason) => {
                    warn!(file = %filename, chunks = chunks.len(), reason = %reason, "falling back to local merge");
                    progress.on_progress(&ProgressEvent::AggregationFallback { reason });
                    merge_chunk_results(chunks)
                }
            }
        }
    }
}

fn consolidate_with_oracle(
    filename: &str,
    chunks: &[ChunkAnalysisResult],
    oracle: Option<&dyn Oracle>,
) -> Result<LogAnalysisResult, String> {
    let oracle = oracle.ok_or_else(|| "no oracle attached".to_string())?;
    let prompt = prompts::consolidation_prompt(filename, chunks);
    debug!(file = %filename, prompt_bytes = prompt.len(), "requesting consolidation");
    let response = oracle.send_and_wait(&prompt, &[]).map_err(|e| e.to_string())?;
    if response.is_blank() {
        return Err("empty consolidation response".to_string());
    }
    let parsed = parse_analysis(&response.content);
    if parsed.is_empty() {
        return Err("consolidation response had no recognizable sections".to_string());
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LineRange;

    fn chunk(id: usize, patterns: &[&str]) -> ChunkAnalysisResult {
        ChunkAnalysisResult {
            chunk_id: id,
            line_range: LineRange { start: id * 10 + 1, end: id * 10 + 10 },
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            anomalies: vec![],
            root_causes: vec![],
        }
    }

    #[test]
    fn union_is_case_sensitive_and_ordered() {
        let merged = merge_chunk_results(&[chunk(0, &["b", "a"]), chunk(1, &["A", "b", "c"])]);
        assert_eq!(merged.patterns, vec!["b", "a", "A", "c"]);
        assert!(merged.summary.contains("Analyzed 2 chunks"));
    }

    #[test]
    fn zero_chunks_is_empty() {
        assert!(aggregate_chunks("x", &[], None, &crate::progress::NoopProgress).is_empty());
    }
}
