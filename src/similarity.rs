use ahash::{AHashMap, AHashSet};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::oracle::Oracle;
use crate::prompts;
use crate::sections::{heading_regex, section_items};
use crate::types::{FileAnalysisResult, SimilarityResult};

pub static SHARED_PATTERNS_HEADING: Lazy<Regex> = Lazy::new(|| heading_regex(r"SHARED[ \t]*PATTERNS?").unwrap());
pub static SHARED_ANOMALIES_HEADING: Lazy<Regex> =
    Lazy::new(|| heading_regex(r"SHARED[ \t]*ANOMAL(?:Y|IES)").unwrap());
pub static SHARED_ROOT_CAUSES_HEADING: Lazy<Regex> =
    Lazy::new(|| heading_regex(r"SHARED[ \t]*ROOT[ \t]*CAUSES?").unwrap());
pub static CORRELATIONS_HEADING: Lazy<Regex> = Lazy::new(|| heading_regex(r"CORRELATIONS?").unwrap());

/// Parse a comparison response with SHARED PATTERNS / SHARED ANOMALIES /
/// SHARED ROOT CAUSES / CORRELATIONS sections.
pub fn parse_similarity(text: &str) -> SimilarityResult {
    SimilarityResult {
        shared_patterns: section_items(text, &SHARED_PATTERNS_HEADING),
        shared_anomalies: section_items(text, &SHARED_ANOMALIES_HEADING),
        shared_root_causes: section_items(text, &SHARED_ROOT_CAUSES_HEADING),
        correlations: section_items(text, &CORRELATIONS_HEADING),
        exact_matches: None,
    }
}

fn has_comparison_sections(text: &str) -> bool {
    [&SHARED_PATTERNS_HEADING, &SHARED_ANOMALIES_HEADING, &SHARED_ROOT_CAUSES_HEADING, &CORRELATIONS_HEADING]
        .iter()
        .any(|heading| heading.is_match(text))
}

/// Items (compared case-insensitively) that appear in at least `min_files`
/// files, in first-seen order. Correlations are never inferred locally.
pub fn shared_by_frequency(files: &[FileAnalysisResult], min_files: usize) -> SimilarityResult {
    if files.len() < 2 {
        return SimilarityResult::default();
    }
    SimilarityResult {
        shared_patterns: shared_items(files.iter().map(|f| f.analysis.patterns.as_slice()), min_files),
        shared_anomalies: shared_items(files.iter().map(|f| f.analysis.anomalies.as_slice()), min_files),
        shared_root_causes: shared_items(files.iter().map(|f| f.analysis.root_causes.as_slice()), min_files),
        correlations: Vec::new(),
        exact_matches: None,
    }
}

fn shared_items<'a>(per_file: impl Iterator<Item = &'a [String]>, min_files: usize) -> Vec<String> {
    let mut order: Vec<(String, &'a str)> = Vec::new();
    let mut file_counts: AHashMap<String, usize> = AHashMap::new();
    for items in per_file {
        let mut seen_here: AHashSet<String> = AHashSet::new();
        for item in items {
            let key = item.trim().to_lowercase();
            if !seen_here.insert(key.clone()) {
                continue;
            }
            let count = file_counts.entry(key.clone()).or_insert(0);
            if *count == 0 {
                order.push((key, item.as_str()));
            }
            *count += 1;
        }
    }
    order
        .into_iter()
        .filter(|(key, _)| file_counts.get(key).copied().unwrap_or(0) >= min_files)
        .map(|(_, display)| display.to_string())
        .collect()
}

/// Shared findings across files: asks the oracle first and falls back to
/// frequency counting when it is missing, fails, answers blank or answers
/// without any comparison section. An answer whose sections are all empty
/// ("None found") is kept as is. Fewer than two files always yields an
/// empty result.
pub fn aggregate_similarity(
    files: &[FileAnalysisResult],
    oracle: Option<&dyn Oracle>,
    min_files: usize,
) -> SimilarityResult {
    if files.len() < 2 {
        return SimilarityResult::default();
    }
    if let Some(oracle) = oracle {
        let prompt = prompts::comparison_prompt(files);
        debug!(files = files.len(), prompt_bytes = prompt.len(), "requesting cross-file comparison");
        match oracle.send_and_wait(&prompt, &[]) {
            Ok(resp) if !resp.is_blank() => {
                if has_comparison_sections(&resp.content) {
                    let parsed = parse_similarity(&resp.content);
                    debug!(has_findings = parsed.has_shared_findings(), "comparison response parsed");
                    return parsed;
                }
                warn!("comparison response had no recognizable sections, using frequency fallback");
            }
            Ok(_) => warn!("empty comparison response, using frequency fallback"),
            Err(e) => warn!(error = %e, "comparison request failed, using frequency fallback"),
        }
    }
    shared_by_frequency(files, min_files)
}
