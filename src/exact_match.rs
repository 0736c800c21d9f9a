use ahash::AHashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::normalize::normalize_line;
use crate::types::{ExactLineMatch, FileOccurrence, LineCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExactMatchConfig {
    /// Minimum length of a line, both raw (trimmed) and normalized.
    pub min_line_len: usize,
    /// Line numbers kept per file for display; counts are not capped.
    pub max_line_numbers: usize,
    pub max_results: usize,
    /// Fewer qualifying groups than this and nothing is reported.
    pub min_groups: usize,
}

impl Default for ExactMatchConfig {
    fn default() -> Self {
        Self { min_line_len: 10, max_line_numbers: 10, max_results: 50, min_groups: 2 }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FileContent<'a> {
    pub filename: &'a str,
    pub content: &'a str,
}

static RE_ERROR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)error|failed|exception|crash|fatal").unwrap());
static RE_WARNING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)warn|caution").unwrap());
static RE_INFO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)info").unwrap());
static RE_DEBUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)debug|trace|verbose").unwrap());

pub fn categorize_line(line: &str) -> LineCategory {
    if RE_ERROR.is_match(line) {
        LineCategory::Error
    } else if RE_WARNING.is_match(line) {
        LineCategory::Warning
    } else if RE_INFO.is_match(line) {
        LineCategory::Info
    } else if RE_DEBUG.is_match(line) {
        LineCategory::Debug
    } else {
        LineCategory::Other
    }
}

#[derive(Debug, Default)]
struct FileHits {
    file_idx: usize,
    line_numbers: Vec<usize>,
    count: usize,
}

#[derive(Debug)]
struct LineGroup {
    canonical: String,
    /// Only files the line occurs in, ascending by file index.
    per_file: Vec<FileHits>,
}

fn group_lines(files: &[FileContent<'_>], cfg: &ExactMatchConfig) -> Vec<LineGroup> {
    let mut index: AHashMap<String, usize> = AHashMap::new();
    let mut groups: Vec<LineGroup> = Vec::new();

    for (file_idx, file) in files.iter().enumerate() {
        for (i, raw) in file.content.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.chars().count() < cfg.min_line_len || trimmed.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            let key = normalize_line(trimmed);
            if key.chars().count() < cfg.min_line_len {
                continue;
            }
            let gi = *index.entry(key).or_insert_with(|| {
                groups.push(LineGroup { canonical: trimmed.to_string(), per_file: Vec::new() });
                groups.len() - 1
            });
            let per_file = &mut groups[gi].per_file;
            // files are scanned in order, so only the last entry can belong to this file
            if per_file.last().map_or(true, |h| h.file_idx != file_idx) {
                per_file.push(FileHits { file_idx, ..FileHits::default() });
            }
            if let Some(hits) = per_file.last_mut() {
                hits.count += 1;
                if hits.line_numbers.len() < cfg.max_line_numbers {
                    hits.line_numbers.push(i + 1);
                }
            }
        }
    }
    groups
}

/// Lines that are identical across two or more files once timestamps, ids
/// and other volatile tokens are stripped.
///
/// Results are ordered error → warning → info → debug → other, then by total
/// occurrences (descending), then by first appearance.
pub fn find_exact_matches(files: &[FileContent<'_>], cfg: &ExactMatchConfig) -> Vec<ExactLineMatch> {
    let mut out: Vec<ExactLineMatch> = group_lines(files, cfg)
        .into_iter()
        .filter(|g| g.per_file.len() >= 2)
        .map(|g| {
            let total_count = g.per_file.iter().map(|h| h.count).sum();
            let occurrences = g
                .per_file
                .into_iter()
                .map(|h| FileOccurrence {
                    filename: files[h.file_idx].filename.to_string(),
                    line_numbers: h.line_numbers,
                })
                .collect();
            ExactLineMatch { category: categorize_line(&g.canonical), line: g.canonical, occurrences, total_count }
        })
        .collect();

    if out.len() < cfg.min_groups {
        return Vec::new();
    }
    // stable sort keeps first-seen order among equal keys
    out.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| b.total_count.cmp(&a.total_count)));
    out.truncate(cfg.max_results);
    out
}
