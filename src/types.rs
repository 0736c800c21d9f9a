use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAnalysisResult {
    pub patterns: Vec<String>,
    pub anomalies: Vec<String>,
    pub root_causes: Vec<String>,
    pub summary: String,
}

impl LogAnalysisResult {
    /// True when nothing at all was extracted (off-format or empty response).
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
            && self.anomalies.is_empty()
            && self.root_causes.is_empty()
            && self.summary.is_empty()
    }
}

/// 1-indexed, inclusive line span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    pub fn len(&self) -> usize {
        self.end + 1 - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDescriptor {
    pub content: String,
    pub line_range: LineRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkAnalysisResult {
    pub chunk_id: usize,
    pub line_range: LineRange,
    pub patterns: Vec<String>,
    pub anomalies: Vec<String>,
    pub root_causes: Vec<String>,
}

impl ChunkAnalysisResult {
    pub fn from_analysis(chunk_id: usize, chunk: &ChunkDescriptor, analysis: LogAnalysisResult) -> Self {
        Self {
            chunk_id,
            line_range: chunk.line_range,
            patterns: analysis.patterns,
            anomalies: analysis.anomalies,
            root_causes: analysis.root_causes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysisResult {
    pub filename: String,
    pub file_size: u64,
    pub analysis: LogAnalysisResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCategory {
    Error,
    Warning,
    Info,
    Debug,
    Other,
}

impl LineCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineCategory::Error => "error",
            LineCategory::Warning => "warning",
            LineCategory::Info => "info",
            LineCategory::Debug => "debug",
            LineCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOccurrence {
    pub filename: String,
    pub line_numbers: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExactLineMatch {
    pub line: String,
    pub occurrences: Vec<FileOccurrence>,
    pub category: LineCategory,
    pub total_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityResult {
    pub shared_patterns: Vec<String>,
    pub shared_anomalies: Vec<String>,
    pub shared_root_causes: Vec<String>,
    pub correlations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_matches: Option<Vec<ExactLineMatch>>,
}

impl SimilarityResult {
    pub fn has_shared_findings(&self) -> bool {
        !(self.shared_patterns.is_empty()
            && self.shared_anomalies.is_empty()
            && self.shared_root_causes.is_empty()
            && self.correlations.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiFileAnalysis {
    pub files: Vec<FileAnalysisResult>,
    pub similarity: SimilarityResult,
}
