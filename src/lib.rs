pub mod types;
pub mod error;
pub mod config;
pub mod chunking;
pub mod list_items;
pub mod sections;
pub mod aggregate;
pub mod normalize;
pub mod exact_match;
pub mod similarity;
pub mod oracle;
pub mod pool;
pub mod progress;
pub mod prompts;
pub mod issues;
pub mod analyzer;

pub use analyzer::LogAnalyzer;
pub use config::AnalyzerConfig;
pub use error::AnalysisError;
pub use types::{
    ChunkAnalysisResult, ChunkDescriptor, ExactLineMatch, FileAnalysisResult, FileOccurrence, LineCategory,
    LineRange, LogAnalysisResult, MultiFileAnalysis, SimilarityResult,
};
