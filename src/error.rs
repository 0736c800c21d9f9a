use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::oracle::OracleError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),
    #[error("no oracle session; attach one with LogAnalyzer::with_oracle before analyzing")]
    NotInitialized,
    #[error("input '{0}' is empty")]
    EmptyInput(String),
    #[error("oracle unavailable: {0}")]
    OracleUnavailable(#[from] OracleError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
