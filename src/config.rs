//! Analyzer configuration.
//!
//! Defaults can be overridden from the environment:
//! - `LOGSIFT_CHUNK_MAX_BYTES`: byte threshold per chunk, default 512000
//! - `LOGSIFT_CHUNK_MAX_LINES`: line threshold per chunk, default 5000
//! - `LOGSIFT_CONCURRENCY`: concurrent chunk requests, default 3
//! - `LOGSIFT_SIMILARITY_MIN_FILES`: files an item must appear in to count as shared, default 2

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

use crate::chunking::ChunkLimits;
use crate::exact_match::ExactMatchConfig;

pub const DEFAULT_CONCURRENCY: usize = 3;
pub const DEFAULT_SIMILARITY_MIN_FILES: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub chunk_limits: ChunkLimits,
    pub concurrency: usize,
    pub exact_match: ExactMatchConfig,
    pub similarity_min_files: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            chunk_limits: ChunkLimits::default(),
            concurrency: DEFAULT_CONCURRENCY,
            exact_match: ExactMatchConfig::default(),
            similarity_min_files: DEFAULT_SIMILARITY_MIN_FILES,
        }
    }
}

impl AnalyzerConfig {
    /// Defaults with `LOGSIFT_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(v) = parse_var(&lookup, "LOGSIFT_CHUNK_MAX_BYTES")? {
            cfg.chunk_limits.max_bytes = v;
        }
        if let Some(v) = parse_var(&lookup, "LOGSIFT_CHUNK_MAX_LINES")? {
            cfg.chunk_limits.max_lines = v;
        }
        if let Some(v) = parse_var(&lookup, "LOGSIFT_CONCURRENCY")? {
            cfg.concurrency = v;
        }
        if let Some(v) = parse_var(&lookup, "LOGSIFT_SIMILARITY_MIN_FILES")? {
            cfg.similarity_min_files = v;
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_limits.max_bytes == 0 {
            return Err(ConfigError::Zero("chunk_max_bytes"));
        }
        if self.chunk_limits.max_lines == 0 {
            return Err(ConfigError::Zero("chunk_max_lines"));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::Zero("concurrency"));
        }
        if self.similarity_min_files == 0 {
            return Err(ConfigError::Zero("similarity_min_files"));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key: key.to_string(), value: raw }),
    }
}
