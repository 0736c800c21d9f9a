use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: String,
    pub repository: String,
    pub comments: u32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("issue search failed: {0}")]
    Failed(String),
}

/// Keyword search over an issue tracker.
pub trait IssueSearch: Send + Sync {
    fn search(&self, query: &str, repo_scope: Option<&str>, limit: usize) -> Result<Vec<IssueRecord>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct QueryPayload {
    #[serde(default, alias = "keywords", alias = "searchQueries")]
    queries: Vec<String>,
}

/// Search queries from an oracle answer shaped like `{"queries": [...]}` or a
/// bare JSON array, optionally inside a code fence. Anything unparseable
/// yields no queries.
pub fn parse_issue_queries(text: &str) -> Vec<String> {
    let raw = if let Some(obj) = slice_between(text, '{', '}') {
        serde_json::from_str::<QueryPayload>(obj).map(|p| p.queries)
    } else if let Some(arr) = slice_between(text, '[', ']') {
        serde_json::from_str::<Vec<String>>(arr)
    } else {
        debug!("no JSON found in issue query response");
        return Vec::new();
    };
    match raw {
        Ok(queries) => queries
            .into_iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .unique_by(|q| q.to_lowercase())
            .collect(),
        Err(e) => {
            warn!(error = %e, "malformed issue query JSON");
            Vec::new()
        }
    }
}

fn slice_between(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Run every query, keep the first hit per URL, stop at `limit` issues.
/// A failing query is skipped.
pub fn collect_issue_suggestions(
    queries: &[String],
    search: &dyn IssueSearch,
    repo_scope: Option<&str>,
    limit: usize,
) -> Vec<IssueRecord> {
    let mut out: Vec<IssueRecord> = Vec::new();
    for q in queries {
        if out.len() >= limit {
            break;
        }
        match search.search(q, repo_scope, limit) {
            Ok(hits) => {
                for hit in hits {
                    if out.len() >= limit {
                        break;
                    }
                    if !out.iter().any(|existing| existing.url == hit.url) {
                        out.push(hit);
                    }
                }
            }
            Err(e) => warn!(query = %q, error = %e, "issue search failed"),
        }
    }
    out
}
