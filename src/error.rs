use std::sync::Arc;

use thiserror::Error;

/// Result alias used throughout the data layer.
pub type Result<T> = std::result::Result<T, LoadError>;

/// What kind of resource a loader was fetching. Only used to pick the
/// message of [`LoadError::ResourceUnavailable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Table,
    Graph,
}

impl ResourceKind {
    fn unavailable_message(&self) -> &'static str {
        match self {
            ResourceKind::Table => "Table not found",
            ResourceKind::Graph => "Graph JSON not found",
        }
    }
}

/// Errors surfaced by loaders. None of them are cached: the next call to
/// the same loader fetches again.
///
/// Cloneable so that every caller awaiting one shared load receives the
/// same outcome; wrapped library errors sit behind an `Arc`.
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// The source answered with a non-success status.
    #[error("{}", .kind.unavailable_message())]
    ResourceUnavailable {
        kind: ResourceKind,
        locator: String,
        status: u16,
    },

    #[error("Delimited parse error: {0}")]
    Csv(#[source] Arc<csv::Error>),

    #[error("JSON parse error: {0}")]
    Json(#[source] Arc<serde_json::Error>),

    #[error("IO error: {0}")]
    Io(#[source] Arc<std::io::Error>),

    /// The request never produced a response (DNS, refused connection, ...).
    #[error("Transport error for {locator}: {message}")]
    Transport { locator: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Csv(Arc::new(e))
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Json(Arc::new(e))
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(Arc::new(e))
    }
}

impl LoadError {
    /// HTTP-style status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            LoadError::ResourceUnavailable { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graph_unavailable_message_is_stable() {
        let err = LoadError::ResourceUnavailable {
            kind: ResourceKind::Graph,
            locator: "data/graph_full_cleaned.json".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "Graph JSON not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn parse_errors_carry_no_status() {
        let err: LoadError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("JSON parse error"));
        assert_eq!(err.status(), None);
    }
}
