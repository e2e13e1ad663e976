#![forbid(unsafe_code)]

use thiserror::Error;

/// Failure reported by a [`crate::GridSource`].
#[derive(Debug, Error)]
pub enum GridError {
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("unknown table {0:?}")]
    UnknownTable(String),
    #[error("range {range} cannot hold the written values: {reason}")]
    RangeMismatch { range: String, reason: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Table or identifier does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Header row is unusable (no `ID` column, duplicate names).
    #[error("schema: {0}")]
    Schema(String),
    /// The grid collaborator failed; `context` names the operation.
    #[error("could not {context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: GridError,
    },
    /// The update request itself is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl StoreError {
    pub(crate) fn transport(context: impl Into<String>) -> impl FnOnce(GridError) -> Self {
        let context = context.into();
        move |source| Self::Transport { context, source }
    }

    /// Names the record a transport failure happened for.
    pub(crate) fn for_record(self, id: &str) -> Self {
        match self {
            Self::Transport { context, source } => Self::Transport {
                context: format!("{context} for record {id:?}"),
                source,
            },
            other => other,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Stable machine-readable code for callers that need to branch on it.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Schema(_) => "SCHEMA",
            Self::Transport { .. } => "TRANSPORT",
            Self::InvalidInput(_) => "INVALID_INPUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn transport_errors_keep_context_and_cause() {
        let err = StoreError::transport("read table \"Hypotheses\"")(GridError::Status {
            status: 403,
            message: "forbidden".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "could not read table \"Hypotheses\": HTTP 403: forbidden"
        );
        assert_eq!(err.code(), "TRANSPORT");
        let source = err.source().expect("source");
        assert_eq!(source.to_string(), "HTTP 403: forbidden");
    }

    #[test]
    fn record_context_is_added_to_transport_errors_only() {
        let err = StoreError::transport("list tables")(GridError::Transport("reset".to_string()))
            .for_record("P1");
        assert_eq!(err.to_string(), "could not list tables for record \"P1\": transport: reset");

        let err = StoreError::NotFound("record \"P1\"".to_string()).for_record("P1");
        assert_eq!(err.to_string(), "not found: record \"P1\"");
    }
}
