use std::fmt::Display;

/// What a failed fetch was trying to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Tables,
    DbInfo,
    Schema,
}

impl FetchTarget {
    /// Message shown when the server gives no usable `error` field
    #[must_use]
    pub const fn fallback(self) -> &'static str {
        match self {
            Self::Tables => "Failed to fetch tables",
            Self::DbInfo => "Failed to fetch database info",
            Self::Schema => "Failed to fetch schema",
        }
    }
}

impl Display for FetchTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tables => write!(f, "tables"),
            Self::DbInfo => write!(f, "db-info"),
            Self::Schema => write!(f, "schema"),
        }
    }
}

/// Errors surfaced by the API client.
///
/// The `Display` output is exactly what the UI puts in its error slot: the
/// server's `error` string when one was sent, otherwise a generic fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Connection(String),
    #[error("{message}")]
    Fetch { target: FetchTarget, message: String },
    #[error("{0}")]
    QueryExecution(String),
    #[error("{0}")]
    AiGeneration(String),
}

impl ApiError {
    pub const CONNECTION_FALLBACK: &'static str = "Connection Failed";
    pub const QUERY_FALLBACK: &'static str = "Query Execution Failed";
    pub const AI_FALLBACK: &'static str = "Failed to generate query";

    /// The user-facing message
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Connection(msg)
            | Self::QueryExecution(msg)
            | Self::AiGeneration(msg)
            | Self::Fetch { message: msg, .. } => msg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_the_bare_message() {
        let err = ApiError::QueryExecution("syntax error".to_string());
        assert_eq!(err.to_string(), "syntax error");

        let err = ApiError::Fetch {
            target: FetchTarget::Schema,
            message: FetchTarget::Schema.fallback().to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch schema");
        assert_eq!(err.message(), "Failed to fetch schema");
    }
}
