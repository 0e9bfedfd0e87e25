//! Error types for snapshot acquisition.

use ronda_store::TableKey;
use ronda_traits::RondaError;
use thiserror::Error;

/// Errors that can occur while fetching or converting a snapshot.
#[derive(Debug, Error)]
pub enum DataError {
    /// A required environment variable is not set.
    #[error("{0} environment variable not set")]
    MissingConfig(&'static str),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a snapshot file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error.
    #[error("Environment error: {0}")]
    Env(#[from] dotenvy::Error),

    /// The data service returned an error.
    #[error("Data API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// The provider has no payload for this table.
    #[error("No payload for {0}")]
    NotFound(TableKey),

    /// The payload does not fit the table it was fetched for.
    #[error("Payload for {key} is a {found} payload")]
    WrongKind {
        /// Table the payload was fetched for
        key: TableKey,
        /// Kind of payload that arrived
        found: &'static str,
    },

    /// The payload was fetched but could not become a table.
    #[error(transparent)]
    Table(#[from] RondaError),
}

impl DataError {
    /// Whether the provider simply has nothing for the requested table.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DataError::NotFound(TableKey::Close);
        assert_eq!(err.to_string(), "No payload for price:close");

        let err = DataError::MissingConfig("RONDA_API_URL");
        assert_eq!(err.to_string(), "RONDA_API_URL environment variable not set");

        let err = DataError::WrongKind {
            key: TableKey::Industry,
            found: "matrix",
        };
        assert_eq!(
            err.to_string(),
            "Payload for company_info:industry is a matrix payload"
        );
    }

    #[test]
    fn test_table_error_is_transparent() {
        let err: DataError = RondaError::Shape("duplicate symbol A".into()).into();
        assert_eq!(err.to_string(), "Shape error: duplicate symbol A");
        assert!(!err.is_not_found());
    }
}
