//! Core error type definitions

use std::path::PathBuf;

/// Result type alias for cairn operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cairn operations using thiserror
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A single entity lookup found nothing
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A key and its paired value declare different record kinds
    #[error("record kind mismatch for key '{key}': key is '{key_kind}', value is '{value_kind}'")]
    KindMismatch {
        key: String,
        key_kind: String,
        value_kind: String,
    },

    /// Two pairs in one write batch target the same key
    #[error("duplicate key '{key}' in one write batch")]
    DuplicateKey { key: String },

    /// A list operation was requested on a record that is not list-shaped
    #[error("record '{key}' is not a list of the requested shape: {message}")]
    NotAList { key: String, message: String },

    /// Caller supplied a malformed argument
    #[error("invalid argument '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    /// Endpoint is not supported by this backend
    #[error("'{endpoint}' is not supported by this backend: {message}")]
    Unsupported { endpoint: String, message: String },

    /// Bulk delete criteria this backend cannot act on
    #[error("unsupported bulk delete criteria: {criteria}")]
    UnsupportedDeleteCriteria { criteria: String },

    /// An index names a record that does not exist
    #[error("index '{index}' references '{id}' which has no record")]
    IndexInconsistency { index: String, id: String },

    /// The key-value substrate failed
    #[error("substrate {operation} failed: {message}")]
    Substrate {
        operation: &'static str,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// File system operations
    #[error("file system {operation} failed for '{}'", path.display())]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl Error {
    /// Whether this error signals a caller bug rather than a runtime data problem
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::KindMismatch { .. } | Error::DuplicateKey { .. } | Error::NotAList { .. }
        )
    }

    /// Whether this error is a single-entity lookup miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether this error comes from a stubbed endpoint
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::Unsupported { .. } | Error::UnsupportedDeleteCriteria { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_violation_classification() {
        assert!(Error::duplicate_key("k").is_contract_violation());
        assert!(Error::kind_mismatch("k", "a", "b").is_contract_violation());
        assert!(Error::not_a_list("k", "no").is_contract_violation());
        assert!(!Error::not_found("node", "x").is_contract_violation());
        assert!(Error::unsupported("blob.upload", "no blobs").is_unsupported());
    }

    #[test]
    fn test_lookup_miss_keeps_its_variant() {
        let err = Error::not_found("node", "abc");
        assert!(err.is_not_found());
        assert!(!err.is_unsupported());
        assert_eq!(err.to_string(), "node 'abc' not found");
    }
}
