//! Builder methods for creating errors with context

use super::types::Error;
use std::path::PathBuf;

impl Error {
    /// Create a not-found error for a single entity
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Create a kind mismatch error
    #[must_use]
    pub fn kind_mismatch(
        key: impl Into<String>,
        key_kind: impl Into<String>,
        value_kind: impl Into<String>,
    ) -> Self {
        Error::KindMismatch {
            key: key.into(),
            key_kind: key_kind.into(),
            value_kind: value_kind.into(),
        }
    }

    /// Create a duplicate key error
    #[must_use]
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Error::DuplicateKey { key: key.into() }
    }

    /// Create a not-a-list error
    #[must_use]
    pub fn not_a_list(key: impl Into<String>, message: impl Into<String>) -> Self {
        Error::NotAList {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported endpoint error
    #[must_use]
    pub fn unsupported(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Unsupported {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported delete criteria error
    #[must_use]
    pub fn unsupported_delete_criteria(criteria: impl Into<String>) -> Self {
        Error::UnsupportedDeleteCriteria {
            criteria: criteria.into(),
        }
    }

    /// Create an index inconsistency error
    #[must_use]
    pub fn index_inconsistency(index: impl Into<String>, id: impl Into<String>) -> Self {
        Error::IndexInconsistency {
            index: index.into(),
            id: id.into(),
        }
    }

    /// Create a substrate error
    #[must_use]
    pub fn substrate(operation: &'static str, message: impl Into<String>) -> Self {
        Error::Substrate {
            operation,
            message: message.into(),
            source: None,
        }
    }

    /// Create a substrate error with a source error
    #[must_use]
    pub fn substrate_with_source(
        operation: &'static str,
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Substrate {
            operation,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a file system error
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}
