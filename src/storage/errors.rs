//! Storage-specific error types for document operations.
//!
//! These errors describe persistence failures only. Schema violations live in
//! [`crate::error::ValidationError`] and never reach the storage layer.

use std::fmt;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// Invalid data format or structure that cannot be stored.
    InvalidData { message: String },

    /// Invalid lookup parameters, such as an identifier that cannot be cast.
    InvalidQuery {
        message: String,
        value: Option<String>,
    },

    /// Storage backend is not reachable.
    Unavailable { message: String },

    /// Configuration error in the storage backend or its connection string.
    Configuration { message: String },

    /// Serialization or deserialization error.
    Serialization {
        message: String,
        data_type: Option<String>,
    },

    /// Generic internal storage error.
    Internal {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::InvalidData { message } => {
                write!(f, "Invalid data: {}", message)
            }
            StorageError::InvalidQuery { message, value } => {
                if let Some(val) = value {
                    write!(f, "Invalid query: {} (value: {})", message, val)
                } else {
                    write!(f, "Invalid query: {}", message)
                }
            }
            StorageError::Unavailable { message } => {
                write!(f, "Storage unavailable: {}", message)
            }
            StorageError::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
            StorageError::Serialization { message, data_type } => {
                if let Some(dtype) = data_type {
                    write!(f, "Serialization error: {} (type: {})", message, dtype)
                } else {
                    write!(f, "Serialization error: {}", message)
                }
            }
            StorageError::Internal { message, .. } => {
                write!(f, "Internal storage error: {}", message)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Internal {
                source: Some(source),
                ..
            } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl StorageError {
    /// Create a new InvalidData error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Create a new InvalidQuery error carrying the offending value.
    pub fn invalid_query(message: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
            value: Some(value.into()),
        }
    }

    /// Create a new Unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a new Configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new Serialization error.
    pub fn serialization(message: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
            data_type: Some(data_type.into()),
        }
    }

    /// Create a new Internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Check if this error indicates a failure that might succeed on retry.
    pub fn is_temporary(&self) -> bool {
        matches!(self, StorageError::Unavailable { .. })
    }

    /// Check if this error indicates invalid input data.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            StorageError::InvalidData { .. } | StorageError::InvalidQuery { .. }
        )
    }
}
