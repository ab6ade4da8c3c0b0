//! Error types for grocery list operations.
//!
//! Every handler reports failures through [`GroceryError`]; the operation handler
//! turns it into a `400` response carrying the error's display text.

use crate::storage::StorageError;

/// Main error type for grocery list operations.
#[derive(Debug, thiserror::Error)]
pub enum GroceryError {
    /// Document rejected by the item schema
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Failures reported as [`StorageError`]: bundled store calls, identifier
    /// casts and document conversion
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Errors from a storage provider with its own error type
    #[error("Storage provider error: {0}")]
    Provider(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Request body could not be interpreted
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

/// Validation errors raised while shaping a document for persistence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Required attribute is missing
    #[error("Required attribute '{attribute}' is missing")]
    MissingRequiredAttribute { attribute: String },

    /// Attribute value doesn't match expected type
    #[error("Attribute '{attribute}' has invalid type, expected {expected}, got {actual}")]
    InvalidAttributeType {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Required text attribute present but empty
    #[error("Attribute '{attribute}' must not be empty")]
    EmptyAttribute { attribute: String },

    /// Attribute text is not a valid timestamp
    #[error("Attribute '{attribute}' is not a valid date-time: {value}")]
    InvalidDateTime { attribute: String, value: String },

    /// General validation error with custom message
    #[error("Validation failed: {message}")]
    Custom { message: String },
}

impl GroceryError {
    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Wrap an error coming from a storage provider.
    ///
    /// Providers whose error type is [`StorageError`] land in
    /// [`GroceryError::Storage`]; anything else is kept boxed.
    pub fn provider<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(error);
        match boxed.downcast::<StorageError>() {
            Ok(storage) => Self::Storage(*storage),
            Err(other) => Self::Provider(other),
        }
    }

    /// The storage failure behind this error, if there is one.
    pub fn storage_error(&self) -> Option<&StorageError> {
        match self {
            Self::Storage(error) => Some(error),
            _ => None,
        }
    }
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Create a missing required attribute error.
    pub fn missing(attribute: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create an invalid type error.
    pub fn invalid_type(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidAttributeType {
            attribute: attribute.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Result type for grocery list operations.
pub type GroceryResult<T> = Result<T, GroceryError>;

/// Result type for schema validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::missing("itemName");
        assert_eq!(error.to_string(), "Required attribute 'itemName' is missing");

        let error = ValidationError::invalid_type("isPurchased", "boolean", "string");
        assert_eq!(
            error.to_string(),
            "Attribute 'isPurchased' has invalid type, expected boolean, got string"
        );
    }

    #[test]
    fn test_grocery_error_wraps_sources() {
        let error: GroceryError = ValidationError::missing("itemName").into();
        assert_eq!(
            error.to_string(),
            "Validation error: Required attribute 'itemName' is missing"
        );

        let error: GroceryError = StorageError::unavailable("no connection").into();
        assert_eq!(
            error.to_string(),
            "Storage error: Storage unavailable: no connection"
        );

        let error = GroceryError::invalid_request("body must be a JSON object");
        assert!(error.storage_error().is_none());
        assert_eq!(
            error.to_string(),
            "Invalid request: body must be a JSON object"
        );
    }

    #[test]
    fn test_provider_errors_keep_storage_variant() {
        let error = GroceryError::provider(StorageError::unavailable("connection refused"));
        assert!(matches!(error, GroceryError::Storage(_)));
        assert!(error.storage_error().is_some_and(StorageError::is_temporary));
        assert_eq!(
            error.to_string(),
            "Storage error: Storage unavailable: connection refused"
        );

        let error = GroceryError::provider(std::io::Error::other("disk full"));
        assert!(matches!(error, GroceryError::Provider(_)));
        assert!(error.storage_error().is_none());
        assert_eq!(error.to_string(), "Storage provider error: disk full");
    }
}
