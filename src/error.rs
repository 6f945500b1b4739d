//! Error types for the esdomain reconciler.
//!
//! Two families matter to callers: configuration errors, which are raised
//! before any provider call is made, and provider errors, which carry the
//! code and message returned by the Elasticsearch Service API.

use std::path::PathBuf;
use thiserror::Error;

/// Error code the provider returns when a domain does not exist.
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

/// The main error type for esdomain.
#[derive(Debug, Error)]
pub enum EsDomainError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Provider (AWS API) errors.
    #[error("AWS API error: {0}")]
    Provider(#[from] ProviderError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// The access policy could not be turned into a JSON document.
    #[error("Failed to convert the policy into valid JSON: {message}")]
    InvalidPolicy {
        /// Description of the policy error.
        message: String,
    },

    /// No region in the configuration nor in the AWS environment.
    #[error("No AWS region configured; set `region` or AWS_REGION")]
    MissingRegion,
}

/// Errors returned by, or while talking to, the Elasticsearch Service API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API answered with an error document.
    #[error("{code} {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error code, e.g. `ResourceNotFoundException`.
        code: String,
        /// Provider error message.
        message: String,
    },

    /// Network error.
    #[error("Network error communicating with AWS: {message}")]
    NetworkError {
        /// Description of the network error.
        message: String,
    },

    /// Invalid response from API.
    #[error("Invalid response from AWS: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },

    /// Credentials could not be resolved.
    #[error("Failed to resolve AWS credentials: {message}")]
    Credentials {
        /// Description of the credentials failure.
        message: String,
    },

    /// The request could not be signed.
    #[error("Failed to sign request: {message}")]
    Signing {
        /// Description of the signing failure.
        message: String,
    },
}

/// Result type alias for esdomain operations.
pub type Result<T> = std::result::Result<T, EsDomainError>;

impl EsDomainError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the provider reported that the domain does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Provider(err) if err.is_not_found())
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates an access policy error.
    #[must_use]
    pub fn policy(message: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            message: message.into(),
        }
    }
}

impl ProviderError {
    /// Creates an API error.
    #[must_use]
    pub fn api(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns the provider error code, if the API produced one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns true if the provider reported that the domain does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.code() == Some(RESOURCE_NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let err = EsDomainError::from(ProviderError::api(409, RESOURCE_NOT_FOUND, "Domain not found: logs"));
        assert!(err.is_not_found());

        let err = EsDomainError::from(ProviderError::api(403, "AccessDeniedException", "nope"));
        assert!(!err.is_not_found());

        let err = EsDomainError::from(ProviderError::network("connection reset"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_api_error_keeps_code_and_message() {
        let err = EsDomainError::from(ProviderError::api(
            400,
            "ValidationException",
            "Instance type t9.nano is not supported",
        ));
        let rendered = err.to_string();
        assert!(rendered.contains("ValidationException"));
        assert!(rendered.contains("Instance type t9.nano is not supported"));
    }
}
