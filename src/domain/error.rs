//! Error types shared by every layer of the workflow.

use thiserror::Error;

/// Top-level application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("External service error: {0}")]
    ExternalService(#[from] ExternalServiceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The profile could not be fetched on workflow entry
    #[error("Failed to load profile: {0}")]
    ProfileLoad(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The operation is not allowed in the current workflow state
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

/// Errors raised while talking to the profile and transaction back end
#[derive(Debug, Error)]
pub enum ExternalServiceError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("API error ({status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Service misconfigured: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ExternalServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else if err.is_connect() {
            Self::Unavailable(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Input validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Field '{field}' is not available for method '{method}'")]
    FieldNotAvailable { field: String, method: String },

    #[error("Withdrawal form is incomplete; submission is disabled")]
    SubmitDisabled,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_nests_inner_message() {
        let err = AppError::ExternalService(ExternalServiceError::ApiError {
            status_code: 503,
            message: "down".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "External service error: API error (503): down"
        );
    }

    #[test]
    fn test_validation_error_from_conversion() {
        let err: AppError = ValidationError::SubmitDisabled.into();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::SubmitDisabled)
        ));
    }
}
