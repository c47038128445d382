use thiserror::Error;

/// Shown when a failure carries no description of its own.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

/// Human-readable category for a non-2xx submit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCategory {
    InvalidFormat,
    Unauthorized,
    Forbidden,
    RateLimited,
    InternalError,
    Unexpected,
}

impl RejectionCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => RejectionCategory::InvalidFormat,
            401 => RejectionCategory::Unauthorized,
            403 => RejectionCategory::Forbidden,
            429 => RejectionCategory::RateLimited,
            500 => RejectionCategory::InternalError,
            _ => RejectionCategory::Unexpected,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RejectionCategory::InvalidFormat => "Invalid request format",
            RejectionCategory::Unauthorized => "Unauthorized access",
            RejectionCategory::Forbidden => "Access forbidden",
            RejectionCategory::RateLimited => "Too many requests, please try again later",
            RejectionCategory::InternalError => "Internal server error",
            RejectionCategory::Unexpected => "Unexpected error occurred",
        }
    }
}

/// Errors from talking to the relay endpoint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RelayError {
    #[error("Server error (Status {status}): {}", category.description())]
    Rejected {
        status: u16,
        category: RejectionCategory,
    },

    #[error("No messageId received in the response")]
    MissingCorrelationId,

    #[error("{0}")]
    Transport(String),

    #[error("invalid JSON in response: {0}")]
    Decode(String),
}

impl RelayError {
    pub fn rejected(status: u16) -> Self {
        RelayError::Rejected {
            status,
            category: RejectionCategory::from_status(status),
        }
    }

    /// Text to show in the conversation for this failure.
    pub fn user_message(&self) -> String {
        let text = self.to_string();
        if text.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_string()
        } else {
            text
        }
    }
}

/// Errors from resolving client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no submit endpoint configured (set submit_url or --submit-url)")]
    MissingSubmitUrl,

    #[error("invalid {field} '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },
}
