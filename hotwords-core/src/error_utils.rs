use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn is_retryable(&self) -> bool;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Listing(e) => {
                error!("Listing error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    // Advisory only: nothing inside the workspace retries on its own.
    fn is_retryable(&self) -> bool {
        match self {
            CoreError::Listing(e) => e.is_retryable(),
            CoreError::Network(_) => true,
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Listing(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::InvalidInput { message } => format!("Invalid input: {}", message),
            CoreError::PaginationAborted { resource, .. } => format!(
                "Could not read the hot listing for r/{}. It may not exist.",
                resource
            ),
            CoreError::Cancelled { .. } => "The operation was cancelled.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Listing(_) => "LISTING".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Network(_) => "NETWORK".to_string(),
            CoreError::InvalidInput { .. } => "INVALID_INPUT".to_string(),
            CoreError::PaginationAborted { .. } => "PAGINATION_ABORTED".to_string(),
            CoreError::Cancelled { .. } => "CANCELLED".to_string(),
        }
    }
}

impl ErrorExt for ListingError {
    fn log_error(&self) -> &Self {
        error!("ListingError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ListingError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        match self {
            ListingError::Transport { .. } | ListingError::Timeout { .. } => true,
            ListingError::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ListingError::Transport { .. } => {
                "Could not reach Reddit. Please check your connection.".to_string()
            }
            ListingError::Timeout { .. } => {
                "Request to Reddit timed out. Please try again.".to_string()
            }
            ListingError::Redirect { .. } => {
                "Subreddit not found or is private.".to_string()
            }
            ListingError::Status { status, .. } => {
                format!("Reddit answered with status {}.", status)
            }
            ListingError::MalformedBody { .. } => {
                "Reddit returned a response that could not be read.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ListingError::Transport { .. } => "LISTING_TRANSPORT".to_string(),
            ListingError::Timeout { .. } => "LISTING_TIMEOUT".to_string(),
            ListingError::Status { .. } => "LISTING_STATUS".to_string(),
            ListingError::Redirect { .. } => "LISTING_REDIRECT".to_string(),
            ListingError::MalformedBody { .. } => "LISTING_MALFORMED_BODY".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn is_retryable(&self) -> bool {
        false
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::InvalidValue { field, .. } => {
                format!("Invalid value for configuration field '{}'.", field)
            }
            ConfigError::ValidationFailed { reason } => {
                format!("Configuration is invalid: {}", reason)
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

/// Logs a failure together with its code and user-facing message.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    /// For failures that end the run.
    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!("Error code: {}", error.error_code());
        info!("User message: {}", error.user_friendly_message());
        if error.is_retryable() {
            info!("Error is retryable by the caller");
        }
    }

    /// For failures the caller degrades to a fallback output.
    pub fn report_warning(&self, error: &CoreError) {
        error.log_warn();
        info!("Error code: {}", error.error_code());
        info!("User message: {}", error.user_friendly_message());
    }
}
