//! Error types and handling for the travel planner

use thiserror::Error;

use crate::llm::ProviderError;
use crate::models::ParseError;

/// Main error type for the travel planner
#[derive(Error, Debug)]
pub enum TravelPlannerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Failure reported by an embedding or text-generation provider
    #[error("Provider error: {source}")]
    Provider {
        #[from]
        source: ProviderError,
    },

    /// Malformed destination profile
    #[error("Parse error: {source}")]
    Parse {
        #[from]
        source: ParseError,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// General application errors
    #[error("Application error: {message}")]
    General { message: String },
}

impl TravelPlannerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new general error
    pub fn general<S: Into<String>>(message: S) -> Self {
        Self::General {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TravelPlannerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            TravelPlannerError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            TravelPlannerError::Provider { .. } => {
                "Unable to reach the AI provider. Please check your internet connection."
                    .to_string()
            }
            TravelPlannerError::Parse { .. } => {
                "The destination information could not be understood.".to_string()
            }
            TravelPlannerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
            TravelPlannerError::General { message } => message.clone(),
        }
    }
}
