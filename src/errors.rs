//! # Application Error Types
//!
//! This module defines the error types shared by the kitchen ledger components.
//! Every operation validates its input before touching state, so an error
//! always means "nothing changed".

use std::fmt;

/// General application error type for consistent error handling
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Configuration validation errors
    Config(String),
    /// Form input validation errors (empty fields, bad numbers, bad dates)
    Validation(String),
    /// A referenced entity (recipe, task, item, log) does not exist
    NotFound(String),
    /// The operation is not allowed in the entity's current state
    InvalidState(String),
    /// Fixture or payload parsing errors
    Parse(String),
    /// Internal application errors
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "[CONFIG] {}", msg),
            AppError::Validation(msg) => write!(f, "[VALIDATION] {}", msg),
            AppError::NotFound(msg) => write!(f, "[NOT_FOUND] {}", msg),
            AppError::InvalidState(msg) => write!(f, "[INVALID_STATE] {}", msg),
            AppError::Parse(msg) => write!(f, "[PARSE] {}", msg),
            AppError::Internal(msg) => write!(f, "[INTERNAL] {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl AppError {
    /// Shorthand for a missing entity of the given kind
    pub fn not_found(kind: &str, id: &str) -> Self {
        AppError::NotFound(format!("{} '{}' does not exist", kind, id))
    }

    /// Whether the error came from user input rather than application state
    pub fn is_user_error(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::Parse(_))
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Standardized error logging utilities for consistent error reporting across the application
pub mod error_logging {
    use tracing::{error, warn};

    /// Log rejected form input with a truncated copy of the offending value
    pub fn log_validation_error(
        error: &impl std::fmt::Display,
        operation: &str,
        input_type: &str,
        input_value: Option<&str>,
    ) {
        warn!(
            error = %error,
            operation = %operation,
            input_type = %input_type,
            input_value = ?input_value.map(|v| if v.chars().count() > 100 { format!("{}...", v.chars().take(100).collect::<String>()) } else { v.to_string() }),
            "Validation failed"
        );
    }

    /// Log inventory reconciliation failures with item context
    pub fn log_inventory_error(
        error: &impl std::fmt::Display,
        operation: &str,
        item_name: Option<&str>,
        quantity: Option<f64>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            item_name = ?item_name,
            quantity = ?quantity,
            "Inventory operation failed"
        );
    }

    /// Log prep sheet failures with task context
    pub fn log_prep_error(
        error: &impl std::fmt::Display,
        operation: &str,
        sheet_id: &str,
        task_id: Option<&str>,
    ) {
        error!(
            error = %error,
            operation = %operation,
            sheet_id = %sheet_id,
            task_id = ?task_id,
            "Prep sheet operation failed"
        );
    }

    /// Log configuration errors during startup/initialization
    pub fn log_config_error(
        error: &impl std::fmt::Display,
        config_key: &str,
        operation: &str,
    ) {
        error!(
            error = %error,
            config_key = %config_key,
            operation = %operation,
            "Configuration error"
        );
    }
}
