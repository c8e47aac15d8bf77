//! # Unified Application Configuration
//!
//! This module consolidates every kitchen ledger setting into a single
//! configuration object loaded from environment variables (a `.env` file is
//! honoured by the binary through `dotenvy`). Each section validates itself.

use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use serde::{Deserialize, Serialize};
use std::env;

/// Reconciliation and prep-sheet settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KitchenConfig {
    /// Minutes assigned to a derived prep task without a user override
    pub default_task_minutes: u32,
    /// Items expiring within this many days are flagged
    pub expiry_warning_days: i64,
    /// Whether logging a meal deducts its recipe ingredients from inventory
    pub meal_log_deducts_inventory: bool,
    /// Author recorded on task notes when none is given
    pub default_note_author: String,
    /// Optional JSON fixture file replacing the built-in sample kitchen
    pub fixtures_path: Option<String>,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        Self {
            default_task_minutes: 15,
            expiry_warning_days: 7,
            meal_log_deducts_inventory: false,
            default_note_author: "Kitchen Staff".to_string(),
            fixtures_path: None,
        }
    }
}

impl KitchenConfig {
    /// Validate kitchen configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.default_task_minutes == 0 {
            return Err(AppError::Config(
                "Default task minutes cannot be 0".to_string(),
            ));
        }

        if self.default_task_minutes > 24 * 60 {
            return Err(AppError::Config(
                "Default task minutes cannot exceed one day".to_string(),
            ));
        }

        if self.expiry_warning_days < 0 {
            return Err(AppError::Config(
                "Expiry warning days cannot be negative".to_string(),
            ));
        }

        if self.default_note_author.trim().is_empty() {
            return Err(AppError::Config(
                "Default note author cannot be empty".to_string(),
            ));
        }

        if let Some(path) = &self.fixtures_path {
            if path.trim().is_empty() {
                return Err(AppError::Config("Fixtures path cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}

/// Simulated I/O latency for save/refresh/log actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Delay applied before each session action takes effect
    pub simulated_latency_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 1000,
        }
    }
}

impl SessionConfig {
    /// Validate session configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.simulated_latency_ms > 60_000 {
            return Err(AppError::Config(
                "Simulated latency cannot be greater than 60000 ms".to_string(),
            ));
        }
        Ok(())
    }

    pub fn latency(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.simulated_latency_ms)
    }
}

/// Language used for confirmation and alert messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizationConfig {
    pub language: String,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
        }
    }
}

impl LocalizationConfig {
    /// Validate localization configuration
    pub fn validate(&self) -> AppResult<()> {
        let language = self.language.trim();
        if language.is_empty() {
            return Err(AppError::Config("Language cannot be empty".to_string()));
        }
        if language.parse::<unic_langid::LanguageIdentifier>().is_err() {
            return Err(AppError::Config(format!(
                "Language '{}' is not a valid language identifier",
                language
            )));
        }
        Ok(())
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Reconciliation settings
    pub kitchen: KitchenConfig,
    /// Simulated latency settings
    pub session: SessionConfig,
    /// Localization settings
    pub localization: LocalizationConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        config.kitchen.default_task_minutes = env::var("DEFAULT_TASK_MINUTES")
            .unwrap_or_else(|_| "15".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("DEFAULT_TASK_MINUTES must be a valid number".to_string())
            })?;
        config.kitchen.expiry_warning_days = env::var("EXPIRY_WARNING_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("EXPIRY_WARNING_DAYS must be a valid number".to_string())
            })?;
        config.kitchen.meal_log_deducts_inventory = env::var("MEAL_LOG_DEDUCTS_INVENTORY")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";
        if let Ok(author) = env::var("DEFAULT_NOTE_AUTHOR") {
            config.kitchen.default_note_author = author;
        }
        config.kitchen.fixtures_path = env::var("KITCHEN_FIXTURES_PATH").ok();

        config.session.simulated_latency_ms = env::var("SIMULATED_LATENCY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse()
            .map_err(|_| {
                AppError::Config("SIMULATED_LATENCY_MS must be a valid number".to_string())
            })?;

        if let Ok(language) = env::var("KITCHEN_LANGUAGE") {
            config.localization.language = language;
        }

        config.observability = ObservabilityConfig::from_env();

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.kitchen.validate()?;
        self.session.validate()?;
        self.localization.validate()?;
        self.observability.validate().map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: default_task_minutes={}, expiry_warning_days={}, meal_log_deducts_inventory={}, latency_ms={}, language={}, environment={}",
            self.kitchen.default_task_minutes,
            self.kitchen.expiry_warning_days,
            self.kitchen.meal_log_deducts_inventory,
            self.session.simulated_latency_ms,
            self.localization.language,
            self.observability.environment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.kitchen.meal_log_deducts_inventory);
    }

    #[test]
    fn test_kitchen_config_validation() {
        let mut config = KitchenConfig::default();
        assert!(config.validate().is_ok());

        // Invalid: zero task minutes
        config.default_task_minutes = 0;
        assert!(config.validate().is_err());
        config.default_task_minutes = 15;

        // Invalid: negative expiry window
        config.expiry_warning_days = -1;
        assert!(config.validate().is_err());
        config.expiry_warning_days = 7;

        // Invalid: blank author
        config.default_note_author = "  ".to_string();
        assert!(config.validate().is_err());
        config.default_note_author = "Chef".to_string();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_session_and_localization_validation() {
        let mut session = SessionConfig::default();
        assert!(session.validate().is_ok());
        session.simulated_latency_ms = 120_000;
        assert!(session.validate().is_err());

        let mut localization = LocalizationConfig::default();
        assert!(localization.validate().is_ok());
        localization.language = "not a language!".to_string();
        assert!(localization.validate().is_err());
    }

    #[test]
    fn test_summary_mentions_key_settings() {
        let summary = AppConfig::default().summary();
        assert!(summary.contains("default_task_minutes=15"));
        assert!(summary.contains("meal_log_deducts_inventory=false"));
    }
}
