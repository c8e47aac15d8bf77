//! # Configuration Tests
//!
//! Environment loading and validation of every configuration section. All
//! environment manipulation lives in a single test so parallel tests never
//! observe each other's variables.

use kitchen_ledger::config::{AppConfig, KitchenConfig, LocalizationConfig, SessionConfig};
use kitchen_ledger::errors::AppError;
use kitchen_ledger::observability_config::ObservabilityConfig;
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.kitchen.default_task_minutes, 15);
        assert_eq!(config.kitchen.expiry_warning_days, 7);
        assert!(!config.kitchen.meal_log_deducts_inventory);
        assert_eq!(config.session.latency(), Duration::from_millis(1000));
        assert_eq!(config.localization.language, "en");
    }

    #[test]
    fn test_section_validation() {
        let kitchen = KitchenConfig {
            default_task_minutes: 0,
            ..KitchenConfig::default()
        };
        assert!(matches!(kitchen.validate(), Err(AppError::Config(_))));

        let session = SessionConfig {
            simulated_latency_ms: 120_000,
        };
        assert!(session.validate().is_err());

        let localization = LocalizationConfig {
            language: "not a language!".to_string(),
        };
        assert!(localization.validate().is_err());

        let observability = ObservabilityConfig {
            log_level: "loud".to_string(),
            ..ObservabilityConfig::default()
        };
        assert!(observability.validate().is_err());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("DEFAULT_TASK_MINUTES", "20");
        std::env::set_var("MEAL_LOG_DEDUCTS_INVENTORY", "TRUE");
        std::env::set_var("SIMULATED_LATENCY_MS", "50");
        std::env::set_var("KITCHEN_LANGUAGE", "fr");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.kitchen.default_task_minutes, 20);
        assert!(config.kitchen.meal_log_deducts_inventory);
        assert_eq!(config.session.simulated_latency_ms, 50);
        assert_eq!(config.localization.language, "fr");
        assert!(config.summary().contains("language=fr"));

        std::env::set_var("DEFAULT_TASK_MINUTES", "soon");
        assert!(matches!(AppConfig::from_env(), Err(AppError::Config(_))));

        for key in [
            "DEFAULT_TASK_MINUTES",
            "MEAL_LOG_DEDUCTS_INVENTORY",
            "SIMULATED_LATENCY_MS",
            "KITCHEN_LANGUAGE",
        ] {
            std::env::remove_var(key);
        }
    }
}
