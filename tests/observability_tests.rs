//! # Observability Tests Module
//!
//! Recording helpers must be safe to call with or without an installed
//! recorder, and spans must be usable around reconciliation work.

#[cfg(test)]
mod tests {
    use kitchen_ledger::observability;
    use kitchen_ledger::observability_config::ObservabilityConfig;
    use std::time::Duration;

    #[test]
    fn test_metrics_recording_without_recorder() {
        observability::record_inventory_deduction("Tomatoes", 2.0, false);
        observability::record_inventory_deduction("Tomatoes", 5.0, true);
        observability::record_unmatched_ingredient("prep_task");
        observability::record_task_completion(true);
        observability::record_task_completion(false);
        observability::record_adjustment("prep_task", "wastage");
        observability::update_low_stock_gauge(3);
        observability::record_session_action("save_prep_sheet", "applied", Duration::from_millis(1000));
    }

    #[test]
    fn test_spans_can_be_entered() {
        let span = observability::prep_span("derive", "sheet1");
        let _guard = span.enter();
        let _inventory = observability::inventory_span("apply_completed_tasks").entered();
        let _meal = observability::meal_span("log_meal").entered();
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ObservabilityConfig {
            log_level: "verbose".to_string(),
            ..ObservabilityConfig::default()
        };
        assert!(observability::init_observability_with_config(&config).is_err());
    }
}
