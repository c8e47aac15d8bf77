//! Observability module for centralized logging and metrics setup.
//!
//! This module provides:
//! - Structured logging with configurable levels and formats
//! - Metrics collection with an optional Prometheus recorder
//! - Span helpers for inventory, prep sheet and meal log operations
//!
//! Recording functions are safe to call before (or without) initialization;
//! the `metrics` facade discards values when no recorder is installed.

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::prelude::*;

use crate::observability_config::ObservabilityConfig;

/// Initialize the observability stack from environment configuration
pub fn init_observability() -> Result<Option<PrometheusHandle>> {
    let config = ObservabilityConfig::from_env();
    init_observability_with_config(&config)
}

/// Initialize the observability stack with custom configuration
///
/// Returns the Prometheus handle when metrics export is enabled, so the
/// caller can render the collected metrics.
pub fn init_observability_with_config(
    config: &ObservabilityConfig,
) -> Result<Option<PrometheusHandle>> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid observability configuration: {}", e))?;

    init_tracing_with_config(config)?;

    let handle = if config.enable_metrics_export {
        Some(init_metrics()?)
    } else {
        None
    };

    tracing::info!(
        environment = %config.environment,
        metrics_enabled = %config.enable_metrics_export,
        tags = ?config.tags,
        "Observability stack initialized successfully"
    );
    Ok(handle)
}

/// Initialize structured logging with tracing and configuration
fn init_tracing_with_config(config: &ObservabilityConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("kitchen_ledger={}", config.log_level.to_lowercase()).parse()?);

    // A subscriber may already be installed (tests, embedding applications)
    let result = if config.use_pretty_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("Tracing subscriber already installed: {}", e);
        return Ok(());
    }

    tracing::info!(
        environment = %config.environment,
        log_level = %config.log_level,
        "Tracing initialized with structured logging"
    );
    Ok(())
}

/// Install the Prometheus recorder as the global metrics recorder
fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    tracing::info!("Metrics collection initialized");
    Ok(handle)
}

/// Span for quantity ledger and inventory updater operations
pub fn inventory_span(operation: &str) -> tracing::Span {
    tracing::info_span!("inventory_operation", operation = operation, component = "inventory")
}

/// Span for prep sheet derivation and tracking operations
pub fn prep_span(operation: &str, sheet_id: &str) -> tracing::Span {
    tracing::info_span!(
        "prep_operation",
        operation = operation,
        sheet_id = sheet_id,
        component = "prep_sheet"
    )
}

/// Span for meal logging operations
pub fn meal_span(operation: &str) -> tracing::Span {
    tracing::info_span!("meal_operation", operation = operation, component = "meal_log")
}

/// Record a quantity deducted from an inventory item
pub fn record_inventory_deduction(item_name: &str, amount: f64, clamped: bool) {
    let item = item_name.to_string();
    metrics::counter!("inventory_deductions_total", "item" => item.clone()).increment(1);
    metrics::histogram!("inventory_deduction_amount", "item" => item).record(amount);
    if clamped {
        metrics::counter!("inventory_deductions_clamped_total").increment(1);
    }
}

/// Record an ingredient that matched no inventory item
pub fn record_unmatched_ingredient(source: &'static str) {
    metrics::counter!("inventory_unmatched_ingredients_total", "source" => source).increment(1);
}

/// Record a prep task completion toggle
pub fn record_task_completion(is_completed: bool) {
    let state = if is_completed { "completed" } else { "reopened" };
    metrics::counter!("prep_tasks_completed_total", "state" => state).increment(1);
}

/// Record an adjustment for a prep task or meal log
pub fn record_adjustment(kind: &'static str, reason: &'static str) {
    metrics::counter!("adjustments_recorded_total", "kind" => kind, "reason" => reason)
        .increment(1);
}

/// Update the number of items currently at or below their alert level
pub fn update_low_stock_gauge(count: usize) {
    metrics::gauge!("low_stock_items").set(count as f64);
}

/// Record the outcome and duration of a session action
pub fn record_session_action(action: &'static str, outcome: &'static str, duration: std::time::Duration) {
    metrics::counter!("session_actions_total", "action" => action, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("session_action_duration_seconds", "action" => action)
        .record(duration.as_secs_f64());
}
