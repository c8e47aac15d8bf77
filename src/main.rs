use anyhow::{Context, Result};
use chrono::Utc;
use kitchen_ledger::config::AppConfig;
use kitchen_ledger::errors::error_logging;
use kitchen_ledger::fixtures::Fixtures;
use kitchen_ledger::localization::{self, t_args_lang, t_lang};
use kitchen_ledger::meal_log::MealLogDraft;
use kitchen_ledger::observability;
use kitchen_ledger::prep_sheet::{format_minutes, summarize};
use kitchen_ledger::session::KitchenSession;
use kitchen_ledger::store::KitchenStore;
use tracing::{info, warn};

/// Load and validate configuration from the environment
fn load_config() -> Result<AppConfig> {
    let config = AppConfig::from_env().inspect_err(|e| {
        error_logging::log_config_error(e, "environment", "load_config");
    })?;
    config.validate().inspect_err(|e| {
        error_logging::log_config_error(e, "environment", "validate_config");
    })?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file first
    dotenvy::dotenv().ok();

    let config = load_config()?;
    let metrics_handle = observability::init_observability_with_config(&config.observability)?;
    info!("{}", config.summary());

    localization::init_localization()?;
    let lang = Some(config.localization.language.as_str());

    let fixtures = Fixtures::from_config(&config.kitchen).context("Failed to load kitchen fixtures")?;
    let store = KitchenStore::with_fixtures(config.kitchen.clone(), fixtures)?;
    let session = KitchenSession::with_config(store, &config.session);

    let now = Utc::now();
    let today = now.date_naive();

    // Use the loaded sheet, or plan today's from approved suggestions
    let has_sheet = session.read(|store| store.prep_sheet().is_some());
    if !has_sheet {
        session.update(|store| -> Result<()> {
            for suggestion in store.suggest_for_day(today) {
                store.approve_suggestion(&suggestion.id, None)?;
            }
            store.generate_from_suggestions(today)?;
            Ok(())
        })?;
    }

    let tasks = session.read(|store| {
        store
            .prep_sheet()
            .map(|sheet| sheet.tasks.clone())
            .unwrap_or_default()
    });
    for task in &tasks {
        let report = session.update(|store| store.complete_task(&task.id, true, None, Utc::now()))?;
        let quantity = task.quantity.to_string();
        println!(
            "{}",
            t_args_lang(
                "task-completed",
                &[
                    ("ingredient", task.ingredient_name.as_str()),
                    ("quantity", quantity.as_str()),
                    ("unit", task.unit.as_str()),
                ],
                lang,
            )
        );
        if !report.unmatched.is_empty() {
            let items = report.unmatched.join(", ");
            println!("{}", t_args_lang("unmatched-ingredients", &[("items", items.as_str())], lang));
        }
    }

    let saved = session.save_prep_sheet().await?;
    if saved.applied_task_ids.is_empty() {
        println!("{}", t_lang("prep-sheet-saved-nothing", lang));
    } else {
        let count = saved.applied_task_ids.len().to_string();
        println!("{}", t_args_lang("prep-sheet-saved", &[("count", count.as_str())], lang));
    }
    if !saved.low_stock.is_empty() {
        let count = saved.low_stock.len().to_string();
        let items = saved.low_stock.join(", ");
        warn!(items = %items, "Low stock after prep");
        println!(
            "{}",
            t_args_lang("low-stock-banner", &[("count", count.as_str()), ("items", items.as_str())], lang)
        );
    }

    if let Some(summary) = session.read(|store| store.prep_sheet().map(summarize)) {
        let completed = summary.completed_tasks.to_string();
        let total = summary.total_tasks.to_string();
        let percent = summary.completion_percentage.to_string();
        let remaining = format_minutes(summary.remaining_minutes);
        println!(
            "{}",
            t_args_lang(
                "prep-summary",
                &[
                    ("completed", completed.as_str()),
                    ("total", total.as_str()),
                    ("percent", percent.as_str()),
                    ("remaining", remaining.as_str()),
                ],
                lang,
            )
        );
    }

    let first_recipe = session.read(|store| store.recipes().first().map(|recipe| recipe.id.clone()));
    if let Some(recipe_id) = first_recipe {
        let draft = MealLogDraft {
            date: today.format("%Y-%m-%d").to_string(),
            time: now.format("%H:%M").to_string(),
            quantity: "1".to_string(),
            notes: String::new(),
        };
        let outcome = session.log_meal(&recipe_id, draft).await?;
        let servings = outcome.log.quantity.to_string();
        let key = if outcome.inventory_updated {
            "meal-logged-with-deduction"
        } else {
            "meal-logged"
        };
        println!(
            "{}",
            t_args_lang(
                key,
                &[("servings", servings.as_str()), ("recipe", outcome.log.recipe.name.as_str())],
                lang,
            )
        );
    }

    let expiring: Vec<String> = session.read(|store| {
        store
            .expiring_soon(today)
            .iter()
            .map(|item| item.name.clone())
            .collect()
    });
    if !expiring.is_empty() {
        let items = expiring.join(", ");
        println!("{}", t_args_lang("expiring-soon-banner", &[("items", items.as_str())], lang));
    }

    if let Some(handle) = metrics_handle {
        println!("{}", handle.render());
    }

    info!("Prep day finished");
    Ok(())
}
