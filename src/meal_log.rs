//! # Meal Logging Flow
//!
//! Turns the meal log form into a [`MealLog`] holding its own copy of the
//! recipe. Logging never touches inventory here; whether the store deducts
//! the recipe ingredients is controlled by `meal_log_deducts_inventory`.

use chrono::NaiveDateTime;
use tracing::info;

use crate::errors::{error_logging, AppResult};
use crate::model::{new_id, MealLog, Recipe};
use crate::observability;
use crate::validation;

/// Raw meal log form input
#[derive(Debug, Clone, Default)]
pub struct MealLogDraft {
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`, read as UTC
    pub time: String,
    /// Servings
    pub quantity: String,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

fn build_log(recipe: &Recipe, draft: &MealLogDraft) -> AppResult<MealLog> {
    let quantity = validation::parse_servings(&draft.quantity)?;
    let date = validation::parse_date(&draft.date)?;
    let time = validation::parse_time(&draft.time)?;

    Ok(MealLog {
        id: new_id(),
        recipe: recipe.clone(),
        date: NaiveDateTime::new(date, time).and_utc(),
        quantity,
        notes: validation::optional_text(&draft.notes),
        adjustments: Vec::new(),
        current_count: f64::from(quantity),
    })
}

/// Validate the form and create a log entry for `recipe`
pub fn log_meal(recipe: &Recipe, draft: &MealLogDraft) -> AppResult<MealLog> {
    let _span = observability::meal_span("log_meal").entered();

    let log = build_log(recipe, draft).inspect_err(|e| {
        error_logging::log_validation_error(e, "log_meal", "meal_log", Some(&draft.quantity));
    })?;

    info!(
        log_id = %log.id,
        recipe = %log.recipe.name,
        servings = log.quantity,
        date = %log.date,
        "Meal logged"
    );
    Ok(log)
}

/// Case-insensitive search on recipe name or notes
pub fn search_logs<'a>(logs: &'a [MealLog], query: &str) -> Vec<&'a MealLog> {
    let needle = query.trim().to_lowercase();
    logs.iter()
        .filter(|log| {
            log.recipe.name.to_lowercase().contains(&needle)
                || log
                    .notes
                    .as_deref()
                    .is_some_and(|notes| notes.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sort logs in place by their served date
pub fn sort_logs(logs: &mut [MealLog], order: SortOrder) {
    match order {
        SortOrder::Newest => logs.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::Oldest => logs.sort_by(|a, b| a.date.cmp(&b.date)),
    }
}

pub fn find_log<'a>(logs: &'a [MealLog], id: &str) -> Option<&'a MealLog> {
    logs.iter().find(|log| log.id == id)
}

/// Remove a log, returning whether it existed
pub fn remove_log(logs: &mut Vec<MealLog>, id: &str) -> bool {
    let before = logs.len();
    logs.retain(|log| log.id != id);
    logs.len() < before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::model::RecipeIngredient;
    use chrono::{TimeZone, Utc};

    fn recipe() -> Recipe {
        Recipe {
            id: "1".to_string(),
            name: "Tomato Sauce".to_string(),
            description: String::new(),
            category: "Sauces".to_string(),
            ingredients: vec![RecipeIngredient {
                id: "1".to_string(),
                name: "Tomatoes".to_string(),
                quantity: 2.0,
                unit: "kg".to_string(),
                inventory_item_id: None,
            }],
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    fn draft(date: &str, time: &str, quantity: &str, notes: &str) -> MealLogDraft {
        MealLogDraft {
            date: date.to_string(),
            time: time.to_string(),
            quantity: quantity.to_string(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn test_log_meal_builds_utc_instant() {
        let log = log_meal(&recipe(), &draft("2025-04-22", "18:30", "12", "  ")).unwrap();

        assert_eq!(log.date, Utc.with_ymd_and_hms(2025, 4, 22, 18, 30, 0).unwrap());
        assert_eq!(log.quantity, 12);
        assert_eq!(log.current_count, 12.0);
        assert_eq!(log.notes, None);
        assert_eq!(log.recipe, recipe());
        assert!(log.adjustments.is_empty());
    }

    #[test]
    fn test_log_meal_rejects_bad_input() {
        for bad in [
            draft("2025-04-22", "18:30", "0", ""),
            draft("2025-04-22", "18:30", "12abc", ""),
            draft("2025-04-22", "18:30", "1.5", ""),
            draft("22/04/2025", "18:30", "3", ""),
            draft("2025-04-22", "25:00", "3", ""),
        ] {
            assert!(matches!(log_meal(&recipe(), &bad), Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_search_and_sort() {
        let mut logs = vec![
            log_meal(&recipe(), &draft("2025-04-20", "12:00", "4", "Lunch rush")).unwrap(),
            log_meal(&recipe(), &draft("2025-04-22", "19:00", "8", "")).unwrap(),
        ];

        assert_eq!(search_logs(&logs, "LUNCH").len(), 1);
        assert_eq!(search_logs(&logs, "sauce").len(), 2);
        assert!(search_logs(&logs, "dessert").is_empty());

        sort_logs(&mut logs, SortOrder::Newest);
        assert_eq!(logs[0].quantity, 8);
        sort_logs(&mut logs, SortOrder::Oldest);
        assert_eq!(logs[0].quantity, 4);

        let id = logs[0].id.clone();
        assert!(find_log(&logs, &id).is_some());
        assert!(remove_log(&mut logs, &id));
        assert_eq!(logs.len(), 1);
    }
}
