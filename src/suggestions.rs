//! # Prep Suggestions
//!
//! Proposes a batch count per recipe for a given day, flags ingredients the
//! ledger cannot cover, and walks each proposal through
//! `pending -> approved -> completed`. Approved suggestions become the
//! [`PrepRequest`]s the deriver turns into a prep sheet.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};
use crate::model::{
    new_id, IngredientShortage, InventoryItem, MealLog, PrepSuggestion, Recipe, SuggestionStatus,
};
use crate::prep_sheet::{weekday_name, PrepRequest};
use crate::validation;

fn available_stock(inventory: &[InventoryItem], item_id: Option<&str>, name: &str) -> f64 {
    let item = match item_id {
        Some(id) => inventory.iter().find(|item| item.id == id),
        None => inventory.iter().find(|item| item.name == name),
    };
    item.map(|item| item.quantity).unwrap_or(0.0)
}

/// Ingredients of `recipe` x `batches` that stock on hand cannot cover
///
/// An ingredient with no matching inventory item counts as zero available.
pub fn find_shortages(
    recipe: &Recipe,
    batches: f64,
    inventory: &[InventoryItem],
) -> Vec<IngredientShortage> {
    recipe
        .ingredients
        .iter()
        .filter_map(|ingredient| {
            let required = ingredient.quantity * batches;
            let available =
                available_stock(inventory, ingredient.inventory_item_id.as_deref(), &ingredient.name);
            (available < required).then(|| IngredientShortage {
                ingredient_name: ingredient.name.clone(),
                required,
                available,
                unit: ingredient.unit.clone(),
            })
        })
        .collect()
}

/// Average servings logged for a recipe on the same weekday, rounded up
///
/// Falls back to a single batch when there is no history for that day.
pub fn suggested_batches(recipe_id: &str, date: NaiveDate, logs: &[MealLog]) -> f64 {
    let weekday = date.weekday();
    let history: Vec<u32> = logs
        .iter()
        .filter(|log| log.recipe.id == recipe_id && log.date.weekday() == weekday)
        .map(|log| log.quantity)
        .collect();

    if history.is_empty() {
        return 1.0;
    }
    let total: u32 = history.iter().sum();
    (f64::from(total) / history.len() as f64).ceil().max(1.0)
}

/// Build a pending suggestion for `recipe` on `date`
pub fn suggest(
    recipe: &Recipe,
    date: NaiveDate,
    logs: &[MealLog],
    inventory: &[InventoryItem],
) -> PrepSuggestion {
    let batches = suggested_batches(&recipe.id, date, logs);
    let shortages = find_shortages(recipe, batches, inventory);

    if !shortages.is_empty() {
        warn!(
            recipe = %recipe.name,
            date = %date,
            shortages = shortages.len(),
            "Suggested prep cannot be covered by current stock"
        );
    }

    PrepSuggestion {
        id: new_id(),
        recipe_id: recipe.id.clone(),
        recipe_name: recipe.name.clone(),
        suggested_quantity: batches,
        user_quantity: batches,
        weekday: weekday_name(date).to_string(),
        date,
        status: SuggestionStatus::Pending,
        has_shortage: !shortages.is_empty(),
    }
}

/// Suggestions for every recipe in the catalog
pub fn suggest_for_day(
    recipes: &[Recipe],
    date: NaiveDate,
    logs: &[MealLog],
    inventory: &[InventoryItem],
) -> Vec<PrepSuggestion> {
    recipes
        .iter()
        .map(|recipe| suggest(recipe, date, logs, inventory))
        .collect()
}

/// Approve a pending suggestion, optionally overriding the batch count
pub fn approve(suggestion: &PrepSuggestion, user_quantity: Option<f64>) -> AppResult<PrepSuggestion> {
    if suggestion.status != SuggestionStatus::Pending {
        return Err(AppError::InvalidState(format!(
            "suggestion '{}' is not pending",
            suggestion.id
        )));
    }

    let quantity = match user_quantity {
        Some(quantity) => validation::check_quantity("batch quantity", quantity)?,
        None => suggestion.suggested_quantity,
    };
    if quantity <= 0.0 {
        return Err(AppError::Validation(
            "batch quantity must be greater than 0".to_string(),
        ));
    }

    let mut approved = suggestion.clone();
    approved.user_quantity = quantity;
    approved.status = SuggestionStatus::Approved;
    debug!(suggestion_id = %suggestion.id, quantity = quantity, "Suggestion approved");
    Ok(approved)
}

/// Mark an approved suggestion as prepared
pub fn complete(suggestion: &PrepSuggestion) -> AppResult<PrepSuggestion> {
    if suggestion.status != SuggestionStatus::Approved {
        return Err(AppError::InvalidState(format!(
            "suggestion '{}' must be approved before it is completed",
            suggestion.id
        )));
    }
    let mut completed = suggestion.clone();
    completed.status = SuggestionStatus::Completed;
    Ok(completed)
}

/// Prep requests for every approved suggestion dated `date`
pub fn approved_requests(suggestions: &[PrepSuggestion], date: NaiveDate) -> Vec<PrepRequest> {
    suggestions
        .iter()
        .filter(|s| s.status == SuggestionStatus::Approved && s.date == date)
        .map(|s| PrepRequest::new(s.recipe_id.clone(), s.user_quantity))
        .collect()
}
