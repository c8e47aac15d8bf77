//! # Inventory Updater
//!
//! Folds completed prep tasks and served meals back into the quantity ledger.
//!
//! Ingredients are matched to stock by `inventory_item_id` when the recipe
//! carries one, otherwise by exact, case-sensitive name. An ingredient that
//! matches nothing leaves the ledger untouched and is reported back to the
//! caller. Every deduction is floored at zero.
//!
//! There is no de-duplication here: passing the same completed task twice
//! deducts it twice. [`crate::store::KitchenStore`] tracks which tasks it has
//! already applied.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::model::{InventoryItem, MealLog, PrepTask};
use crate::observability;

/// A single quantity change applied to an inventory item
#[derive(Debug, Clone, PartialEq)]
pub struct Deduction {
    pub item_id: String,
    pub item_name: String,
    /// Amount requested by the task or meal
    pub requested: f64,
    /// Amount actually removed after flooring at zero
    pub applied: f64,
    pub remaining: f64,
}

impl Deduction {
    pub fn was_clamped(&self) -> bool {
        self.applied < self.requested
    }
}

/// Outcome of an inventory update pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    pub deductions: Vec<Deduction>,
    /// Ingredient names that matched no inventory item
    pub unmatched: Vec<String>,
}

impl ApplyReport {
    pub fn is_empty(&self) -> bool {
        self.deductions.is_empty() && self.unmatched.is_empty()
    }
}

fn find_stock<'a>(
    inventory: &'a mut [InventoryItem],
    item_id: Option<&str>,
    name: &str,
) -> Option<&'a mut InventoryItem> {
    match item_id {
        Some(id) => inventory.iter_mut().find(|item| item.id == id),
        None => inventory.iter_mut().find(|item| item.name == name),
    }
}

fn deduct(
    inventory: &mut [InventoryItem],
    item_id: Option<&str>,
    name: &str,
    amount: f64,
    now: DateTime<Utc>,
    source: &'static str,
    report: &mut ApplyReport,
) {
    let Some(item) = find_stock(inventory, item_id, name) else {
        warn!(ingredient = %name, item_id = ?item_id, source = source, "No inventory item matches ingredient; skipping");
        observability::record_unmatched_ingredient(source);
        report.unmatched.push(name.to_string());
        return;
    };

    let requested = amount.max(0.0);
    let remaining = (item.quantity - requested).max(0.0);
    let applied = item.quantity - remaining;

    item.quantity = remaining;
    item.last_checked = now;

    debug!(
        item = %item.name,
        requested = %requested,
        applied = %applied,
        remaining = %remaining,
        "Inventory deducted"
    );

    let deduction = Deduction {
        item_id: item.id.clone(),
        item_name: item.name.clone(),
        requested,
        applied,
        remaining,
    };
    observability::record_inventory_deduction(&deduction.item_name, applied, deduction.was_clamped());
    report.deductions.push(deduction);
}

/// Subtract each completed task's `completed_quantity` from matching stock
///
/// Tasks that are not completed are ignored.
pub fn apply_completed_tasks<'a, I>(
    inventory: &[InventoryItem],
    completed_tasks: I,
    now: DateTime<Utc>,
) -> (Vec<InventoryItem>, ApplyReport)
where
    I: IntoIterator<Item = &'a PrepTask>,
{
    let _span = observability::inventory_span("apply_completed_tasks").entered();
    let mut updated = inventory.to_vec();
    let mut report = ApplyReport::default();

    for task in completed_tasks.into_iter().filter(|task| task.is_completed) {
        deduct(
            &mut updated,
            task.inventory_item_id.as_deref(),
            &task.ingredient_name,
            task.completed_quantity,
            now,
            "prep_task",
            &mut report,
        );
    }

    observability::update_low_stock_gauge(updated.iter().filter(|i| i.is_low_stock()).count());
    (updated, report)
}

/// Subtract the ingredients of a logged meal, scaled by its servings
pub fn apply_meal_consumption(
    inventory: &[InventoryItem],
    log: &MealLog,
    now: DateTime<Utc>,
) -> (Vec<InventoryItem>, ApplyReport) {
    let _span = observability::inventory_span("apply_meal_consumption").entered();
    let mut updated = inventory.to_vec();
    let mut report = ApplyReport::default();
    let servings = f64::from(log.quantity);

    for ingredient in &log.recipe.ingredients {
        deduct(
            &mut updated,
            ingredient.inventory_item_id.as_deref(),
            &ingredient.name,
            ingredient.quantity * servings,
            now,
            "meal_log",
            &mut report,
        );
    }

    observability::update_low_stock_gauge(updated.iter().filter(|i| i.is_low_stock()).count());
    (updated, report)
}
