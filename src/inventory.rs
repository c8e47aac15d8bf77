//! # Quantity Ledger
//!
//! Stock items with units, alert thresholds and expiry dates. Items are added
//! and edited through [`InventoryDraft`], the raw strings of the inventory
//! form, which are validated before anything is written.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info};

use crate::errors::{error_logging, AppError, AppResult};
use crate::model::{new_id, InventoryItem};
use crate::validation;

/// Raw inventory form input
#[derive(Debug, Clone, Default)]
pub struct InventoryDraft {
    pub name: String,
    pub quantity: String,
    pub unit: String,
    pub alert_level: String,
    pub expiry_date: String,
}

/// Display classification of an item, most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockStatus {
    LowStock,
    ExpiringSoon,
    Ok,
}

struct ValidatedDraft {
    name: String,
    quantity: f64,
    unit: String,
    alert_level: f64,
    expiry_date: Option<NaiveDate>,
}

fn parse_draft(draft: &InventoryDraft) -> AppResult<ValidatedDraft> {
    let name = validation::require_text("name", &draft.name)?.to_string();
    validation::require_text("quantity", &draft.quantity)?;
    let quantity = validation::parse_quantity("quantity", &draft.quantity)?;
    let unit = validation::require_text("unit", &draft.unit)?.to_string();

    Ok(ValidatedDraft {
        name,
        quantity,
        unit,
        alert_level: validation::parse_alert_level(&draft.alert_level)?,
        expiry_date: validation::parse_optional_date(&draft.expiry_date)?,
    })
}

fn validate_draft(draft: &InventoryDraft) -> AppResult<ValidatedDraft> {
    let result = parse_draft(draft);

    if let Err(e) = &result {
        error_logging::log_validation_error(e, "validate_inventory_draft", "inventory_item", Some(&draft.name));
    }
    result
}

/// Validate a draft and append a new item to the ledger
pub fn add_item(
    items: &mut Vec<InventoryItem>,
    draft: &InventoryDraft,
    now: DateTime<Utc>,
) -> AppResult<InventoryItem> {
    let valid = validate_draft(draft)?;

    let item = InventoryItem {
        id: new_id(),
        name: valid.name,
        quantity: valid.quantity,
        unit: valid.unit,
        alert_level: valid.alert_level,
        expiry_date: valid.expiry_date,
        last_checked: now,
    };

    info!(item_id = %item.id, name = %item.name, quantity = %item.quantity, "Inventory item added");
    items.push(item.clone());
    Ok(item)
}

/// Replace the item with the given id by the validated draft
pub fn update_item(
    items: &mut [InventoryItem],
    id: &str,
    draft: &InventoryDraft,
    now: DateTime<Utc>,
) -> AppResult<InventoryItem> {
    let valid = validate_draft(draft)?;

    let slot = items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| AppError::not_found("inventory item", id))?;

    *slot = InventoryItem {
        id: id.to_string(),
        name: valid.name,
        quantity: valid.quantity,
        unit: valid.unit,
        alert_level: valid.alert_level,
        expiry_date: valid.expiry_date,
        last_checked: now,
    };

    debug!(item_id = %id, "Inventory item updated");
    Ok(slot.clone())
}

/// Remove an item, returning whether it existed
pub fn remove_item(items: &mut Vec<InventoryItem>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.id != id);
    let removed = items.len() < before;
    if removed {
        debug!(item_id = %id, "Inventory item removed");
    }
    removed
}

pub fn find_item<'a>(items: &'a [InventoryItem], id: &str) -> Option<&'a InventoryItem> {
    items.iter().find(|item| item.id == id)
}

/// Case-insensitive substring search on item names
pub fn search<'a>(items: &'a [InventoryItem], query: &str) -> Vec<&'a InventoryItem> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .collect()
}

/// Items at or below their alert level
pub fn low_stock(items: &[InventoryItem]) -> Vec<&InventoryItem> {
    items.iter().filter(|item| item.is_low_stock()).collect()
}

/// Whether the item expires within `window_days` of `today`
///
/// Items past their expiry date count as expiring soon; items without an
/// expiry date never do.
pub fn is_expiring_soon(item: &InventoryItem, today: NaiveDate, window_days: i64) -> bool {
    match item.expiry_date {
        Some(expiry) => (expiry - today).num_days() < window_days,
        None => false,
    }
}

pub fn stock_status(item: &InventoryItem, today: NaiveDate, window_days: i64) -> StockStatus {
    if item.is_low_stock() {
        StockStatus::LowStock
    } else if is_expiring_soon(item, today, window_days) {
        StockStatus::ExpiringSoon
    } else {
        StockStatus::Ok
    }
}
