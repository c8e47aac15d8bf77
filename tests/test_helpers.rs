//! # Test Helper Library
//!
//! Common builders shared by the integration tests: a small kitchen with
//! known quantities, fixed clocks and form drafts.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use kitchen_ledger::config::KitchenConfig;
use kitchen_ledger::fixtures::Fixtures;
use kitchen_ledger::inventory::InventoryDraft;
use kitchen_ledger::meal_log::MealLogDraft;
use kitchen_ledger::model::{InventoryItem, PrepTask, Recipe, RecipeIngredient};
use kitchen_ledger::store::KitchenStore;

/// Fixed "now" used by store operations in tests
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 22, 15, 0, 0).unwrap()
}

/// Tuesday 22 April 2025, the day of the sample prep sheet
pub fn prep_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 22).unwrap()
}

pub fn inventory_item(id: &str, name: &str, quantity: f64, alert_level: f64) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        name: name.to_string(),
        quantity,
        unit: "kg".to_string(),
        alert_level,
        expiry_date: None,
        last_checked: Utc.with_ymd_and_hms(2025, 3, 15, 10, 30, 0).unwrap(),
    }
}

pub fn ingredient(name: &str, quantity: f64) -> RecipeIngredient {
    RecipeIngredient {
        id: format!("ing-{}", name.to_lowercase()),
        name: name.to_string(),
        quantity,
        unit: "kg".to_string(),
        inventory_item_id: None,
    }
}

pub fn recipe(id: &str, name: &str, ingredients: Vec<RecipeIngredient>) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        category: "Sauces".to_string(),
        ingredients,
        created_at: Utc.with_ymd_and_hms(2025, 2, 20, 14, 30, 0).unwrap(),
    }
}

/// A completed task drawing `quantity` from the ingredient called `name`
pub fn completed_task(id: &str, name: &str, quantity: f64) -> PrepTask {
    PrepTask {
        id: id.to_string(),
        recipe_id: "1".to_string(),
        recipe_name: "Tomato Sauce".to_string(),
        ingredient_name: name.to_string(),
        inventory_item_id: None,
        quantity,
        unit: "kg".to_string(),
        estimated_time: 15,
        is_completed: true,
        completed_quantity: quantity,
        notes: Vec::new(),
        adjustments: Vec::new(),
        order: 0,
    }
}

pub fn inventory_draft(name: &str, quantity: &str, unit: &str, alert_level: &str) -> InventoryDraft {
    InventoryDraft {
        name: name.to_string(),
        quantity: quantity.to_string(),
        unit: unit.to_string(),
        alert_level: alert_level.to_string(),
        expiry_date: String::new(),
    }
}

pub fn meal_draft(servings: &str) -> MealLogDraft {
    MealLogDraft {
        date: "2025-04-22".to_string(),
        time: "19:00".to_string(),
        quantity: servings.to_string(),
        notes: String::new(),
    }
}

pub fn sample_store() -> KitchenStore {
    sample_store_with(KitchenConfig::default())
}

pub fn sample_store_with(config: KitchenConfig) -> KitchenStore {
    KitchenStore::with_fixtures(config, Fixtures::sample_kitchen().unwrap()).unwrap()
}

/// Sample kitchen whose prep sheet already has `task1` marked completed
pub fn fixtures_with_completed_task() -> Fixtures {
    let mut fixtures = Fixtures::sample_kitchen().unwrap();
    if let Some(sheet) = fixtures.prep_sheet.as_mut() {
        sheet.tasks[0].is_completed = true;
        sheet.tasks[0].completed_quantity = sheet.tasks[0].quantity;
    }
    fixtures
}

pub fn quantity_of(store: &KitchenStore, name: &str) -> f64 {
    store
        .inventory()
        .iter()
        .find(|item| item.name == name)
        .map(|item| item.quantity)
        .unwrap()
}
