//! # Kitchen Data Model
//!
//! Plain data types shared by every component. Field names serialize in
//! camelCase so fixture files keep the shape used by the kitchen app.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Generate a fresh identifier for a new entity
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A stocked ingredient in the quantity ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    /// Stock on hand, never negative after an update
    pub quantity: f64,
    pub unit: String,
    /// Low stock threshold (inclusive)
    pub alert_level: f64,
    pub expiry_date: Option<NaiveDate>,
    pub last_checked: DateTime<Utc>,
}

impl InventoryItem {
    /// Low stock is `quantity <= alert_level`
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.alert_level
    }
}

/// Amount of an ingredient needed for one batch of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredient {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// Stable link to the inventory item this ingredient draws from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub ingredients: Vec<RecipeIngredient>,
    pub created_at: DateTime<Utc>,
}

/// Why an observed quantity differed from the expected one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentReason {
    Served,
    Wastage,
    PhysicalCount,
    Other,
}

impl AdjustmentReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdjustmentReason::Served => "served",
            AdjustmentReason::Wastage => "wastage",
            AdjustmentReason::PhysicalCount => "physical_count",
            AdjustmentReason::Other => "other",
        }
    }
}

impl fmt::Display for AdjustmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons accepted for a meal count adjustment (no `other`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealCountReason {
    Served,
    Wastage,
    PhysicalCount,
}

impl MealCountReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealCountReason::Served => "served",
            MealCountReason::Wastage => "wastage",
            MealCountReason::PhysicalCount => "physical_count",
        }
    }
}

impl fmt::Display for MealCountReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepTaskNote {
    pub id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub author: String,
    pub is_urgent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepTaskAdjustment {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub expected_quantity: f64,
    pub actual_quantity: f64,
    /// Always `expected_quantity - actual_quantity`
    pub difference: f64,
    pub reason: AdjustmentReason,
    pub notes: String,
}

/// One ingredient-preparation unit of work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepTask {
    pub id: String,
    pub recipe_id: String,
    pub recipe_name: String,
    pub ingredient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<String>,
    pub quantity: f64,
    pub unit: String,
    /// Minutes
    pub estimated_time: u32,
    pub is_completed: bool,
    pub completed_quantity: f64,
    #[serde(default)]
    pub notes: Vec<PrepTaskNote>,
    #[serde(default)]
    pub adjustments: Vec<PrepTaskAdjustment>,
    pub order: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrepSheetStatus {
    InProgress,
    Completed,
}

/// The day's collection of prep tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepSheet {
    pub id: String,
    pub date: NaiveDate,
    pub weekday: String,
    pub tasks: Vec<PrepTask>,
    pub total_estimated_time: u32,
    pub status: PrepSheetStatus,
}

impl PrepSheet {
    pub fn find_task(&self, task_id: &str) -> Option<&PrepTask> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn completed_tasks(&self) -> impl Iterator<Item = &PrepTask> {
        self.tasks.iter().filter(|task| task.is_completed)
    }

    pub fn is_completed(&self) -> bool {
        self.status == PrepSheetStatus::Completed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealCountAdjustment {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub initial_count: f64,
    pub remaining_count: f64,
    /// Always `initial_count - remaining_count`
    pub difference: f64,
    pub reason: MealCountReason,
    pub notes: Option<String>,
}

/// A served meal, holding its own snapshot of the recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealLog {
    pub id: String,
    pub recipe: Recipe,
    pub date: DateTime<Utc>,
    /// Servings logged
    pub quantity: u32,
    pub notes: Option<String>,
    #[serde(default)]
    pub adjustments: Vec<MealCountAdjustment>,
    /// Servings still remaining
    pub current_count: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Completed,
}

/// A proposed batch count for a recipe on a given day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepSuggestion {
    pub id: String,
    pub recipe_id: String,
    pub recipe_name: String,
    pub suggested_quantity: f64,
    pub user_quantity: f64,
    pub weekday: String,
    pub date: NaiveDate,
    pub status: SuggestionStatus,
    pub has_shortage: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientShortage {
    pub ingredient_name: String,
    pub required: f64,
    pub available: f64,
    pub unit: String,
}

impl IngredientShortage {
    pub fn missing(&self) -> f64 {
        (self.required - self.available).max(0.0)
    }
}
