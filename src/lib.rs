//! # Kitchen Ledger
//!
//! Business core of a restaurant kitchen: an inventory ledger, a recipe
//! catalog, daily prep sheets derived from recipes, completion and variance
//! tracking, and meal logging. Completed prep tasks (and optionally served
//! meals) are reconciled back into inventory levels.

pub mod config;
pub mod errors;
pub mod fixtures;
pub mod inventory;
pub mod inventory_updater;
pub mod localization;
pub mod meal_log;
pub mod model;
pub mod observability;
pub mod observability_config;
pub mod prep_sheet;
pub mod recipes;
pub mod session;
pub mod store;
pub mod suggestions;
pub mod tracking;
pub mod validation;

// Re-export types for easier access
pub use config::AppConfig;
pub use errors::{AppError, AppResult};
pub use fixtures::Fixtures;
pub use inventory_updater::{apply_completed_tasks, apply_meal_consumption, ApplyReport, Deduction};
pub use model::{
    AdjustmentReason, InventoryItem, MealCountReason, MealLog, PrepSheet, PrepSheetStatus,
    PrepTask, Recipe, RecipeIngredient,
};
pub use prep_sheet::{derive_prep_sheet, DeriveOptions, PrepRequest};
pub use session::{KitchenSession, SessionError};
pub use store::{KitchenStore, MealLogOutcome, SaveReport};
