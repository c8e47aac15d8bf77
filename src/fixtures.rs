//! Seed data for the kitchen store.
//!
//! Fixtures use the same camelCase JSON shape as the kitchen app's data
//! files. The built-in sample kitchen is compiled into the binary; a file
//! named by `KITCHEN_FIXTURES_PATH` replaces it.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::KitchenConfig;
use crate::errors::{AppError, AppResult};
use crate::model::{InventoryItem, MealLog, PrepSheet, PrepSuggestion, Recipe};
use crate::prep_sheet::total_estimated_time;

const SAMPLE_KITCHEN: &str = include_str!("../data/sample_kitchen.json");

/// Everything a [`crate::store::KitchenStore`] is loaded from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixtures {
    pub inventory: Vec<InventoryItem>,
    pub recipes: Vec<Recipe>,
    pub meal_logs: Vec<MealLog>,
    pub prep_sheet: Option<PrepSheet>,
    pub suggestions: Vec<PrepSuggestion>,
}

impl Fixtures {
    /// The built-in sample kitchen (Tomatoes 5 kg, Tomato Sauce, one lunch log)
    pub fn sample_kitchen() -> AppResult<Self> {
        Self::from_json_str(SAMPLE_KITCHEN)
    }

    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let fixtures: Fixtures = serde_json::from_str(json)?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!(
                "cannot read fixtures file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let fixtures = Self::from_json_str(&json)?;

        info!(
            path = %path.display(),
            inventory_items = fixtures.inventory.len(),
            recipes = fixtures.recipes.len(),
            meal_logs = fixtures.meal_logs.len(),
            "Fixtures loaded from file"
        );
        Ok(fixtures)
    }

    /// The configured fixtures file, or the sample kitchen when none is set
    pub fn from_config(config: &KitchenConfig) -> AppResult<Self> {
        match &config.fixtures_path {
            Some(path) => Self::load_from_path(path),
            None => Self::sample_kitchen(),
        }
    }

    /// Reject data the store could never have produced itself
    pub fn validate(&self) -> AppResult<()> {
        let mut seen = HashSet::new();
        for item in &self.inventory {
            if !seen.insert(item.id.as_str()) {
                return Err(AppError::Parse(format!(
                    "duplicate inventory item id '{}'",
                    item.id
                )));
            }
            if !item.quantity.is_finite() || item.quantity < 0.0 {
                return Err(AppError::Parse(format!(
                    "inventory item '{}' has a negative quantity",
                    item.name
                )));
            }
        }

        if let Some(sheet) = &self.prep_sheet {
            let expected = total_estimated_time(&sheet.tasks).map_err(|_| {
                AppError::Parse(format!("prep sheet '{}' task times are too large", sheet.id))
            })?;
            if sheet.total_estimated_time != expected {
                return Err(AppError::Parse(format!(
                    "prep sheet '{}' total time {} does not match its tasks ({})",
                    sheet.id, sheet.total_estimated_time, expected
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_kitchen_parses() {
        let fixtures = Fixtures::sample_kitchen().unwrap();

        let tomatoes = &fixtures.inventory[0];
        assert_eq!(tomatoes.name, "Tomatoes");
        assert_eq!(tomatoes.quantity, 5.0);
        assert_eq!(tomatoes.alert_level, 2.0);

        assert_eq!(fixtures.recipes[0].name, "Tomato Sauce");
        assert_eq!(fixtures.meal_logs[0].current_count, 2.5);

        let sheet = fixtures.prep_sheet.as_ref().unwrap();
        assert_eq!(sheet.total_estimated_time, 25);
        assert!(!sheet.is_completed());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let fixtures = Fixtures::from_json_str("{}").unwrap();
        assert_eq!(fixtures, Fixtures::default());
    }

    #[test]
    fn test_invalid_fixtures_are_rejected() {
        assert!(matches!(
            Fixtures::from_json_str("not json"),
            Err(AppError::Parse(_))
        ));

        let mut fixtures = Fixtures::sample_kitchen().unwrap();
        fixtures.inventory[0].quantity = -1.0;
        assert!(fixtures.validate().is_err());

        let mut fixtures = Fixtures::sample_kitchen().unwrap();
        let duplicate = fixtures.inventory[0].clone();
        fixtures.inventory.push(duplicate);
        assert!(fixtures.validate().is_err());

        let mut fixtures = Fixtures::sample_kitchen().unwrap();
        if let Some(sheet) = fixtures.prep_sheet.as_mut() {
            sheet.total_estimated_time = 99;
        }
        assert!(fixtures.validate().is_err());

        let mut fixtures = Fixtures::sample_kitchen().unwrap();
        if let Some(sheet) = fixtures.prep_sheet.as_mut() {
            sheet.tasks[0].estimated_time = u32::MAX;
            sheet.tasks[1].estimated_time = u32::MAX;
        }
        assert!(matches!(fixtures.validate(), Err(AppError::Parse(_))));
    }
}
