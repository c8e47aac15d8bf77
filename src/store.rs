//! # Kitchen Store
//!
//! The single owner of the kitchen's in-memory state: inventory, recipes,
//! meal logs, prep suggestions and the current prep sheet, plus the fixtures
//! it was loaded from so [`KitchenStore::reset`] can restore them.
//!
//! Every mutating method validates first and only then writes, so an `Err`
//! leaves the store exactly as it was.
//!
//! ## Exactly-once deduction
//!
//! Completing a task deducts its `completed_quantity` from inventory right
//! away, and saving the sheet deducts any completed task that has not been
//! deducted yet. The store remembers applied task ids, so a task completed
//! and then saved reaches inventory once. Reopening a task forgets its id
//! without restoring stock; completing it again deducts again.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::config::KitchenConfig;
use crate::errors::{error_logging, AppError, AppResult};
use crate::fixtures::Fixtures;
use crate::inventory::{self, InventoryDraft};
use crate::inventory_updater::{self, ApplyReport};
use crate::meal_log::{self, MealLogDraft, SortOrder};
use crate::model::{
    AdjustmentReason, InventoryItem, MealCountReason, MealLog, PrepSheet, PrepSuggestion, Recipe,
};
use crate::prep_sheet::{self, DeriveOptions, PrepRequest};
use crate::recipes::{self, RecipeDraft};
use crate::suggestions;
use crate::tracking::{self, MoveDirection};
use crate::validation;

/// Result of saving the prep sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    /// Tasks deducted by this save (not previously applied)
    pub applied_task_ids: Vec<String>,
    pub report: ApplyReport,
    /// Names of items at or below their alert level after the save
    pub low_stock: Vec<String>,
}

/// Result of logging a meal
#[derive(Debug, Clone, PartialEq)]
pub struct MealLogOutcome {
    pub log: MealLog,
    /// Whether the recipe ingredients were deducted from inventory
    pub inventory_updated: bool,
    pub report: ApplyReport,
}

#[derive(Debug, Clone)]
pub struct KitchenStore {
    config: KitchenConfig,
    inventory: Vec<InventoryItem>,
    recipes: Vec<Recipe>,
    meal_logs: Vec<MealLog>,
    suggestions: Vec<PrepSuggestion>,
    prep_sheet: Option<PrepSheet>,
    applied_task_ids: HashSet<String>,
    loaded: Fixtures,
}

impl KitchenStore {
    /// An empty store
    pub fn new(config: KitchenConfig) -> Self {
        Self {
            config,
            inventory: Vec::new(),
            recipes: Vec::new(),
            meal_logs: Vec::new(),
            suggestions: Vec::new(),
            prep_sheet: None,
            applied_task_ids: HashSet::new(),
            loaded: Fixtures::default(),
        }
    }

    /// A store loaded with `fixtures`
    pub fn with_fixtures(config: KitchenConfig, fixtures: Fixtures) -> AppResult<Self> {
        let mut store = Self::new(config);
        store.load(fixtures)?;
        Ok(store)
    }

    /// Replace all state with `fixtures` and remember them for [`Self::reset`]
    pub fn load(&mut self, fixtures: Fixtures) -> AppResult<()> {
        fixtures.validate()?;

        self.inventory = fixtures.inventory.clone();
        self.recipes = fixtures.recipes.clone();
        self.meal_logs = fixtures.meal_logs.clone();
        self.suggestions = fixtures.suggestions.clone();
        self.prep_sheet = fixtures.prep_sheet.clone();
        self.applied_task_ids.clear();
        self.loaded = fixtures;

        info!(
            inventory_items = self.inventory.len(),
            recipes = self.recipes.len(),
            meal_logs = self.meal_logs.len(),
            has_prep_sheet = self.prep_sheet.is_some(),
            "Kitchen store loaded"
        );
        Ok(())
    }

    /// Restore the loaded prep sheet and inventory, discarding progress
    ///
    /// Recipes, meal logs and suggestions are kept.
    pub fn reset(&mut self) {
        self.inventory = self.loaded.inventory.clone();
        self.prep_sheet = self.loaded.prep_sheet.clone();
        self.applied_task_ids.clear();
        info!("Prep sheet and inventory reset to loaded state");
    }

    /// Current state in fixture form
    pub fn snapshot(&self) -> Fixtures {
        Fixtures {
            inventory: self.inventory.clone(),
            recipes: self.recipes.clone(),
            meal_logs: self.meal_logs.clone(),
            prep_sheet: self.prep_sheet.clone(),
            suggestions: self.suggestions.clone(),
        }
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    pub fn inventory(&self) -> &[InventoryItem] {
        &self.inventory
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn meal_logs(&self) -> &[MealLog] {
        &self.meal_logs
    }

    pub fn suggestions(&self) -> &[PrepSuggestion] {
        &self.suggestions
    }

    pub fn prep_sheet(&self) -> Option<&PrepSheet> {
        self.prep_sheet.as_ref()
    }

    /// Whether a task's completion has already reached inventory
    pub fn is_task_applied(&self, task_id: &str) -> bool {
        self.applied_task_ids.contains(task_id)
    }

    fn current_sheet(&self) -> AppResult<&PrepSheet> {
        self.prep_sheet
            .as_ref()
            .ok_or_else(|| AppError::InvalidState("no prep sheet is loaded".to_string()))
    }

    // Inventory

    pub fn add_inventory_item(&mut self, draft: &InventoryDraft, now: DateTime<Utc>) -> AppResult<InventoryItem> {
        inventory::add_item(&mut self.inventory, draft, now)
    }

    pub fn update_inventory_item(
        &mut self,
        id: &str,
        draft: &InventoryDraft,
        now: DateTime<Utc>,
    ) -> AppResult<InventoryItem> {
        inventory::update_item(&mut self.inventory, id, draft, now).inspect_err(|e| {
            error_logging::log_inventory_error(e, "update_inventory_item", Some(&draft.name), None);
        })
    }

    pub fn remove_inventory_item(&mut self, id: &str) -> bool {
        inventory::remove_item(&mut self.inventory, id)
    }

    pub fn low_stock(&self) -> Vec<&InventoryItem> {
        inventory::low_stock(&self.inventory)
    }

    pub fn expiring_soon(&self, today: NaiveDate) -> Vec<&InventoryItem> {
        self.inventory
            .iter()
            .filter(|item| inventory::is_expiring_soon(item, today, self.config.expiry_warning_days))
            .collect()
    }

    // Recipes

    pub fn create_recipe(&mut self, draft: &RecipeDraft, now: DateTime<Utc>) -> AppResult<Recipe> {
        recipes::create_recipe(&mut self.recipes, draft, now)
    }

    pub fn replace_recipe(&mut self, id: &str, draft: &RecipeDraft, now: DateTime<Utc>) -> AppResult<Recipe> {
        recipes::replace_recipe(&mut self.recipes, id, draft, now)
    }

    pub fn remove_recipe(&mut self, id: &str) -> bool {
        recipes::remove_recipe(&mut self.recipes, id)
    }

    // Prep sheet

    /// Derive a fresh sheet for `date`, replacing the current one
    pub fn generate_prep_sheet(
        &mut self,
        requests: &[PrepRequest],
        date: NaiveDate,
        options: &DeriveOptions,
    ) -> AppResult<PrepSheet> {
        let sheet = prep_sheet::derive_prep_sheet(&self.recipes, requests, date, options)?;
        self.prep_sheet = Some(sheet.clone());
        self.applied_task_ids.clear();
        Ok(sheet)
    }

    /// Derive the sheet for `date` from its approved suggestions
    pub fn generate_from_suggestions(&mut self, date: NaiveDate) -> AppResult<PrepSheet> {
        let requests = suggestions::approved_requests(&self.suggestions, date);
        if requests.is_empty() {
            return Err(AppError::InvalidState(format!(
                "no approved suggestions for {}",
                date
            )));
        }
        let options = DeriveOptions::new(self.config.default_task_minutes);
        self.generate_prep_sheet(&requests, date, &options)
    }

    /// Complete or reopen a task, deducting a newly completed task at once
    ///
    /// A task that already reached inventory keeps the quantity it was
    /// deducted with; reopen it first to record a different amount.
    pub fn complete_task(
        &mut self,
        task_id: &str,
        is_completed: bool,
        completed_quantity: Option<f64>,
        now: DateTime<Utc>,
    ) -> AppResult<ApplyReport> {
        let sheet = self.current_sheet()?;
        let updated = tracking::set_task_completion(sheet, task_id, is_completed, completed_quantity)
            .inspect_err(|e| error_logging::log_prep_error(e, "complete_task", &sheet.id, Some(task_id)))?;

        if is_completed && self.applied_task_ids.contains(task_id) {
            let deducted = sheet.find_task(task_id).map(|task| task.completed_quantity);
            let requested = updated.find_task(task_id).map(|task| task.completed_quantity);
            if deducted != requested {
                let err = AppError::InvalidState(format!(
                    "task '{}' was already deducted from inventory; reopen it before changing its quantity",
                    task_id
                ));
                error_logging::log_prep_error(&err, "complete_task", &sheet.id, Some(task_id));
                return Err(err);
            }
        }

        let mut report = ApplyReport::default();
        if is_completed {
            if !self.applied_task_ids.contains(task_id) {
                let (inventory, applied) =
                    inventory_updater::apply_completed_tasks(&self.inventory, updated.find_task(task_id), now);
                self.inventory = inventory;
                self.applied_task_ids.insert(task_id.to_string());
                report = applied;
            }
        } else if self.applied_task_ids.remove(task_id) {
            debug!(task_id = %task_id, "Task reopened; inventory is not restored");
        }

        self.prep_sheet = Some(updated);
        Ok(report)
    }

    /// Deduct every completed task that has not reached inventory yet
    pub fn save_prep_sheet(&mut self, now: DateTime<Utc>) -> AppResult<SaveReport> {
        let sheet = self.current_sheet()?;
        let pending: Vec<_> = sheet
            .completed_tasks()
            .filter(|task| !self.applied_task_ids.contains(&task.id))
            .collect();
        let applied_task_ids: Vec<String> = pending.iter().map(|task| task.id.clone()).collect();

        let (inventory, report) = inventory_updater::apply_completed_tasks(&self.inventory, pending, now);
        self.inventory = inventory;
        self.applied_task_ids.extend(applied_task_ids.iter().cloned());

        let low_stock: Vec<String> = self.low_stock().iter().map(|item| item.name.clone()).collect();
        if !low_stock.is_empty() {
            warn!(items = ?low_stock, "Items at or below alert level after save");
        }

        info!(
            applied_tasks = applied_task_ids.len(),
            deductions = report.deductions.len(),
            unmatched = report.unmatched.len(),
            "Prep sheet saved"
        );
        Ok(SaveReport {
            applied_task_ids,
            report,
            low_stock,
        })
    }

    fn update_sheet<F>(&mut self, operation: &str, task_id: Option<&str>, f: F) -> AppResult<PrepSheet>
    where
        F: FnOnce(&PrepSheet) -> AppResult<PrepSheet>,
    {
        let sheet = self.current_sheet()?;
        let updated = f(sheet).inspect_err(|e| error_logging::log_prep_error(e, operation, &sheet.id, task_id))?;
        self.prep_sheet = Some(updated.clone());
        Ok(updated)
    }

    pub fn update_task_time(&mut self, task_id: &str, minutes: u32) -> AppResult<PrepSheet> {
        self.update_sheet("update_task_time", Some(task_id), |sheet| {
            tracking::update_estimated_time(sheet, task_id, minutes)
        })
    }

    /// Time edit from the form, where the input must be whole minutes above 0
    pub fn edit_task_time(&mut self, task_id: &str, input: &str) -> AppResult<PrepSheet> {
        let minutes = validation::parse_minutes(input).inspect_err(|e| {
            error_logging::log_validation_error(e, "edit_task_time", "estimated_time", Some(input));
        })?;
        self.update_task_time(task_id, minutes)
    }

    /// Record a variance against the task's planned quantity
    pub fn adjust_task(
        &mut self,
        task_id: &str,
        actual_quantity: f64,
        reason: AdjustmentReason,
        notes: &str,
        now: DateTime<Utc>,
    ) -> AppResult<PrepSheet> {
        self.update_sheet("adjust_task", Some(task_id), |sheet| {
            tracking::adjust_task(sheet, task_id, actual_quantity, reason, notes, now)
        })
    }

    /// Attach a note, signed with the configured author when none is given
    pub fn add_task_note(
        &mut self,
        task_id: &str,
        content: &str,
        author: Option<&str>,
        is_urgent: bool,
        now: DateTime<Utc>,
    ) -> AppResult<PrepSheet> {
        let author = author.unwrap_or(&self.config.default_note_author).to_string();
        self.update_sheet("add_task_note", Some(task_id), |sheet| {
            let task = sheet
                .find_task(task_id)
                .ok_or_else(|| AppError::not_found("prep task", task_id))?;
            let noted = tracking::add_task_note(task, content, &author, is_urgent, now)?;
            tracking::replace_task(sheet, noted)
        })
    }

    pub fn move_task(&mut self, task_id: &str, direction: MoveDirection) -> AppResult<PrepSheet> {
        self.update_sheet("move_task", Some(task_id), |sheet| {
            tracking::move_task(sheet, task_id, direction)
        })
    }

    pub fn complete_sheet(&mut self) -> AppResult<PrepSheet> {
        self.update_sheet("complete_sheet", None, tracking::complete_sheet)
    }

    // Meal logs

    /// Log a served meal; deducts ingredients only when configured to
    pub fn log_meal(
        &mut self,
        recipe_id: &str,
        draft: &MealLogDraft,
        now: DateTime<Utc>,
    ) -> AppResult<MealLogOutcome> {
        let recipe = recipes::find_recipe(&self.recipes, recipe_id)
            .ok_or_else(|| AppError::not_found("recipe", recipe_id))?;
        let log = meal_log::log_meal(recipe, draft)?;

        let (inventory_updated, report) = if self.config.meal_log_deducts_inventory {
            let (inventory, report) = inventory_updater::apply_meal_consumption(&self.inventory, &log, now);
            self.inventory = inventory;
            (true, report)
        } else {
            debug!(log_id = %log.id, "Meal logged without inventory deduction");
            (false, ApplyReport::default())
        };

        self.meal_logs.push(log.clone());
        Ok(MealLogOutcome {
            log,
            inventory_updated,
            report,
        })
    }

    pub fn adjust_meal_count(
        &mut self,
        log_id: &str,
        remaining_count: f64,
        reason: MealCountReason,
        notes: &str,
        now: DateTime<Utc>,
    ) -> AppResult<MealLog> {
        let slot = self
            .meal_logs
            .iter_mut()
            .find(|log| log.id == log_id)
            .ok_or_else(|| AppError::not_found("meal log", log_id))?;
        let updated = tracking::record_meal_count_adjustment(&*slot, remaining_count, reason, notes, now)?;
        *slot = updated.clone();
        Ok(updated)
    }

    pub fn search_meal_logs(&self, query: &str) -> Vec<&MealLog> {
        meal_log::search_logs(&self.meal_logs, query)
    }

    /// Meal logs ordered by served date
    pub fn sorted_meal_logs(&self, order: SortOrder) -> Vec<MealLog> {
        let mut logs = self.meal_logs.clone();
        meal_log::sort_logs(&mut logs, order);
        logs
    }

    pub fn remove_meal_log(&mut self, log_id: &str) -> bool {
        meal_log::remove_log(&mut self.meal_logs, log_id)
    }

    // Suggestions

    /// Replace the suggestions for `date` with fresh ones from history
    pub fn suggest_for_day(&mut self, date: NaiveDate) -> Vec<PrepSuggestion> {
        let fresh = suggestions::suggest_for_day(&self.recipes, date, &self.meal_logs, &self.inventory);
        self.suggestions.retain(|s| s.date != date);
        self.suggestions.extend(fresh.iter().cloned());
        fresh
    }

    fn update_suggestion<F>(&mut self, id: &str, f: F) -> AppResult<PrepSuggestion>
    where
        F: FnOnce(&PrepSuggestion) -> AppResult<PrepSuggestion>,
    {
        let slot = self
            .suggestions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| AppError::not_found("suggestion", id))?;
        let updated = f(&*slot)?;
        *slot = updated.clone();
        Ok(updated)
    }

    pub fn approve_suggestion(&mut self, id: &str, user_quantity: Option<f64>) -> AppResult<PrepSuggestion> {
        self.update_suggestion(id, |s| suggestions::approve(s, user_quantity))
    }

    pub fn complete_suggestion(&mut self, id: &str) -> AppResult<PrepSuggestion> {
        self.update_suggestion(id, suggestions::complete)
    }
}
