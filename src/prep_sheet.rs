//! # Prep Task Deriver
//!
//! Expands recipes and requested batch counts into a day's prep sheet: one
//! task per (recipe, ingredient) pair, with quantities scaled by the batch
//! multiplier. Also provides the grouping and summary views the prep screen
//! renders.
//!
//! ## Derivation
//!
//! ```text
//! for request in requests:            (recipe_id, batches)
//!     for ingredient in recipe:
//!         key = (recipe_id, ingredient.name)
//!         if key seen: task[key].quantity += ingredient.quantity * batches
//!         else:        push task { quantity: ingredient.quantity * batches,
//!                                  estimated_time: override[key] or default,
//!                                  order: insertion index }
//! ```
//!
//! Regenerating a sheet replaces the task set wholesale; nothing from the
//! previous tasks (completion, notes, adjustments) carries over.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::model::{new_id, PrepSheet, PrepSheetStatus, PrepTask, Recipe};
use crate::observability;
use crate::validation;

/// A request to prep `batches` batches of a recipe
#[derive(Debug, Clone, PartialEq)]
pub struct PrepRequest {
    pub recipe_id: String,
    pub batches: f64,
}

impl PrepRequest {
    pub fn new(recipe_id: impl Into<String>, batches: f64) -> Self {
        Self {
            recipe_id: recipe_id.into(),
            batches,
        }
    }
}

/// User-entered task durations keyed by (recipe id, ingredient name)
pub type TimeOverrides = HashMap<(String, String), u32>;

/// How estimated times are assigned to derived tasks
#[derive(Debug, Clone)]
pub struct DeriveOptions {
    pub default_minutes: u32,
    pub overrides: TimeOverrides,
}

impl DeriveOptions {
    pub fn new(default_minutes: u32) -> Self {
        Self {
            default_minutes,
            overrides: TimeOverrides::new(),
        }
    }

    pub fn with_override(mut self, recipe_id: &str, ingredient_name: &str, minutes: u32) -> Self {
        self.overrides
            .insert((recipe_id.to_string(), ingredient_name.to_string()), minutes);
        self
    }

    fn minutes_for(&self, recipe_id: &str, ingredient_name: &str) -> u32 {
        self.overrides
            .get(&(recipe_id.to_string(), ingredient_name.to_string()))
            .copied()
            .unwrap_or(self.default_minutes)
    }
}

/// English weekday name used on the prep sheet header
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Sum of task minutes; fails instead of wrapping on absurd inputs
pub fn total_estimated_time(tasks: &[PrepTask]) -> AppResult<u32> {
    tasks.iter().try_fold(0u32, |total, task| {
        total.checked_add(task.estimated_time).ok_or_else(|| {
            AppError::Validation("total estimated time is too large".to_string())
        })
    })
}

/// Derived tasks must stay within what the tracker accepts for the same task
fn scaled_quantity(recipe_id: &str, ingredient_name: &str, quantity: f64) -> AppResult<f64> {
    if !quantity.is_finite() || quantity > validation::MAX_QUANTITY {
        return Err(AppError::Validation(format!(
            "'{}' for recipe '{}' would need more than {} per task; request fewer batches",
            ingredient_name,
            recipe_id,
            validation::MAX_QUANTITY
        )));
    }
    Ok(quantity)
}

fn derive_tasks(
    recipes: &[Recipe],
    requests: &[PrepRequest],
    options: &DeriveOptions,
) -> AppResult<Vec<PrepTask>> {
    validation::check_minutes(options.default_minutes)?;
    for minutes in options.overrides.values() {
        validation::check_minutes(*minutes)?;
    }

    // Validate every request before building anything
    let mut resolved = Vec::with_capacity(requests.len());
    for request in requests {
        if !request.batches.is_finite() || request.batches <= 0.0 {
            return Err(AppError::Validation(format!(
                "batches for recipe '{}' must be greater than 0",
                request.recipe_id
            )));
        }
        let recipe = recipes
            .iter()
            .find(|recipe| recipe.id == request.recipe_id)
            .ok_or_else(|| AppError::not_found("recipe", &request.recipe_id))?;
        resolved.push((recipe, request.batches));
    }

    let mut tasks: Vec<PrepTask> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for (recipe, batches) in resolved {
        for ingredient in &recipe.ingredients {
            let key = (recipe.id.clone(), ingredient.name.clone());
            let quantity = ingredient.quantity * batches;

            if let Some(&position) = index.get(&key) {
                tasks[position].quantity =
                    scaled_quantity(&recipe.id, &ingredient.name, tasks[position].quantity + quantity)?;
                debug!(recipe_id = %recipe.id, ingredient = %ingredient.name, "Merged duplicate prep task");
                continue;
            }

            let quantity = scaled_quantity(&recipe.id, &ingredient.name, quantity)?;
            index.insert(key, tasks.len());
            tasks.push(PrepTask {
                id: new_id(),
                recipe_id: recipe.id.clone(),
                recipe_name: recipe.name.clone(),
                ingredient_name: ingredient.name.clone(),
                inventory_item_id: ingredient.inventory_item_id.clone(),
                quantity,
                unit: ingredient.unit.clone(),
                estimated_time: options.minutes_for(&recipe.id, &ingredient.name),
                is_completed: false,
                completed_quantity: 0.0,
                notes: Vec::new(),
                adjustments: Vec::new(),
                order: tasks.len() as u32,
            });
        }
    }

    Ok(tasks)
}

/// Build a new in-progress prep sheet for `date`
pub fn derive_prep_sheet(
    recipes: &[Recipe],
    requests: &[PrepRequest],
    date: NaiveDate,
    options: &DeriveOptions,
) -> AppResult<PrepSheet> {
    let id = new_id();
    let _span = observability::prep_span("derive", &id).entered();

    let tasks = derive_tasks(recipes, requests, options)?;
    let sheet = PrepSheet {
        id,
        date,
        weekday: weekday_name(date).to_string(),
        total_estimated_time: total_estimated_time(&tasks)?,
        tasks,
        status: PrepSheetStatus::InProgress,
    };

    info!(
        sheet_id = %sheet.id,
        date = %sheet.date,
        task_count = sheet.tasks.len(),
        total_minutes = sheet.total_estimated_time,
        "Prep sheet derived"
    );
    Ok(sheet)
}

/// Replace the tasks of an existing sheet, keeping its id and date
pub fn regenerate_prep_sheet(
    sheet: &PrepSheet,
    recipes: &[Recipe],
    requests: &[PrepRequest],
    options: &DeriveOptions,
) -> AppResult<PrepSheet> {
    let _span = observability::prep_span("regenerate", &sheet.id).entered();
    let tasks = derive_tasks(recipes, requests, options)?;

    Ok(PrepSheet {
        id: sheet.id.clone(),
        date: sheet.date,
        weekday: sheet.weekday.clone(),
        total_estimated_time: total_estimated_time(&tasks)?,
        tasks,
        status: PrepSheetStatus::InProgress,
    })
}

/// Tasks belonging to one recipe, in display order
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGroup<'a> {
    pub recipe_id: &'a str,
    pub recipe_name: &'a str,
    pub tasks: Vec<&'a PrepTask>,
}

impl TaskGroup<'_> {
    pub fn total_minutes(&self) -> u32 {
        self.tasks
            .iter()
            .fold(0u32, |total, task| total.saturating_add(task.estimated_time))
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.is_completed).count()
    }
}

/// Group tasks by recipe
///
/// Groups appear in the order their recipe first occurs; tasks inside a group
/// are sorted by their `order` key (stable, so ties keep insertion order).
pub fn group_tasks_by_recipe(tasks: &[PrepTask]) -> Vec<TaskGroup<'_>> {
    let mut groups: Vec<TaskGroup<'_>> = Vec::new();

    for task in tasks {
        match groups.iter_mut().find(|group| group.recipe_id == task.recipe_id) {
            Some(group) => group.tasks.push(task),
            None => groups.push(TaskGroup {
                recipe_id: &task.recipe_id,
                recipe_name: &task.recipe_name,
                tasks: vec![task],
            }),
        }
    }

    for group in &mut groups {
        group.tasks.sort_by_key(|task| task.order);
    }
    groups
}

/// Progress figures for the prep summary card
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSummary {
    pub completed_tasks: usize,
    pub total_tasks: usize,
    /// Rounded to the nearest whole percent
    pub completion_percentage: u32,
    /// Minutes left across incomplete tasks
    pub remaining_minutes: u32,
    pub total_minutes: u32,
}

pub fn summarize(sheet: &PrepSheet) -> SheetSummary {
    let total_tasks = sheet.tasks.len();
    let completed_tasks = sheet.completed_tasks().count();
    let completion_percentage = if total_tasks > 0 {
        ((completed_tasks as f64 / total_tasks as f64) * 100.0).round() as u32
    } else {
        0
    };
    let remaining_minutes = sheet
        .tasks
        .iter()
        .filter(|task| !task.is_completed)
        .fold(0u32, |total, task| total.saturating_add(task.estimated_time));

    SheetSummary {
        completed_tasks,
        total_tasks,
        completion_percentage,
        remaining_minutes,
        total_minutes: sheet.total_estimated_time,
    }
}

/// Render a duration as `45m`, `2h` or `1h 30m`
pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}
