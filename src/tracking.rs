//! # Completion & Adjustment Tracker
//!
//! Records task completion, time edits, notes and variance adjustments on a
//! prep sheet, and count adjustments on meal logs. Every function returns an
//! updated copy and leaves the input untouched; nothing here reads or writes
//! inventory (that is the Inventory Updater's job).
//!
//! ## Sheet status
//!
//! ```text
//! in-progress ──complete_sheet──► completed      (irreversible)
//! in-progress ──reset (store)───► in-progress    (restores loaded snapshot)
//! ```
//!
//! A completed sheet rejects further task mutations.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::model::{
    new_id, AdjustmentReason, MealCountAdjustment, MealCountReason, MealLog, PrepSheet,
    PrepSheetStatus, PrepTask, PrepTaskAdjustment, PrepTaskNote,
};
use crate::observability;
use crate::prep_sheet::total_estimated_time;
use crate::validation;

/// Direction for moving a task inside its recipe group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

fn ensure_in_progress(sheet: &PrepSheet) -> AppResult<()> {
    if sheet.is_completed() {
        return Err(AppError::InvalidState(format!(
            "prep sheet '{}' is completed and can no longer be changed",
            sheet.id
        )));
    }
    Ok(())
}

fn task_position(sheet: &PrepSheet, task_id: &str) -> AppResult<usize> {
    sheet
        .tasks
        .iter()
        .position(|task| task.id == task_id)
        .ok_or_else(|| AppError::not_found("prep task", task_id))
}

/// Mark a task complete or incomplete
///
/// Completing records `completed_quantity`, defaulting to the planned
/// quantity. Reopening resets it to 0; inventory is never reversed.
pub fn set_task_completion(
    sheet: &PrepSheet,
    task_id: &str,
    is_completed: bool,
    completed_quantity: Option<f64>,
) -> AppResult<PrepSheet> {
    ensure_in_progress(sheet)?;
    let position = task_position(sheet, task_id)?;

    let recorded = if is_completed {
        match completed_quantity {
            Some(quantity) => validation::check_quantity("completed quantity", quantity)?,
            None => sheet.tasks[position].quantity,
        }
    } else {
        0.0
    };

    let mut updated = sheet.clone();
    let task = &mut updated.tasks[position];
    task.is_completed = is_completed;
    task.completed_quantity = recorded;

    debug!(
        sheet_id = %sheet.id,
        task_id = %task_id,
        is_completed = is_completed,
        completed_quantity = recorded,
        "Task completion updated"
    );
    observability::record_task_completion(is_completed);
    Ok(updated)
}

/// Change a task's estimated minutes and recompute the sheet total
pub fn update_estimated_time(sheet: &PrepSheet, task_id: &str, minutes: u32) -> AppResult<PrepSheet> {
    ensure_in_progress(sheet)?;
    let minutes = validation::check_minutes(minutes)?;
    let position = task_position(sheet, task_id)?;

    let mut updated = sheet.clone();
    updated.tasks[position].estimated_time = minutes;
    updated.total_estimated_time = total_estimated_time(&updated.tasks)?;

    debug!(
        sheet_id = %sheet.id,
        task_id = %task_id,
        minutes = minutes,
        total_minutes = updated.total_estimated_time,
        "Estimated time updated"
    );
    Ok(updated)
}

/// Append a variance adjustment to a task; `difference = expected - actual`
pub fn record_adjustment(
    task: &PrepTask,
    expected_quantity: f64,
    actual_quantity: f64,
    reason: AdjustmentReason,
    notes: &str,
    now: DateTime<Utc>,
) -> AppResult<PrepTask> {
    let expected = validation::check_quantity("expected quantity", expected_quantity)?;
    let actual = validation::check_quantity("actual quantity", actual_quantity)?;

    let mut updated = task.clone();
    updated.adjustments.push(PrepTaskAdjustment {
        id: new_id(),
        timestamp: now,
        expected_quantity: expected,
        actual_quantity: actual,
        difference: expected - actual,
        reason,
        notes: notes.trim().to_string(),
    });

    debug!(task_id = %task.id, reason = %reason, difference = expected - actual, "Prep adjustment recorded");
    observability::record_adjustment("prep_task", reason.as_str());
    Ok(updated)
}

/// Append a count adjustment to a meal log and move its current count
///
/// `initial_count` is the log's current count, `difference = initial - remaining`.
pub fn record_meal_count_adjustment(
    log: &MealLog,
    remaining_count: f64,
    reason: MealCountReason,
    notes: &str,
    now: DateTime<Utc>,
) -> AppResult<MealLog> {
    let remaining = validation::check_quantity("remaining count", remaining_count)?;
    let initial = log.current_count;

    let mut updated = log.clone();
    updated.adjustments.push(MealCountAdjustment {
        id: new_id(),
        timestamp: now,
        initial_count: initial,
        remaining_count: remaining,
        difference: initial - remaining,
        reason,
        notes: validation::optional_text(notes),
    });
    updated.current_count = remaining;

    debug!(log_id = %log.id, reason = %reason, difference = initial - remaining, "Meal count adjusted");
    observability::record_adjustment("meal_log", reason.as_str());
    Ok(updated)
}

/// Replace one task of a sheet, keeping the sheet total consistent
pub fn replace_task(sheet: &PrepSheet, task: PrepTask) -> AppResult<PrepSheet> {
    ensure_in_progress(sheet)?;
    let position = task_position(sheet, &task.id)?;

    let mut updated = sheet.clone();
    updated.tasks[position] = task;
    updated.total_estimated_time = total_estimated_time(&updated.tasks)?;
    Ok(updated)
}

/// Record a task adjustment in place on a sheet
pub fn adjust_task(
    sheet: &PrepSheet,
    task_id: &str,
    actual_quantity: f64,
    reason: AdjustmentReason,
    notes: &str,
    now: DateTime<Utc>,
) -> AppResult<PrepSheet> {
    ensure_in_progress(sheet)?;
    let position = task_position(sheet, task_id)?;
    let task = &sheet.tasks[position];
    let adjusted = record_adjustment(task, task.quantity, actual_quantity, reason, notes, now)?;
    replace_task(sheet, adjusted)
}

/// Attach a note to a task
pub fn add_task_note(
    task: &PrepTask,
    content: &str,
    author: &str,
    is_urgent: bool,
    now: DateTime<Utc>,
) -> AppResult<PrepTask> {
    let content = validation::require_text("note", content)?;
    let author = validation::require_text("author", author)?;

    let mut updated = task.clone();
    updated.notes.push(PrepTaskNote {
        id: new_id(),
        content: content.to_string(),
        timestamp: now,
        author: author.to_string(),
        is_urgent,
    });
    Ok(updated)
}

/// Swap a task's order key with its neighbour in the same recipe group
///
/// Moving past the edge of the group is a no-op.
pub fn move_task(sheet: &PrepSheet, task_id: &str, direction: MoveDirection) -> AppResult<PrepSheet> {
    ensure_in_progress(sheet)?;
    let position = task_position(sheet, task_id)?;
    let task = &sheet.tasks[position];

    let mut siblings: Vec<usize> = sheet
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, other)| other.recipe_id == task.recipe_id)
        .map(|(i, _)| i)
        .collect();
    siblings.sort_by_key(|&i| sheet.tasks[i].order);

    let rank = siblings
        .iter()
        .position(|&i| i == position)
        .ok_or_else(|| AppError::Internal("task missing from its own group".to_string()))?;

    let neighbour = match direction {
        MoveDirection::Up if rank > 0 => siblings[rank - 1],
        MoveDirection::Down if rank + 1 < siblings.len() => siblings[rank + 1],
        _ => return Ok(sheet.clone()),
    };

    let mut updated = sheet.clone();
    let own_order = updated.tasks[position].order;
    updated.tasks[position].order = updated.tasks[neighbour].order;
    updated.tasks[neighbour].order = own_order;
    Ok(updated)
}

/// Close the sheet; this cannot be undone except by a store reset
pub fn complete_sheet(sheet: &PrepSheet) -> AppResult<PrepSheet> {
    ensure_in_progress(sheet)?;
    let mut updated = sheet.clone();
    updated.status = PrepSheetStatus::Completed;
    debug!(sheet_id = %sheet.id, "Prep sheet completed");
    Ok(updated)
}
