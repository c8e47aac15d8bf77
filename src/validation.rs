//! Validation module for form input
//!
//! Every add/edit form in the kitchen (inventory items, recipes, ingredients,
//! meal logs, task time edits, count adjustments) arrives as strings. This
//! module turns those strings into typed values or rejects them with an
//! `AppError::Validation`, so callers never mutate state with half-parsed input:
//!
//! - Required text fields
//! - Quantities (decimals, fractions, European comma)
//! - Whole minutes and servings
//! - Calendar dates and times of day

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DECIMAL_PATTERN: Regex =
        Regex::new(r"^-?\d+(?:[.,]\d+)?$").expect("Invalid decimal regex pattern");
    static ref FRACTION_PATTERN: Regex =
        Regex::new(r"^(\d+)\s*/\s*(\d+)$").expect("Invalid fraction regex pattern");
    static ref WHOLE_NUMBER_PATTERN: Regex =
        Regex::new(r"^\d+$").expect("Invalid whole number regex pattern");
    static ref DATE_PATTERN: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex pattern");
    static ref TIME_PATTERN: Regex =
        Regex::new(r"^\d{1,2}:\d{2}$").expect("Invalid time regex pattern");
}

/// Largest quantity accepted from a form
pub const MAX_QUANTITY: f64 = 100_000.0;

/// Longest estimated time accepted for a single prep task, in minutes
pub const MAX_TASK_MINUTES: u32 = 24 * 60;

/// Longest name accepted for items, recipes and ingredients
pub const MAX_NAME_LEN: usize = 255;

/// Validates a required text field and returns it trimmed
///
/// # Examples
/// ```
/// use kitchen_ledger::validation::require_text;
///
/// assert_eq!(require_text("name", "  Tomatoes ").unwrap(), "Tomatoes");
/// assert!(require_text("name", "   ").is_err());
/// ```
pub fn require_text<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }

    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "{} cannot be longer than {} characters",
            field, MAX_NAME_LEN
        )));
    }

    Ok(trimmed)
}

/// Trim an optional free-text field, mapping blank input to `None`
pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a number the way a cook types it: `2`, `2.5`, `2,5` or `1/2`
///
/// Returns `None` for anything that is not a finite number.
pub fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();

    if let Some(captures) = FRACTION_PATTERN.captures(trimmed) {
        let numerator = captures.get(1)?.as_str().parse::<f64>().ok()?;
        let denominator = captures.get(2)?.as_str().parse::<f64>().ok()?;
        if denominator == 0.0 {
            return None;
        }
        return Some(numerator / denominator);
    }

    if DECIMAL_PATTERN.is_match(trimmed) {
        // European format uses a comma as decimal separator
        return trimmed.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite());
    }

    None
}

/// Parse a stock or prep quantity (zero allowed)
pub fn parse_quantity(field: &str, input: &str) -> AppResult<f64> {
    let value = parse_number(input)
        .ok_or_else(|| AppError::Validation(format!("{} must be a number", field)))?;
    check_quantity(field, value)
}

/// Parse a quantity that must be strictly positive (recipe ingredient amounts)
pub fn parse_positive_quantity(field: &str, input: &str) -> AppResult<f64> {
    let value = parse_quantity(field, input)?;
    if value <= 0.0 {
        return Err(AppError::Validation(format!("{} must be greater than 0", field)));
    }
    Ok(value)
}

/// Check an already numeric quantity against the accepted range
pub fn check_quantity(field: &str, value: f64) -> AppResult<f64> {
    if !value.is_finite() {
        return Err(AppError::Validation(format!("{} must be a number", field)));
    }
    if value < 0.0 {
        return Err(AppError::Validation(format!("{} cannot be negative", field)));
    }
    if value > MAX_QUANTITY {
        return Err(AppError::Validation(format!(
            "{} cannot be greater than {}",
            field, MAX_QUANTITY
        )));
    }
    Ok(value)
}

/// Parse an alert level leniently: blank or unparsable input means 0
pub fn parse_alert_level(input: &str) -> AppResult<f64> {
    match parse_number(input) {
        Some(value) => check_quantity("alert level", value),
        None => Ok(0.0),
    }
}

/// Parse an estimated prep time in whole minutes (must be > 0)
///
/// # Examples
/// ```
/// use kitchen_ledger::validation::parse_minutes;
///
/// assert_eq!(parse_minutes("25").unwrap(), 25);
/// assert!(parse_minutes("0").is_err());
/// assert!(parse_minutes("ten").is_err());
/// ```
pub fn parse_minutes(input: &str) -> AppResult<u32> {
    let minutes = parse_whole_number("estimated time", input)?;
    check_minutes(minutes)
}

/// Check an estimated prep time lies in `1..=MAX_TASK_MINUTES`
pub fn check_minutes(minutes: u32) -> AppResult<u32> {
    if minutes == 0 {
        return Err(AppError::Validation(
            "estimated time must be greater than 0".to_string(),
        ));
    }
    if minutes > MAX_TASK_MINUTES {
        return Err(AppError::Validation(format!(
            "estimated time cannot be greater than {} minutes",
            MAX_TASK_MINUTES
        )));
    }
    Ok(minutes)
}

/// Parse a number of servings (must be > 0)
pub fn parse_servings(input: &str) -> AppResult<u32> {
    let servings = parse_whole_number("servings", input)?;
    if servings == 0 {
        return Err(AppError::Validation("servings must be greater than 0".to_string()));
    }
    Ok(servings)
}

fn parse_whole_number(field: &str, input: &str) -> AppResult<u32> {
    let trimmed = input.trim();
    if !WHOLE_NUMBER_PATTERN.is_match(trimmed) {
        return Err(AppError::Validation(format!("{} must be a whole number", field)));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| AppError::Validation(format!("{} is too large", field)))
}

/// Parse a `YYYY-MM-DD` calendar date
pub fn parse_date(input: &str) -> AppResult<NaiveDate> {
    let trimmed = input.trim();
    if !DATE_PATTERN.is_match(trimmed) {
        return Err(AppError::Validation(format!(
            "date '{}' must use the YYYY-MM-DD format",
            trimmed
        )));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("date '{}' does not exist", trimmed)))
}

/// Parse an optional `YYYY-MM-DD` date where blank input means "no date"
pub fn parse_optional_date(input: &str) -> AppResult<Option<NaiveDate>> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_date(input).map(Some)
}

/// Parse an `HH:MM` time of day
pub fn parse_time(input: &str) -> AppResult<NaiveTime> {
    let trimmed = input.trim();
    if !TIME_PATTERN.is_match(trimmed) {
        return Err(AppError::Validation(format!(
            "time '{}' must use the HH:MM format",
            trimmed
        )));
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .map_err(|_| AppError::Validation(format!("time '{}' is not a valid time", trimmed)))
}
