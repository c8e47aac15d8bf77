//! # Inventory Tests
//!
//! Quantity ledger behaviour and reconciliation of completed prep tasks and
//! served meals into stock levels.

mod test_helpers;

use chrono::NaiveDate;
use kitchen_ledger::inventory::{self, StockStatus};
use kitchen_ledger::inventory_updater::{apply_completed_tasks, apply_meal_consumption};
use kitchen_ledger::meal_log::log_meal;
use test_helpers::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tomatoes_partial_deduction() {
        let stock = vec![inventory_item("1", "Tomatoes", 5.0, 2.0)];
        let task = completed_task("t1", "Tomatoes", 2.0);

        let (updated, report) = apply_completed_tasks(&stock, [&task], test_now());

        assert_eq!(updated[0].quantity, 3.0);
        assert_eq!(updated[0].last_checked, test_now());
        assert!(!updated[0].is_low_stock());
        assert_eq!(report.deductions[0].applied, 2.0);
    }

    #[test]
    fn test_tomatoes_over_deduction_floors_at_zero() {
        let stock = vec![inventory_item("1", "Tomatoes", 5.0, 2.0)];
        let task = completed_task("t1", "Tomatoes", 6.0);

        let (updated, _) = apply_completed_tasks(&stock, [&task], test_now());
        assert_eq!(updated[0].quantity, 0.0);
    }

    #[test]
    fn test_deductions_never_go_negative() {
        let stock = vec![inventory_item("1", "Tomatoes", 5.0, 2.0)];
        for amount in [0.0, 0.5, 4.99, 5.0, 5.01, 1000.0] {
            let task = completed_task("t1", "Tomatoes", amount);
            let (updated, _) = apply_completed_tasks(&stock, [&task], test_now());
            assert!(updated[0].quantity >= 0.0);
            if amount <= 5.0 {
                assert!((updated[0].quantity - (5.0 - amount)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_alert_level_is_inclusive() {
        let item = inventory_item("1", "Tomatoes", 2.0, 2.0);
        assert!(item.is_low_stock());
        assert_eq!(inventory::low_stock(&[item]).len(), 1);
    }

    #[test]
    fn test_unmatched_ingredient_changes_nothing() {
        let stock = vec![inventory_item("1", "Tomatoes", 5.0, 2.0)];
        let task = completed_task("t1", "Roma Tomatoes", 2.0);

        let (updated, report) = apply_completed_tasks(&stock, [&task], test_now());

        assert_eq!(updated, stock);
        assert_eq!(report.unmatched, vec!["Roma Tomatoes".to_string()]);
        assert!(report.deductions.is_empty());
    }

    #[test]
    fn test_meal_consumption_scales_by_servings() {
        let stock = vec![
            inventory_item("1", "Tomatoes", 5.0, 2.0),
            inventory_item("2", "Onions", 3.0, 1.0),
        ];
        let sauce = recipe(
            "1",
            "Tomato Sauce",
            vec![ingredient("Tomatoes", 2.0), ingredient("Onions", 0.5)],
        );
        let log = log_meal(&sauce, &meal_draft("2")).unwrap();

        let (updated, report) = apply_meal_consumption(&stock, &log, test_now());

        assert_eq!(updated[0].quantity, 1.0);
        assert_eq!(updated[1].quantity, 2.0);
        assert_eq!(report.deductions.len(), 2);
    }

    #[test]
    fn test_form_crud_round() {
        let mut items = Vec::new();
        let basil = inventory::add_item(&mut items, &inventory_draft("Basil", "0.2", "kg", "0.1"), test_now()).unwrap();
        assert_eq!(basil.quantity, 0.2);

        let updated = inventory::update_item(
            &mut items,
            &basil.id,
            &inventory_draft("Basil", "0.05", "kg", "0.1"),
            test_now(),
        )
        .unwrap();
        assert!(updated.is_low_stock());

        assert!(inventory::add_item(&mut items, &inventory_draft("Salt", "-1", "kg", ""), test_now()).is_err());
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_stock_status_prefers_low_stock() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 8).unwrap();
        let mut item = inventory_item("1", "Tomatoes", 5.0, 2.0);
        item.expiry_date = NaiveDate::from_ymd_opt(2025, 4, 10);

        assert_eq!(inventory::stock_status(&item, today, 7), StockStatus::ExpiringSoon);
        item.quantity = 1.0;
        assert_eq!(inventory::stock_status(&item, today, 7), StockStatus::LowStock);
    }
}
