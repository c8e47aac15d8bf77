//! # Session Tests
//!
//! Simulated save/refresh latency with paused tokio time: superseded actions
//! never mutate the store, surviving actions apply to current state.

mod test_helpers;

use kitchen_ledger::config::{KitchenConfig, SessionConfig};
use kitchen_ledger::errors::AppError;
use kitchen_ledger::session::{ActionKind, KitchenSession, SessionError};
use kitchen_ledger::store::KitchenStore;
use std::time::Duration;
use test_helpers::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_completed_task() -> KitchenSession {
        let store = KitchenStore::with_fixtures(KitchenConfig::default(), fixtures_with_completed_task()).unwrap();
        KitchenSession::new(store, Duration::from_millis(1000))
    }

    fn tomatoes(session: &KitchenSession) -> f64 {
        session.read(|store| quantity_of(store, "Tomatoes"))
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_waits_for_latency() {
        let session = session_with_completed_task();

        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.save_prep_sheet().await })
        };
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(session.is_pending(ActionKind::SavePrepSheet));
        assert_eq!(tomatoes(&session), 5.0);

        let report = pending.await.unwrap().unwrap();
        assert_eq!(report.applied_task_ids, vec!["task1".to_string()]);
        assert_eq!(tomatoes(&session), 3.0);
        assert!(!session.is_pending(ActionKind::SavePrepSheet));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_save_supersedes_first() {
        let session = session_with_completed_task();

        let first = {
            let session = session.clone();
            tokio::spawn(async move { session.save_prep_sheet().await })
        };
        tokio::time::sleep(Duration::from_millis(300)).await;
        let second = {
            let session = session.clone();
            tokio::spawn(async move { session.save_prep_sheet().await })
        };

        let first = first.await.unwrap();
        assert_eq!(first, Err(SessionError::Superseded("save_prep_sheet")));
        // The superseded save changed nothing
        assert_eq!(tomatoes(&session), 5.0);

        let second = second.await.unwrap().unwrap();
        assert_eq!(second.applied_task_ids.len(), 1);
        assert_eq!(tomatoes(&session), 3.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_cancels_pending_save() {
        let session = session_with_completed_task();

        let save = {
            let session = session.clone();
            tokio::spawn(async move { session.save_prep_sheet().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        session.refresh().await.unwrap();

        assert!(matches!(save.await.unwrap(), Err(SessionError::Superseded(_))));
        assert_eq!(tomatoes(&session), 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_applies_to_current_state() {
        let session = session_with_completed_task();

        let save = {
            let session = session.clone();
            tokio::spawn(async move { session.save_prep_sheet().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Completing task2 while the save waits: it is deducted immediately,
        // and the save must not deduct it a second time
        session
            .update(|store| store.complete_task("task2", true, None, test_now()))
            .unwrap();
        assert_eq!(session.read(|store| quantity_of(store, "Onions")), 2.5);

        let report = save.await.unwrap().unwrap();
        assert_eq!(report.applied_task_ids, vec!["task1".to_string()]);
        assert_eq!(session.read(|store| quantity_of(store, "Onions")), 2.5);
        assert_eq!(tomatoes(&session), 3.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_log_meal_errors_surface_after_latency() {
        let session = KitchenSession::with_config(
            sample_store(),
            &SessionConfig {
                simulated_latency_ms: 250,
            },
        );

        let result = session.log_meal("missing", meal_draft("2")).await;
        assert!(matches!(result, Err(SessionError::App(AppError::NotFound(_)))));

        let outcome = session.log_meal("1", meal_draft("2")).await.unwrap();
        assert!(!outcome.inventory_updated);
        assert_eq!(session.read(|store| store.meal_logs().len()), 2);
    }
}
