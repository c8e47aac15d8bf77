//! # Kitchen Session
//!
//! Async front for a shared [`KitchenStore`]. Saving, refreshing and meal
//! logging take a configurable simulated latency before they touch the
//! store. While an action waits it can be superseded:
//!
//! - starting an action of the same kind cancels the pending one
//! - `refresh` also cancels a pending save
//!
//! A superseded action resolves to [`SessionError::Superseded`] and never
//! mutates the store. An action that survives its wait applies to the state
//! as it is at that moment, under the write lock, so two actions can never
//! overwrite each other's results with stale copies.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::errors::{AppError, AppResult};
use crate::meal_log::MealLogDraft;
use crate::observability;
use crate::store::{KitchenStore, MealLogOutcome, SaveReport};

/// Session action failure
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// A newer action replaced this one before it ran
    Superseded(&'static str),
    /// The store rejected the action
    App(AppError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Superseded(action) => write!(f, "[SUPERSEDED] {} was replaced by a newer request", action),
            SessionError::App(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<AppError> for SessionError {
    fn from(err: AppError) -> Self {
        SessionError::App(err)
    }
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Actions that supersede earlier actions of the same kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SavePrepSheet,
    Refresh,
    LogMeal,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::SavePrepSheet => "save_prep_sheet",
            ActionKind::Refresh => "refresh",
            ActionKind::LogMeal => "log_meal",
        }
    }
}

#[derive(Clone)]
pub struct KitchenSession {
    store: Arc<RwLock<KitchenStore>>,
    latency: Duration,
    pending: Arc<Mutex<HashMap<ActionKind, (u64, CancellationToken)>>>,
    next_ticket: Arc<AtomicU64>,
}

impl KitchenSession {
    pub fn new(store: KitchenStore, latency: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            latency,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn with_config(store: KitchenStore, config: &SessionConfig) -> Self {
        Self::new(store, config.latency())
    }

    /// Shared handle to the underlying store
    pub fn store(&self) -> Arc<RwLock<KitchenStore>> {
        Arc::clone(&self.store)
    }

    /// Read the store under the shared lock
    pub fn read<R>(&self, f: impl FnOnce(&KitchenStore) -> R) -> R {
        f(&*self.store.read())
    }

    /// Mutate the store immediately, without simulated latency
    pub fn update<R>(&self, f: impl FnOnce(&mut KitchenStore) -> R) -> R {
        f(&mut *self.store.write())
    }

    /// Cancel the pending action of `kind`, returning whether one was waiting
    pub fn cancel(&self, kind: ActionKind) -> bool {
        match self.pending.lock().remove(&kind) {
            Some((_, token)) => {
                token.cancel();
                debug!(action = kind.as_str(), "Pending action cancelled");
                true
            }
            None => false,
        }
    }

    /// Whether an action of `kind` is waiting to run
    pub fn is_pending(&self, kind: ActionKind) -> bool {
        self.pending.lock().contains_key(&kind)
    }

    fn begin(&self, kind: ActionKind) -> (u64, CancellationToken) {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();

        if let Some((_, previous)) = self.pending.lock().insert(kind, (ticket, token.clone())) {
            previous.cancel();
            debug!(action = kind.as_str(), "Superseding pending action");
        }
        (ticket, token)
    }

    fn finish(&self, kind: ActionKind, ticket: u64) {
        let mut pending = self.pending.lock();
        if pending.get(&kind).is_some_and(|(current, _)| *current == ticket) {
            pending.remove(&kind);
        }
    }

    async fn run<T, F>(&self, kind: ActionKind, action: F) -> SessionResult<T>
    where
        F: FnOnce(&mut KitchenStore) -> AppResult<T>,
    {
        let started = Instant::now();
        let (ticket, token) = self.begin(kind);
        let pending_guard = PendingGuard {
            session: self,
            kind,
            ticket,
        };

        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => Err(SessionError::Superseded(kind.as_str())),
            _ = tokio::time::sleep(self.latency) => {
                let mut store = self.store.write();
                action(&mut *store).map_err(SessionError::from)
            }
        };
        drop(pending_guard);

        let label = match &outcome {
            Ok(_) => "applied",
            Err(SessionError::Superseded(_)) => "superseded",
            Err(SessionError::App(_)) => "failed",
        };
        debug!(action = kind.as_str(), outcome = label, "Session action finished");
        observability::record_session_action(kind.as_str(), label, started.elapsed());
        outcome
    }

    /// Deduct completed tasks after the simulated save delay
    pub async fn save_prep_sheet(&self) -> SessionResult<SaveReport> {
        self.run(ActionKind::SavePrepSheet, |store| store.save_prep_sheet(Utc::now()))
            .await
    }

    /// Restore the loaded prep sheet and inventory, dropping any pending save
    pub async fn refresh(&self) -> SessionResult<()> {
        self.cancel(ActionKind::SavePrepSheet);
        self.run(ActionKind::Refresh, |store| {
            store.reset();
            Ok(())
        })
        .await?;
        info!("Kitchen state refreshed");
        Ok(())
    }

    pub async fn log_meal(&self, recipe_id: &str, draft: MealLogDraft) -> SessionResult<MealLogOutcome> {
        self.run(ActionKind::LogMeal, |store| store.log_meal(recipe_id, &draft, Utc::now()))
            .await
    }
}

/// Clears a pending entry when its action ends, including when the caller
/// drops the future mid-wait
struct PendingGuard<'a> {
    session: &'a KitchenSession,
    kind: ActionKind,
    ticket: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.session.finish(self.kind, self.ticket);
    }
}
