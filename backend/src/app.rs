//! Application lifecycle handle.
//!
//! `Finanzas` owns the backend for the lifetime of its consumer scope.
//! The handle is constructed explicitly and injected where it is needed;
//! `initialize` opens the storage exactly once, and an initialization
//! failure is caught and exposed as an error state instead of being
//! re-thrown. Until initialization succeeds, the facade conveniences on
//! the handle are no-ops returning `Ok(None)` — early calls are not
//! queued, callers gate on readiness themselves.

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{error, info};

use shared::{FinancialSummary, NewEntry, Transaction};

use crate::config::DbConfig;
use crate::{initialize_backend, AppState};

enum LifecycleState {
    Loading,
    Ready(AppState),
    Failed(String),
}

/// Handle that owns one backend instance and its initialization state.
pub struct Finanzas {
    config: DbConfig,
    state: RwLock<LifecycleState>,
}

impl Finanzas {
    /// Create an uninitialized handle. Nothing is opened yet.
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            state: RwLock::new(LifecycleState::Loading),
        }
    }

    /// Open the database and build the services. The first call decides
    /// the outcome; later calls are no-ops whether it succeeded or
    /// failed. A failure is recorded for [`Finanzas::error`] rather
    /// than returned.
    pub async fn initialize(&self) {
        let mut state = self.state.write().await;
        if !matches!(*state, LifecycleState::Loading) {
            return;
        }

        match initialize_backend(&self.config).await {
            Ok(app_state) => {
                info!("Backend initialized at {}", self.config.database_url);
                *state = LifecycleState::Ready(app_state);
            }
            Err(err) => {
                error!("Backend initialization failed: {err:#}");
                *state = LifecycleState::Failed(format!("{err:#}"));
            }
        }
    }

    pub async fn is_loading(&self) -> bool {
        matches!(*self.state.read().await, LifecycleState::Loading)
    }

    pub async fn is_ready(&self) -> bool {
        matches!(*self.state.read().await, LifecycleState::Ready(_))
    }

    /// The stored initialization failure, if any.
    pub async fn error(&self) -> Option<String> {
        match &*self.state.read().await {
            LifecycleState::Failed(message) => Some(message.clone()),
            _ => None,
        }
    }

    /// Cloneable services, once ready.
    pub async fn state(&self) -> Option<AppState> {
        match &*self.state.read().await {
            LifecycleState::Ready(app_state) => Some(app_state.clone()),
            _ => None,
        }
    }

    /// Record income; `Ok(None)` while the handle is not ready.
    pub async fn record_income(&self, entry: NewEntry) -> Result<Option<i64>> {
        match self.state().await {
            Some(app_state) => Ok(Some(app_state.ledger_service.record_income(entry).await?)),
            None => Ok(None),
        }
    }

    /// Record an expense; `Ok(None)` while the handle is not ready.
    pub async fn record_expense(&self, entry: NewEntry) -> Result<Option<i64>> {
        match self.state().await {
            Some(app_state) => Ok(Some(app_state.ledger_service.record_expense(entry).await?)),
            None => Ok(None),
        }
    }

    /// Record savings; `Ok(None)` while the handle is not ready.
    pub async fn record_savings(&self, entry: NewEntry) -> Result<Option<i64>> {
        match self.state().await {
            Some(app_state) => Ok(Some(app_state.ledger_service.record_savings(entry).await?)),
            None => Ok(None),
        }
    }

    /// Current totals; `Ok(None)` while the handle is not ready.
    pub async fn summary(&self) -> Result<Option<FinancialSummary>> {
        match self.state().await {
            Some(app_state) => Ok(Some(app_state.summary_service.compute_summary().await?)),
            None => Ok(None),
        }
    }

    /// All transactions; `Ok(None)` while the handle is not ready.
    pub async fn transactions(&self) -> Result<Option<Vec<Transaction>>> {
        match self.state().await {
            Some(app_state) => Ok(Some(app_state.ledger_service.list_transactions().await?)),
            None => Ok(None),
        }
    }

    /// Totals within `start <= date < end`; `Ok(None)` while not ready.
    pub async fn summary_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<FinancialSummary>> {
        match self.state().await {
            Some(app_state) => Ok(Some(
                app_state
                    .summary_service
                    .summary_between(start, end)
                    .await?,
            )),
            None => Ok(None),
        }
    }
}
