//! # Finanzas Backend
//!
//! Data layer for the finanzas personal-finance tracker. Users record
//! income, expense, and savings transactions grouped by category and
//! subcategory, and read back per-kind totals.
//!
//! The backend is UI-agnostic and follows a layered architecture:
//!
//! ```text
//! Lifecycle handle (Finanzas)
//!     ↓
//! Domain layer (ledger facade, summary calculation)
//!     ↓
//! Storage layer (SQLite database, typed repositories)
//! ```
//!
//! Every storage operation is asynchronous; nothing in this crate blocks
//! the caller while the engine works.

pub mod app;
pub mod config;
pub mod domain;
pub mod storage;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

pub use app::Finanzas;
pub use config::DbConfig;
pub use domain::{LedgerService, SummaryService};
pub use storage::{FinanzasDb, StorageError};

/// Main application state that holds all services.
#[derive(Clone)]
pub struct AppState {
    pub ledger_service: LedgerService<FinanzasDb>,
    pub summary_service: SummaryService<FinanzasDb>,
}

/// Initialize the backend with all required services.
pub async fn initialize_backend(config: &DbConfig) -> Result<AppState> {
    info!("Setting up database");
    let connection = Arc::new(FinanzasDb::connect(&config.database_url).await?);

    info!("Setting up domain services");
    let ledger_service = LedgerService::new(connection.clone());
    let summary_service = SummaryService::new(connection);

    Ok(AppState {
        ledger_service,
        summary_service,
    })
}
