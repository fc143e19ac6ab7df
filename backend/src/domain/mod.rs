//! Domain services for the finanzas backend.

pub mod ledger_service;
pub mod summary_service;

pub use ledger_service::{validate_entry, LedgerService};
pub use summary_service::SummaryService;
