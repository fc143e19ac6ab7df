//! SQLite implementation of the storage layer, backed by sqlx.

pub mod db;
pub mod repositories;

pub use db::FinanzasDb;
pub use repositories::{CategoryRepository, SubcategoryRepository, TransactionRepository};
