//! # Storage Layer
//!
//! Owns the SQLite database handle and exposes typed CRUD over the three
//! collections (categories, subcategories, transactions) so callers never
//! touch engine-specific primitives.

pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use sqlite::FinanzasDb;
pub use traits::{CategoryStorage, Connection, SubcategoryStorage, TransactionStorage};
