//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow
//! different storage backends to be used interchangeably in the domain
//! layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    Category, CategoryKind, NewCategory, NewSubcategory, NewTransaction, Subcategory, Transaction,
};

use crate::storage::error::StorageResult;

/// Trait defining the interface for category storage operations.
///
/// Categories are append-only: the set is seeded at database creation
/// and rows are never updated or deleted afterwards.
#[async_trait]
pub trait CategoryStorage: Send + Sync {
    /// Store a new category, returning its assigned id.
    /// Category names are unique; a duplicate fails with a constraint
    /// violation.
    async fn store_category(&self, category: &NewCategory) -> StorageResult<i64>;

    /// Retrieve a specific category by id
    async fn get_category(&self, category_id: i64) -> StorageResult<Option<Category>>;

    /// Retrieve the seeded category of a given kind
    async fn get_category_by_kind(&self, kind: CategoryKind) -> StorageResult<Option<Category>>;

    /// List all categories ordered by id
    async fn list_categories(&self) -> StorageResult<Vec<Category>>;
}

/// Trait defining the interface for subcategory storage operations
#[async_trait]
pub trait SubcategoryStorage: Send + Sync {
    /// Store a new subcategory, returning its assigned id.
    /// Names are free-form and not unique.
    async fn store_subcategory(&self, subcategory: &NewSubcategory) -> StorageResult<i64>;

    /// Retrieve a specific subcategory by id
    async fn get_subcategory(&self, subcategory_id: i64) -> StorageResult<Option<Subcategory>>;

    /// List all subcategories ordered by id
    async fn list_subcategories(&self) -> StorageResult<Vec<Subcategory>>;

    /// List the subcategories belonging to one category
    async fn list_subcategories_by_category(
        &self,
        category_id: i64,
    ) -> StorageResult<Vec<Subcategory>>;
}

/// Trait defining the interface for transaction storage operations
#[async_trait]
pub trait TransactionStorage: Send + Sync {
    /// Store a new transaction, returning its assigned id.
    /// A missing date is coerced to the current time.
    async fn store_transaction(&self, transaction: &NewTransaction) -> StorageResult<i64>;

    /// Retrieve a specific transaction by id
    async fn get_transaction(&self, transaction_id: i64) -> StorageResult<Option<Transaction>>;

    /// List all transactions in chronological order
    async fn list_transactions(&self) -> StorageResult<Vec<Transaction>>;

    /// List the transactions recorded under one category
    async fn list_transactions_by_category(
        &self,
        category_id: i64,
    ) -> StorageResult<Vec<Transaction>>;

    /// List the transactions recorded under one subcategory
    async fn list_transactions_by_subcategory(
        &self,
        subcategory_id: i64,
    ) -> StorageResult<Vec<Transaction>>;

    /// List transactions with `start <= date < end`
    async fn list_transactions_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<Transaction>>;

    /// Replace an existing transaction wholesale, keyed by id.
    /// Fails with `NotFound` when the id does not exist; an update never
    /// inserts.
    async fn update_transaction(&self, transaction: &Transaction) -> StorageResult<()>;

    /// Delete a single transaction.
    /// Returns true if a row was deleted. Deleting an absent id is
    /// engine success with zero rows affected, reported as false.
    async fn delete_transaction(&self, transaction_id: i64) -> StorageResult<bool>;
}

/// Trait defining the interface for storage connections.
///
/// This abstracts away the specific connection type and provides factory
/// methods for creating repositories, so the domain layer can work with
/// any storage backend without knowing the implementation details.
pub trait Connection: Send + Sync + Clone {
    /// The type of CategoryStorage this connection creates
    type CategoryRepository: CategoryStorage + Clone;

    /// The type of SubcategoryStorage this connection creates
    type SubcategoryRepository: SubcategoryStorage + Clone;

    /// The type of TransactionStorage this connection creates
    type TransactionRepository: TransactionStorage + Clone;

    /// Create a new category repository for this connection
    fn create_category_repository(&self) -> Self::CategoryRepository;

    /// Create a new subcategory repository for this connection
    fn create_subcategory_repository(&self) -> Self::SubcategoryRepository;

    /// Create a new transaction repository for this connection
    fn create_transaction_repository(&self) -> Self::TransactionRepository;
}
