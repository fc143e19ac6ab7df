//! Ledger service: the entry points money is recorded through.
//!
//! `record_income`, `record_expense`, and `record_savings` fix the
//! category to the seeded one of the matching kind and default a missing
//! date to now, then delegate to the transaction repository. The service
//! also carries the pass-through CRUD the views use directly, and the
//! form-entry validation.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use shared::{
    Category, CategoryKind, EntryValidation, EntryValidationError, NewCategory, NewEntry,
    NewSubcategory, NewTransaction, Subcategory, Transaction,
};

use crate::storage::{CategoryStorage, Connection, SubcategoryStorage, TransactionStorage};

/// Longest accepted description, matching the entry-form limit.
pub const MAX_DESCRIPTION_LENGTH: usize = 256;

#[derive(Clone)]
pub struct LedgerService<C: Connection> {
    category_repository: C::CategoryRepository,
    subcategory_repository: C::SubcategoryRepository,
    transaction_repository: C::TransactionRepository,
}

impl<C: Connection> LedgerService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let category_repository = connection.create_category_repository();
        let subcategory_repository = connection.create_subcategory_repository();
        let transaction_repository = connection.create_transaction_repository();
        Self {
            category_repository,
            subcategory_repository,
            transaction_repository,
        }
    }

    /// Record income against the seeded income category.
    pub async fn record_income(&self, entry: NewEntry) -> Result<i64> {
        self.record_with_kind(CategoryKind::Income, entry).await
    }

    /// Record an expense against the seeded expense category.
    pub async fn record_expense(&self, entry: NewEntry) -> Result<i64> {
        self.record_with_kind(CategoryKind::Expense, entry).await
    }

    /// Record savings against the seeded savings category.
    pub async fn record_savings(&self, entry: NewEntry) -> Result<i64> {
        self.record_with_kind(CategoryKind::Savings, entry).await
    }

    async fn record_with_kind(&self, kind: CategoryKind, entry: NewEntry) -> Result<i64> {
        let category = self
            .category_repository
            .get_category_by_kind(kind)
            .await?
            .ok_or_else(|| anyhow!("no category of kind {kind} exists"))?;

        self.record_transaction(NewTransaction {
            category_id: category.id,
            subcategory_id: entry.subcategory_id,
            amount: entry.amount,
            description: entry.description,
            date: entry.date,
        })
        .await
    }

    /// Record a fully specified transaction.
    pub async fn record_transaction(&self, transaction: NewTransaction) -> Result<i64> {
        if let Some(description) = &transaction.description {
            if description.len() > MAX_DESCRIPTION_LENGTH {
                return Err(anyhow!(
                    "Description must be at most {MAX_DESCRIPTION_LENGTH} characters"
                ));
            }
        }

        let id = self
            .transaction_repository
            .store_transaction(&transaction)
            .await?;
        info!(
            "Recorded transaction {} under category {}",
            id, transaction.category_id
        );
        Ok(id)
    }

    /// Replace an existing transaction. Fails when the id is unknown.
    pub async fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        self.transaction_repository
            .update_transaction(transaction)
            .await?;
        info!("Updated transaction {}", transaction.id);
        Ok(())
    }

    /// Delete a transaction, reporting whether a row existed.
    pub async fn delete_transaction(&self, transaction_id: i64) -> Result<bool> {
        let deleted = self
            .transaction_repository
            .delete_transaction(transaction_id)
            .await?;
        info!(
            "Delete of transaction {}: existed = {}",
            transaction_id, deleted
        );
        Ok(deleted)
    }

    pub async fn get_transaction(&self, transaction_id: i64) -> Result<Option<Transaction>> {
        Ok(self
            .transaction_repository
            .get_transaction(transaction_id)
            .await?)
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.transaction_repository.list_transactions().await?)
    }

    pub async fn list_transactions_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .transaction_repository
            .list_transactions_by_category(category_id)
            .await?)
    }

    pub async fn list_transactions_by_subcategory(
        &self,
        subcategory_id: i64,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .transaction_repository
            .list_transactions_by_subcategory(subcategory_id)
            .await?)
    }

    pub async fn list_transactions_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        Ok(self
            .transaction_repository
            .list_transactions_by_date_range(start, end)
            .await?)
    }

    /// Add a category. Names are unique; categories are append-only.
    pub async fn add_category(&self, category: NewCategory) -> Result<i64> {
        Ok(self.category_repository.store_category(&category).await?)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(self.category_repository.list_categories().await?)
    }

    /// Add a subcategory under an existing category.
    pub async fn add_subcategory(&self, subcategory: NewSubcategory) -> Result<i64> {
        Ok(self
            .subcategory_repository
            .store_subcategory(&subcategory)
            .await?)
    }

    pub async fn list_subcategories(&self) -> Result<Vec<Subcategory>> {
        Ok(self.subcategory_repository.list_subcategories().await?)
    }

    pub async fn list_subcategories_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Subcategory>> {
        Ok(self
            .subcategory_repository
            .list_subcategories_by_category(category_id)
            .await?)
    }
}

/// Validate form input the way the entry forms do, returning every
/// problem at once rather than failing on the first.
pub fn validate_entry(description: Option<&str>, amount: f64) -> EntryValidation {
    let mut errors = Vec::new();

    if let Some(description) = description {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            errors.push(EntryValidationError::EmptyDescription);
        } else if trimmed.len() > MAX_DESCRIPTION_LENGTH {
            errors.push(EntryValidationError::DescriptionTooLong(trimmed.len()));
        }
    }

    if !amount.is_finite() {
        errors.push(EntryValidationError::InvalidAmount(amount.to_string()));
    } else if amount <= 0.0 {
        errors.push(EntryValidationError::AmountNotPositive);
    } else if has_too_many_decimal_places(amount) {
        errors.push(EntryValidationError::AmountPrecisionTooHigh);
    }

    EntryValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// Amounts are money; more than two significant decimal places is a
/// form mistake, not a rounding artifact we should store.
fn has_too_many_decimal_places(amount: f64) -> bool {
    let amount_str = format!("{:.3}", amount);
    if let Some(decimal_pos) = amount_str.find('.') {
        let decimal_part = &amount_str[decimal_pos + 1..];
        if decimal_part.len() > 2 && !decimal_part.ends_with('0') {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::FinanzasDb;

    async fn setup() -> LedgerService<FinanzasDb> {
        let db = FinanzasDb::connect_test().await.expect("test database");
        LedgerService::new(Arc::new(db))
    }

    fn entry(amount: f64) -> NewEntry {
        NewEntry {
            subcategory_id: 1,
            amount,
            description: Some("test entry".to_string()),
            date: None,
        }
    }

    #[tokio::test]
    async fn facade_entries_land_under_the_seeded_kind() {
        let ledger = setup().await;

        let income_id = ledger.record_income(entry(100.0)).await.expect("income");
        let expense_id = ledger.record_expense(entry(40.0)).await.expect("expense");
        let savings_id = ledger.record_savings(entry(10.0)).await.expect("savings");

        let categories = ledger.list_categories().await.expect("list categories");
        let kind_of = |id: i64| {
            categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.kind)
                .expect("category resolves")
        };

        for (transaction_id, expected) in [
            (income_id, CategoryKind::Income),
            (expense_id, CategoryKind::Expense),
            (savings_id, CategoryKind::Savings),
        ] {
            let stored = ledger
                .get_transaction(transaction_id)
                .await
                .expect("query")
                .expect("stored transaction");
            assert_eq!(kind_of(stored.category_id), expected);
        }
    }

    #[tokio::test]
    async fn overlong_description_is_rejected_before_storage() {
        let ledger = setup().await;

        let result = ledger
            .record_income(NewEntry {
                subcategory_id: 1,
                amount: 5.0,
                description: Some("x".repeat(MAX_DESCRIPTION_LENGTH + 1)),
                date: None,
            })
            .await;
        assert!(result.is_err());
        assert!(ledger
            .list_transactions()
            .await
            .expect("list")
            .is_empty());
    }

    #[tokio::test]
    async fn subcategories_can_be_added_and_listed_per_category() {
        let ledger = setup().await;
        let categories = ledger.list_categories().await.expect("list categories");
        let expenses = categories
            .iter()
            .find(|c| c.kind == CategoryKind::Expense)
            .expect("seeded expense category");

        ledger
            .add_subcategory(NewSubcategory {
                name: "Viajes".to_string(),
                category_id: expenses.id,
            })
            .await
            .expect("add subcategory");

        let names: Vec<String> = ledger
            .list_subcategories_by_category(expenses.id)
            .await
            .expect("list by category")
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert!(names.contains(&"Viajes".to_string()));
    }

    #[test]
    fn validation_accepts_a_sane_entry() {
        let validation = validate_entry(Some("Cena con amigos"), 24.5);
        assert!(validation.is_valid);
        assert!(validation.errors.is_empty());
    }

    #[test]
    fn validation_flags_each_problem() {
        let validation = validate_entry(Some("   "), -3.0);
        assert!(!validation.is_valid);
        assert!(validation
            .errors
            .contains(&EntryValidationError::EmptyDescription));
        assert!(validation
            .errors
            .contains(&EntryValidationError::AmountNotPositive));

        let validation = validate_entry(None, f64::NAN);
        assert!(matches!(
            validation.errors.as_slice(),
            [EntryValidationError::InvalidAmount(_)]
        ));

        let validation = validate_entry(Some("ok"), 1.001);
        assert!(validation
            .errors
            .contains(&EntryValidationError::AmountPrecisionTooHigh));

        let validation = validate_entry(Some(&"y".repeat(300)), 2.0);
        assert!(validation
            .errors
            .contains(&EntryValidationError::DescriptionTooLong(300)));
    }
}
