//! Financial summary calculation.
//!
//! Totals are derived on demand by joining the full transaction set
//! against the category table in memory; nothing here is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::debug;

use shared::{CategoryKind, FinancialSummary, Transaction};

use crate::storage::{CategoryStorage, Connection, TransactionStorage};

#[derive(Clone)]
pub struct SummaryService<C: Connection> {
    category_repository: C::CategoryRepository,
    transaction_repository: C::TransactionRepository,
}

impl<C: Connection> SummaryService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        let category_repository = connection.create_category_repository();
        let transaction_repository = connection.create_transaction_repository();
        Self {
            category_repository,
            transaction_repository,
        }
    }

    /// Aggregate every transaction into income/expense/savings totals
    /// and the resulting balance.
    pub async fn compute_summary(&self) -> Result<FinancialSummary> {
        let transactions = self.transaction_repository.list_transactions().await?;
        self.summarize(&transactions).await
    }

    /// The same aggregation restricted to `start <= date < end`.
    pub async fn summary_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<FinancialSummary> {
        let transactions = self
            .transaction_repository
            .list_transactions_by_date_range(start, end)
            .await?;
        self.summarize(&transactions).await
    }

    async fn summarize(&self, transactions: &[Transaction]) -> Result<FinancialSummary> {
        let categories = self.category_repository.list_categories().await?;
        let kinds: HashMap<i64, CategoryKind> =
            categories.into_iter().map(|c| (c.id, c.kind)).collect();

        let mut total_income = 0.0;
        let mut total_expense = 0.0;
        let mut total_savings = 0.0;

        for transaction in transactions {
            // A transaction whose category no longer resolves is
            // skipped rather than treated as an error.
            match kinds.get(&transaction.category_id) {
                Some(CategoryKind::Income) => total_income += transaction.amount,
                Some(CategoryKind::Expense) => total_expense += transaction.amount,
                Some(CategoryKind::Savings) => total_savings += transaction.amount,
                None => debug!(
                    "Skipping transaction {} with unresolved category {}",
                    transaction.id, transaction.category_id
                ),
            }
        }

        Ok(FinancialSummary::new(
            total_income,
            total_expense,
            total_savings,
        ))
    }
}
