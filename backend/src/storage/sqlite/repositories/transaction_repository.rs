use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use shared::{NewTransaction, Transaction};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::sqlite::db::FinanzasDb;
use crate::storage::traits::TransactionStorage;

/// Repository for transaction operations.
///
/// Dates are stored as RFC 3339 text in UTC, so the date index orders
/// rows chronologically and range scans compare lexically.
#[derive(Clone)]
pub struct TransactionRepository {
    db: FinanzasDb,
}

impl TransactionRepository {
    pub fn new(db: FinanzasDb) -> Self {
        Self { db }
    }

    fn transaction_from_row(row: &SqliteRow) -> StorageResult<Transaction> {
        let date_raw: String = row.get("date");
        let date = DateTime::parse_from_rfc3339(&date_raw)
            .map_err(|e| StorageError::ReadFailed(format!("invalid date '{date_raw}': {e}")))?
            .with_timezone(&Utc);

        Ok(Transaction {
            id: row.get("id"),
            category_id: row.get("category_id"),
            subcategory_id: row.get("subcategory_id"),
            amount: row.get("amount"),
            description: row.get("description"),
            date,
        })
    }

    fn transactions_from_rows(rows: &[SqliteRow]) -> StorageResult<Vec<Transaction>> {
        rows.iter().map(Self::transaction_from_row).collect()
    }
}

#[async_trait]
impl TransactionStorage for TransactionRepository {
    async fn store_transaction(&self, transaction: &NewTransaction) -> StorageResult<i64> {
        // Missing dates are coerced to "now" at this boundary.
        let date = transaction.date.unwrap_or_else(Utc::now);

        let result = sqlx::query(
            r#"
            INSERT INTO transacciones (category_id, subcategory_id, amount, description, date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.category_id)
        .bind(transaction.subcategory_id)
        .bind(transaction.amount)
        .bind(&transaction.description)
        .bind(date.to_rfc3339())
        .execute(self.db.pool())
        .await
        .map_err(StorageError::from_write)?;

        Ok(result.last_insert_rowid())
    }

    async fn get_transaction(&self, transaction_id: i64) -> StorageResult<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, category_id, subcategory_id, amount, description, date
            FROM transacciones
            WHERE id = ?
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(self.db.pool())
        .await
        .map_err(StorageError::from_read)?;

        row.as_ref().map(Self::transaction_from_row).transpose()
    }

    async fn list_transactions(&self) -> StorageResult<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category_id, subcategory_id, amount, description, date
            FROM transacciones
            ORDER BY date, id
            "#,
        )
        .fetch_all(self.db.pool())
        .await
        .map_err(StorageError::from_read)?;

        Self::transactions_from_rows(&rows)
    }

    async fn list_transactions_by_category(
        &self,
        category_id: i64,
    ) -> StorageResult<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category_id, subcategory_id, amount, description, date
            FROM transacciones
            WHERE category_id = ?
            ORDER BY date, id
            "#,
        )
        .bind(category_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(StorageError::from_read)?;

        Self::transactions_from_rows(&rows)
    }

    async fn list_transactions_by_subcategory(
        &self,
        subcategory_id: i64,
    ) -> StorageResult<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category_id, subcategory_id, amount, description, date
            FROM transacciones
            WHERE subcategory_id = ?
            ORDER BY date, id
            "#,
        )
        .bind(subcategory_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(StorageError::from_read)?;

        Self::transactions_from_rows(&rows)
    }

    async fn list_transactions_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category_id, subcategory_id, amount, description, date
            FROM transacciones
            WHERE date >= ? AND date < ?
            ORDER BY date, id
            "#,
        )
        .bind(start.to_rfc3339())
        .bind(end.to_rfc3339())
        .fetch_all(self.db.pool())
        .await
        .map_err(StorageError::from_read)?;

        Self::transactions_from_rows(&rows)
    }

    async fn update_transaction(&self, transaction: &Transaction) -> StorageResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transacciones
            SET category_id = ?, subcategory_id = ?, amount = ?, description = ?, date = ?
            WHERE id = ?
            "#,
        )
        .bind(transaction.category_id)
        .bind(transaction.subcategory_id)
        .bind(transaction.amount)
        .bind(&transaction.description)
        .bind(transaction.date.to_rfc3339())
        .bind(transaction.id)
        .execute(self.db.pool())
        .await
        .map_err(StorageError::from_write)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!(
                "transaction {} does not exist",
                transaction.id
            )));
        }

        Ok(())
    }

    async fn delete_transaction(&self, transaction_id: i64) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM transacciones WHERE id = ?")
            .bind(transaction_id)
            .execute(self.db.pool())
            .await
            .map_err(StorageError::from_write)?;

        Ok(result.rows_affected() > 0)
    }
}
