use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use shared::{Category, CategoryKind, NewCategory};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::sqlite::db::FinanzasDb;
use crate::storage::traits::CategoryStorage;

/// Repository for category operations
#[derive(Clone)]
pub struct CategoryRepository {
    db: FinanzasDb,
}

impl CategoryRepository {
    pub fn new(db: FinanzasDb) -> Self {
        Self { db }
    }

    fn category_from_row(row: &SqliteRow) -> StorageResult<Category> {
        let kind_raw: String = row.get("kind");
        let kind = CategoryKind::parse(&kind_raw).ok_or_else(|| {
            StorageError::ReadFailed(format!("unknown category kind '{kind_raw}'"))
        })?;

        Ok(Category {
            id: row.get("id"),
            name: row.get("name"),
            kind,
        })
    }
}

#[async_trait]
impl CategoryStorage for CategoryRepository {
    async fn store_category(&self, category: &NewCategory) -> StorageResult<i64> {
        let result = sqlx::query("INSERT INTO categorias (name, kind) VALUES (?, ?)")
            .bind(&category.name)
            .bind(category.kind.as_str())
            .execute(self.db.pool())
            .await
            .map_err(StorageError::from_write)?;

        Ok(result.last_insert_rowid())
    }

    async fn get_category(&self, category_id: i64) -> StorageResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name, kind FROM categorias WHERE id = ?")
            .bind(category_id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(StorageError::from_read)?;

        row.as_ref().map(Self::category_from_row).transpose()
    }

    async fn get_category_by_kind(&self, kind: CategoryKind) -> StorageResult<Option<Category>> {
        // The seed holds one row per kind; take the oldest in case a
        // caller has added more of the same kind since.
        let row = sqlx::query(
            r#"
            SELECT id, name, kind FROM categorias
            WHERE kind = ?
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(kind.as_str())
        .fetch_optional(self.db.pool())
        .await
        .map_err(StorageError::from_read)?;

        row.as_ref().map(Self::category_from_row).transpose()
    }

    async fn list_categories(&self) -> StorageResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, kind FROM categorias ORDER BY id")
            .fetch_all(self.db.pool())
            .await
            .map_err(StorageError::from_read)?;

        rows.iter().map(Self::category_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::Connection;

    async fn setup() -> CategoryRepository {
        let db = FinanzasDb::connect_test().await.expect("test database");
        db.create_category_repository()
    }

    #[tokio::test]
    async fn get_by_kind_finds_each_seeded_category() {
        let repo = setup().await;

        let income = repo
            .get_category_by_kind(CategoryKind::Income)
            .await
            .expect("query")
            .expect("seeded income category");
        assert_eq!(income.name, "Ingresos");

        let savings = repo
            .get_category_by_kind(CategoryKind::Savings)
            .await
            .expect("query")
            .expect("seeded savings category");
        assert_eq!(savings.kind, CategoryKind::Savings);
    }

    #[tokio::test]
    async fn store_assigns_fresh_ids_and_get_reads_back() {
        let repo = setup().await;

        let id = repo
            .store_category(&NewCategory {
                name: "Inversiones".to_string(),
                kind: CategoryKind::Savings,
            })
            .await
            .expect("store category");

        let category = repo
            .get_category(id)
            .await
            .expect("query")
            .expect("stored category");
        assert_eq!(category.name, "Inversiones");
        assert_eq!(category.kind, CategoryKind::Savings);
    }

    #[tokio::test]
    async fn duplicate_name_is_a_constraint_violation() {
        let repo = setup().await;

        let err = repo
            .store_category(&NewCategory {
                name: "Gastos".to_string(),
                kind: CategoryKind::Expense,
            })
            .await
            .expect_err("duplicate name must fail");

        assert!(matches!(err, StorageError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn get_missing_category_is_none_not_an_error() {
        let repo = setup().await;
        let category = repo.get_category(9999).await.expect("query");
        assert!(category.is_none());
    }
}
