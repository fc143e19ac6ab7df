use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use shared::{NewSubcategory, Subcategory};

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::sqlite::db::FinanzasDb;
use crate::storage::traits::SubcategoryStorage;

/// Repository for subcategory operations
#[derive(Clone)]
pub struct SubcategoryRepository {
    db: FinanzasDb,
}

impl SubcategoryRepository {
    pub fn new(db: FinanzasDb) -> Self {
        Self { db }
    }

    fn subcategory_from_row(row: &SqliteRow) -> Subcategory {
        Subcategory {
            id: row.get("id"),
            name: row.get("name"),
            category_id: row.get("category_id"),
        }
    }
}

#[async_trait]
impl SubcategoryStorage for SubcategoryRepository {
    async fn store_subcategory(&self, subcategory: &NewSubcategory) -> StorageResult<i64> {
        let result = sqlx::query("INSERT INTO subcategorias (name, category_id) VALUES (?, ?)")
            .bind(&subcategory.name)
            .bind(subcategory.category_id)
            .execute(self.db.pool())
            .await
            .map_err(StorageError::from_write)?;

        Ok(result.last_insert_rowid())
    }

    async fn get_subcategory(&self, subcategory_id: i64) -> StorageResult<Option<Subcategory>> {
        let row = sqlx::query("SELECT id, name, category_id FROM subcategorias WHERE id = ?")
            .bind(subcategory_id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(StorageError::from_read)?;

        Ok(row.as_ref().map(Self::subcategory_from_row))
    }

    async fn list_subcategories(&self) -> StorageResult<Vec<Subcategory>> {
        let rows = sqlx::query("SELECT id, name, category_id FROM subcategorias ORDER BY id")
            .fetch_all(self.db.pool())
            .await
            .map_err(StorageError::from_read)?;

        Ok(rows.iter().map(Self::subcategory_from_row).collect())
    }

    async fn list_subcategories_by_category(
        &self,
        category_id: i64,
    ) -> StorageResult<Vec<Subcategory>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, category_id FROM subcategorias
            WHERE category_id = ?
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(StorageError::from_read)?;

        Ok(rows.iter().map(Self::subcategory_from_row).collect())
    }
}
