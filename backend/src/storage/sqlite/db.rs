//! Database handle: opens or creates the finanzas database, runs the
//! schema-version check, and seeds the default categories and
//! subcategories on first creation.

use std::sync::Arc;

use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tracing::info;

use shared::CategoryKind;

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::sqlite::repositories::{
    CategoryRepository, SubcategoryRepository, TransactionRepository,
};
use crate::storage::traits::Connection;

/// Version stamped into `PRAGMA user_version` after the schema is
/// created. Version 0 means a fresh database; anything else this build
/// did not write is refused rather than migrated.
const SCHEMA_VERSION: i64 = 1;

/// Table creation statements, executed one by one. Transactions carry no
/// SQL foreign keys: a row whose category has vanished must stay
/// representable, since summaries skip it instead of failing.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS categorias (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        kind TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_categorias_name ON categorias(name);",
    r#"
    CREATE TABLE IF NOT EXISTS subcategorias (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category_id INTEGER NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_subcategorias_name ON subcategorias(name);",
    "CREATE INDEX IF NOT EXISTS idx_subcategorias_category_id ON subcategorias(category_id);",
    r#"
    CREATE TABLE IF NOT EXISTS transacciones (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER NOT NULL,
        subcategory_id INTEGER NOT NULL,
        amount REAL NOT NULL,
        description TEXT,
        date TEXT NOT NULL,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_transacciones_date ON transacciones(date);",
    "CREATE INDEX IF NOT EXISTS idx_transacciones_category_id ON transacciones(category_id);",
    "CREATE INDEX IF NOT EXISTS idx_transacciones_subcategory_id ON transacciones(subcategory_id);",
];

/// One category per kind, created with the database.
const SEED_CATEGORIES: &[(&str, CategoryKind)] = &[
    ("Ingresos", CategoryKind::Income),
    ("Gastos", CategoryKind::Expense),
    ("Ahorros", CategoryKind::Savings),
];

/// Starter subcategories the entry forms offer out of the box, as
/// (name, category name) pairs.
const SEED_SUBCATEGORIES: &[(&str, &str)] = &[
    ("Salario", "Ingresos"),
    ("Otros", "Ingresos"),
    ("Hogar", "Gastos"),
    ("Transporte", "Gastos"),
    ("Alimentación", "Gastos"),
    ("Otros", "Gastos"),
    ("General", "Ahorros"),
];

/// FinanzasDb owns the one pool handle for a database. Cloning shares
/// the pool; the handle is never explicitly closed.
#[derive(Clone, Debug)]
pub struct FinanzasDb {
    pool: Arc<SqlitePool>,
}

impl FinanzasDb {
    /// Open the database at `url`, creating and seeding it when it does
    /// not exist yet. Reopening an existing database never re-seeds.
    pub async fn connect(url: &str) -> StorageResult<Self> {
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            Sqlite::create_database(url)
                .await
                .map_err(StorageError::from_open)?;
        }

        let pool = SqlitePool::connect(url)
            .await
            .map_err(StorageError::from_open)?;

        Self::setup_schema(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Initialize a uniquely named in-memory database for tests.
    #[cfg(test)]
    pub(crate) async fn connect_test() -> StorageResult<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);
        Self::connect(&url).await
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create tables and seed data on a fresh database, accept the
    /// current version, refuse anything else.
    async fn setup_schema(pool: &SqlitePool) -> StorageResult<()> {
        let (version,): (i64,) = sqlx::query_as("PRAGMA user_version")
            .fetch_one(pool)
            .await
            .map_err(StorageError::from_open)?;

        match version {
            0 => {
                info!("Creating schema and seeding defaults");
                for statement in SCHEMA {
                    sqlx::query(statement)
                        .execute(pool)
                        .await
                        .map_err(StorageError::from_open)?;
                }
                Self::seed_defaults(pool).await?;
                sqlx::query(&format!("PRAGMA user_version = {}", SCHEMA_VERSION))
                    .execute(pool)
                    .await
                    .map_err(StorageError::from_open)?;
            }
            SCHEMA_VERSION => {}
            other => {
                return Err(StorageError::Unavailable(format!(
                    "unsupported schema version {other}"
                )));
            }
        }

        Ok(())
    }

    async fn seed_defaults(pool: &SqlitePool) -> StorageResult<()> {
        for (name, kind) in SEED_CATEGORIES {
            sqlx::query("INSERT INTO categorias (name, kind) VALUES (?, ?)")
                .bind(name)
                .bind(kind.as_str())
                .execute(pool)
                .await
                .map_err(StorageError::from_write)?;
        }

        for (name, category_name) in SEED_SUBCATEGORIES {
            sqlx::query(
                r#"
                INSERT INTO subcategorias (name, category_id)
                SELECT ?, id FROM categorias WHERE name = ?
                "#,
            )
            .bind(name)
            .bind(category_name)
            .execute(pool)
            .await
            .map_err(StorageError::from_write)?;
        }

        Ok(())
    }

    /// Wipe all three collections, returning deleted row counts as
    /// (categories, subcategories, transactions). Irreversible; meant
    /// for resets and tests, with any confirmation the caller's job.
    pub async fn clear_all(&self) -> StorageResult<(u64, u64, u64)> {
        let categories = sqlx::query("DELETE FROM categorias")
            .execute(&*self.pool)
            .await
            .map_err(StorageError::from_write)?
            .rows_affected();
        let subcategories = sqlx::query("DELETE FROM subcategorias")
            .execute(&*self.pool)
            .await
            .map_err(StorageError::from_write)?
            .rows_affected();
        let transactions = sqlx::query("DELETE FROM transacciones")
            .execute(&*self.pool)
            .await
            .map_err(StorageError::from_write)?
            .rows_affected();

        Ok((categories, subcategories, transactions))
    }
}

impl Connection for FinanzasDb {
    type CategoryRepository = CategoryRepository;
    type SubcategoryRepository = SubcategoryRepository;
    type TransactionRepository = TransactionRepository;

    fn create_category_repository(&self) -> CategoryRepository {
        CategoryRepository::new(self.clone())
    }

    fn create_subcategory_repository(&self) -> SubcategoryRepository {
        SubcategoryRepository::new(self.clone())
    }

    fn create_transaction_repository(&self) -> TransactionRepository {
        TransactionRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::traits::{CategoryStorage, SubcategoryStorage, TransactionStorage};

    #[tokio::test]
    async fn fresh_database_gets_one_category_per_kind() {
        let db = FinanzasDb::connect_test().await.expect("connect");
        let categories = db
            .create_category_repository()
            .list_categories()
            .await
            .expect("list categories");

        assert_eq!(categories.len(), 3);
        for kind in [
            CategoryKind::Income,
            CategoryKind::Expense,
            CategoryKind::Savings,
        ] {
            assert_eq!(
                categories.iter().filter(|c| c.kind == kind).count(),
                1,
                "expected exactly one seeded {kind} category"
            );
        }
    }

    #[tokio::test]
    async fn fresh_database_gets_starter_subcategories() {
        let db = FinanzasDb::connect_test().await.expect("connect");
        let subcategories = db
            .create_subcategory_repository()
            .list_subcategories()
            .await
            .expect("list subcategories");

        assert_eq!(subcategories.len(), SEED_SUBCATEGORIES.len());
    }

    #[tokio::test]
    async fn reopening_does_not_reseed() {
        let test_id = uuid::Uuid::new_v4().to_string();
        let url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        // Keep the first handle alive so the shared in-memory database
        // survives while the second one opens it.
        let first = FinanzasDb::connect(&url).await.expect("first connect");
        let second = FinanzasDb::connect(&url).await.expect("second connect");

        let categories = second
            .create_category_repository()
            .list_categories()
            .await
            .expect("list categories");
        assert_eq!(categories.len(), 3, "reopen must not duplicate seeds");

        drop(first);
    }

    #[tokio::test]
    async fn unknown_schema_version_is_refused() {
        let test_id = uuid::Uuid::new_v4().to_string();
        let url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        let db = FinanzasDb::connect(&url).await.expect("connect");
        sqlx::query("PRAGMA user_version = 9")
            .execute(db.pool())
            .await
            .expect("bump version");

        let err = FinanzasDb::connect(&url).await.expect_err("must refuse");
        assert!(matches!(err, StorageError::Unavailable(_)));

        drop(db);
    }

    #[tokio::test]
    async fn clear_all_empties_every_collection() {
        let db = FinanzasDb::connect_test().await.expect("connect");
        let transactions = db.create_transaction_repository();
        transactions
            .store_transaction(&shared::NewTransaction {
                category_id: 1,
                subcategory_id: 1,
                amount: 12.5,
                description: None,
                date: None,
            })
            .await
            .expect("store transaction");

        let (categories, subcategories, deleted_transactions) =
            db.clear_all().await.expect("clear all");
        assert_eq!(categories, 3);
        assert_eq!(subcategories, SEED_SUBCATEGORIES.len() as u64);
        assert_eq!(deleted_transactions, 1);

        assert!(db
            .create_category_repository()
            .list_categories()
            .await
            .expect("list categories")
            .is_empty());
        assert!(db
            .create_subcategory_repository()
            .list_subcategories()
            .await
            .expect("list subcategories")
            .is_empty());
        assert!(transactions
            .list_transactions()
            .await
            .expect("list transactions")
            .is_empty());
    }

    #[tokio::test]
    async fn file_backed_database_persists_across_reopens() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite:{}/finanzas.db", dir.path().display());

        {
            let db = FinanzasDb::connect(&url).await.expect("first open");
            db.create_transaction_repository()
                .store_transaction(&shared::NewTransaction {
                    category_id: 1,
                    subcategory_id: 1,
                    amount: 3.0,
                    description: Some("persisted".to_string()),
                    date: None,
                })
                .await
                .expect("store transaction");
        }

        let db = FinanzasDb::connect(&url).await.expect("second open");
        let transactions = db
            .create_transaction_repository()
            .list_transactions()
            .await
            .expect("list transactions");
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].description.as_deref(), Some("persisted"));
    }
}
