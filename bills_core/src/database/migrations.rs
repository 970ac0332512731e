use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::error::{AppError, Result};

/// A single schema revision. Statements run inside one transaction and the
/// version is recorded in `_migrations` together with its checksum.
struct Migration {
    version: i64,
    name: &'static str,
    checksum: &'static str,
    statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_documents_table",
    checksum: "documents_v1",
    statements: &[
        "CREATE TABLE documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            file_name TEXT NOT NULL,
            file_type TEXT NOT NULL,
            file_data BLOB NOT NULL,
            entrance_date TEXT,
            entrance_person TEXT,
            approval_date TEXT,
            approval_person1 TEXT,
            approval_person2 TEXT,
            shippment_date TEXT,
            comment TEXT,
            created_at TEXT NOT NULL
        )",
        "CREATE INDEX idx_documents_created_at ON documents(created_at)",
    ],
}];

pub struct MigrationManager {
    pool: SqlitePool,
}

impl MigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        self.ensure_version_table().await?;

        let current = self.current_version().await?;
        let mut applied = 0;

        for migration in MIGRATIONS {
            if migration.version > current {
                info!("Applying migration {}: {}", migration.version, migration.name);
                self.apply(migration).await?;
                applied += 1;
            }
        }

        if applied > 0 {
            info!("Applied {} migrations", applied);
        } else {
            info!("Database schema is up to date at version {}", current);
        }

        Ok(())
    }

    async fn ensure_version_table(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                checksum TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    async fn current_version(&self) -> Result<i64> {
        let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(version.unwrap_or(0))
    }

    async fn apply(&self, migration: &Migration) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        for statement in migration.statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(AppError::from)?;
        }

        sqlx::query("INSERT INTO _migrations (version, name, checksum) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)
    }

    pub async fn get_migration_history(&self) -> Result<Vec<MigrationRecord>> {
        let rows = sqlx::query(
            "SELECT version, name, applied_at, checksum FROM _migrations ORDER BY version",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        rows.iter()
            .map(|row| {
                Ok(MigrationRecord {
                    version: row.try_get("version").map_err(AppError::from)?,
                    name: row.try_get("name").map_err(AppError::from)?,
                    applied_at: row.try_get("applied_at").map_err(AppError::from)?,
                    checksum: row.try_get("checksum").map_err(AppError::from)?,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
}

pub async fn run_migrations(pool: SqlitePool) -> Result<()> {
    MigrationManager::new(pool).run_migrations().await
}
