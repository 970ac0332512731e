use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::models::{Document, DocumentUpload};
use crate::error::{AppError, Result};

#[async_trait]
pub trait DocumentRepositoryTrait: Send + Sync {
    async fn create(&self, upload: &DocumentUpload) -> Result<Document>;
    async fn get_by_id(&self, id: i64) -> Result<Option<Document>>;
    async fn update_metadata(&self, document: &Document) -> Result<bool>;
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn list_all(&self) -> Result<Vec<Document>>;
}

#[derive(Clone)]
pub struct DocumentRepository {
    pool: SqlitePool,
}

impl DocumentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
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
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_created_at ON documents (created_at)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn row_to_document(row: &SqliteRow) -> Result<Document> {
        let created_at = DateTime::parse_from_rfc3339(&row.try_get::<String, _>("created_at")?)
            .map_err(|e| AppError::Database(format!("Invalid created_at timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(Document {
            id: row.try_get("id")?,
            file_name: row.try_get("file_name")?,
            file_type: row.try_get("file_type")?,
            file_data: row.try_get("file_data")?,
            entrance_date: row.try_get("entrance_date")?,
            entrance_person: row.try_get("entrance_person")?,
            approval_date: row.try_get("approval_date")?,
            approval_person1: row.try_get("approval_person1")?,
            approval_person2: row.try_get("approval_person2")?,
            shippment_date: row.try_get("shippment_date")?,
            comment: row.try_get("comment")?,
            created_at,
        })
    }
}

#[async_trait]
impl DocumentRepositoryTrait for DocumentRepository {
    async fn create(&self, upload: &DocumentUpload) -> Result<Document> {
        let created_at = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO documents (file_name, file_type, file_data, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&upload.file_name)
        .bind(&upload.file_type)
        .bind(&upload.data)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Document {
            id: result.last_insert_rowid(),
            file_name: upload.file_name.clone(),
            file_type: upload.file_type.clone(),
            file_data: upload.data.clone(),
            entrance_date: None,
            entrance_person: None,
            approval_date: None,
            approval_person1: None,
            approval_person2: None,
            shippment_date: None,
            comment: None,
            created_at,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Document>> {
        let row = sqlx::query(
            r#"
            SELECT id, file_name, file_type, file_data, entrance_date, entrance_person,
                   approval_date, approval_person1, approval_person2, shippment_date,
                   comment, created_at
            FROM documents
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_document(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_metadata(&self, document: &Document) -> Result<bool> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE documents
            SET entrance_date = ?2, entrance_person = ?3, approval_date = ?4,
                approval_person1 = ?5, approval_person2 = ?6, shippment_date = ?7,
                comment = ?8
            WHERE id = ?1
            "#,
        )
        .bind(document.id)
        .bind(document.entrance_date.as_deref())
        .bind(document.entrance_person.as_deref())
        .bind(document.approval_date.as_deref())
        .bind(document.approval_person1.as_deref())
        .bind(document.approval_person2.as_deref())
        .bind(document.shippment_date.as_deref())
        .bind(document.comment.as_deref())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let rows_affected = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn list_all(&self) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            r#"
            SELECT id, file_name, file_type, file_data, entrance_date, entrance_person,
                   approval_date, approval_person1, approval_person2, shippment_date,
                   comment, created_at
            FROM documents
            ORDER BY id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut documents = Vec::new();
        for row in rows {
            documents.push(Self::row_to_document(&row)?);
        }

        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    async fn create_test_repo() -> (DocumentRepository, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let pool = SqlitePool::connect(&database_url).await.unwrap();
        let repo = DocumentRepository::new(pool);
        repo.create_table().await.unwrap();

        (repo, temp_file)
    }

    fn pdf_upload(name: &str) -> DocumentUpload {
        DocumentUpload {
            file_name: name.to_string(),
            file_type: "application/pdf".to_string(),
            data: b"%PDF".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_document_repository_crud() {
        let (repo, _guard) = create_test_repo().await;

        let created = repo.create(&pdf_upload("invoice.pdf")).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.file_name, "invoice.pdf");
        assert!(created.entrance_date.is_none());

        let retrieved = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(retrieved.file_name, "invoice.pdf");
        assert_eq!(retrieved.file_type, "application/pdf");
        assert_eq!(retrieved.file_data, b"%PDF".to_vec());

        let mut updated = retrieved.clone();
        updated.entrance_person = Some("Alice".to_string());
        updated.shippment_date = Some("2024-01-05".to_string());
        assert!(repo.update_metadata(&updated).await.unwrap());

        let reread = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(reread.entrance_person.as_deref(), Some("Alice"));
        assert_eq!(reread.shippment_date.as_deref(), Some("2024-01-05"));
        assert_eq!(reread.file_data, b"%PDF".to_vec());

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_assigned_in_creation_order() {
        let (repo, _guard) = create_test_repo().await;

        let first = repo.create(&pdf_upload("first.pdf")).await.unwrap();
        let second = repo.create(&pdf_upload("second.pdf")).await.unwrap();
        assert!(second.id > first.id);

        let documents = repo.list_all().await.unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].file_name, "second.pdf");
        assert_eq!(documents[1].file_name, "first.pdf");
    }

    #[tokio::test]
    async fn test_update_and_delete_report_missing_rows() {
        let (repo, _guard) = create_test_repo().await;

        let mut phantom = repo.create(&pdf_upload("invoice.pdf")).await.unwrap();
        assert!(repo.delete(phantom.id).await.unwrap());

        phantom.comment = Some("late edit".to_string());
        assert!(!repo.update_metadata(&phantom).await.unwrap());
        assert!(!repo.delete(phantom.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_string_metadata_survives_round_trip() {
        let (repo, _guard) = create_test_repo().await;

        let created = repo.create(&pdf_upload("invoice.pdf")).await.unwrap();

        let mut updated = created.clone();
        updated.shippment_date = Some(String::new());
        assert!(repo.update_metadata(&updated).await.unwrap());

        let reread = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(reread.shippment_date.as_deref(), Some(""));
        assert!(reread.entrance_date.is_none());
    }
}
