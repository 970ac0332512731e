use super::filename::sanitize_file_name;
use super::models::{Document, DocumentDownload, DocumentPatch, DocumentUpload};
use super::repository::{DocumentRepository, DocumentRepositoryTrait};
use crate::error::Result;

/// Domain operations over stored documents.
///
/// Absent ids are not errors at this level: lookups yield `None` and
/// deletes report whether anything was removed, so callers can keep
/// their flows going regardless.
#[derive(Clone)]
pub struct DocumentStore {
    repository: DocumentRepository,
}

impl DocumentStore {
    pub fn new(repository: DocumentRepository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, mut upload: DocumentUpload) -> Result<Document> {
        upload.file_name = sanitize_file_name(&upload.file_name);
        self.repository.create(&upload).await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Document>> {
        self.repository.get_by_id(id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Document>> {
        self.repository.list_all().await
    }

    /// Applies `patch` to the document's workflow fields. The upload-time
    /// fields are never touched; the patched document is written back as a
    /// whole, so concurrent edits resolve last-write-wins.
    pub async fn update(&self, id: i64, patch: DocumentPatch) -> Result<Option<Document>> {
        let mut document = match self.repository.get_by_id(id).await? {
            Some(document) => document,
            None => return Ok(None),
        };

        patch.apply_to(&mut document);

        if !self.repository.update_metadata(&document).await? {
            return Ok(None);
        }

        Ok(Some(document))
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        self.repository.delete(id).await
    }

    pub async fn download(&self, id: i64) -> Result<Option<DocumentDownload>> {
        match self.repository.get_by_id(id).await? {
            Some(document) => Ok(Some(DocumentDownload {
                file_name: document.file_name,
                file_type: document.file_type,
                data: document.file_data,
            })),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;
    use tempfile::NamedTempFile;

    async fn create_test_store() -> (DocumentStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let pool = SqlitePool::connect(&database_url).await.unwrap();
        let repository = DocumentRepository::new(pool);
        repository.create_table().await.unwrap();

        (DocumentStore::new(repository), temp_file)
    }

    fn upload(name: &str, data: &[u8]) -> DocumentUpload {
        DocumentUpload {
            file_name: name.to_string(),
            file_type: "application/pdf".to_string(),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_create_sanitizes_file_name() {
        let (store, _guard) = create_test_store().await;

        let document = store
            .create(upload("../../etc/passwd", b"%PDF"))
            .await
            .unwrap();
        assert_eq!(document.file_name, "passwd");

        let document = store.create(upload("../..", b"%PDF")).await.unwrap();
        assert_eq!(document.file_name, "unnamed");
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let (store, _guard) = create_test_store().await;

        let created = store.create(upload("invoice.pdf", b"%PDF")).await.unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.file_name, "invoice.pdf");
        assert_eq!(fetched.file_type, "application/pdf");
        assert_eq!(fetched.file_data, b"%PDF".to_vec());
        assert!(fetched.entrance_date.is_none());
        assert!(!fetched.is_closed());
    }

    #[tokio::test]
    async fn test_update_patches_workflow_fields_only() {
        let (store, _guard) = create_test_store().await;

        let created = store.create(upload("invoice.pdf", b"%PDF")).await.unwrap();

        let patch = DocumentPatch {
            entrance_date: Some("2024-01-02".to_string()),
            entrance_person: Some("Alice".to_string()),
            shippment_date: Some("2024-01-05".to_string()),
            ..DocumentPatch::default()
        };
        let updated = store.update(created.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.entrance_date.as_deref(), Some("2024-01-02"));
        assert_eq!(updated.entrance_person.as_deref(), Some("Alice"));
        assert!(updated.is_closed());
        assert_eq!(updated.file_name, "invoice.pdf");
        assert_eq!(updated.file_data, b"%PDF".to_vec());

        let clearing = DocumentPatch {
            shippment_date: Some(String::new()),
            ..DocumentPatch::default()
        };
        let reopened = store.update(created.id, clearing).await.unwrap().unwrap();
        assert!(!reopened.is_closed());
        assert_eq!(reopened.entrance_person.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_update_missing_document_is_a_no_op() {
        let (store, _guard) = create_test_store().await;

        let patch = DocumentPatch {
            comment: Some("nobody home".to_string()),
            ..DocumentPatch::default()
        };
        assert!(store.update(999, patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (store, _guard) = create_test_store().await;

        let created = store.create(upload("invoice.pdf", b"%PDF")).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_returns_newest_first() {
        let (store, _guard) = create_test_store().await;

        store.create(upload("first.pdf", b"1")).await.unwrap();
        store.create(upload("second.pdf", b"2")).await.unwrap();
        store.create(upload("third.pdf", b"3")).await.unwrap();

        let documents = store.list_all().await.unwrap();
        let names: Vec<&str> = documents.iter().map(|d| d.file_name.as_str()).collect();
        assert_eq!(names, vec!["third.pdf", "second.pdf", "first.pdf"]);
    }

    #[tokio::test]
    async fn test_download_returns_payload_and_headers_source() {
        let (store, _guard) = create_test_store().await;

        let created = store
            .create(upload("invoice.pdf", &[0x25, 0x50, 0x44, 0x46]))
            .await
            .unwrap();

        let download = store.download(created.id).await.unwrap().unwrap();
        assert_eq!(download.file_name, "invoice.pdf");
        assert_eq!(download.file_type, "application/pdf");
        assert_eq!(download.data, vec![0x25, 0x50, 0x44, 0x46]);

        assert!(store.download(999).await.unwrap().is_none());
    }
}
