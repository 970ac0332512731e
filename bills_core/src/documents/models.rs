use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored bill with its binary payload and workflow metadata.
///
/// `id`, `file_name`, `file_type` and `file_data` are fixed at upload time;
/// the remaining workflow fields are free-form text edited later.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: i64,
    pub file_name: String,
    pub file_type: String,
    pub file_data: Vec<u8>,
    pub entrance_date: Option<String>,
    pub entrance_person: Option<String>,
    pub approval_date: Option<String>,
    pub approval_person1: Option<String>,
    pub approval_person2: Option<String>,
    pub shippment_date: Option<String>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// A document counts as closed once a non-empty shippment date is recorded.
    pub fn is_closed(&self) -> bool {
        match &self.shippment_date {
            Some(date) => !date.is_empty(),
            None => false,
        }
    }
}

/// Raw upload as received from the client, filename not yet sanitized.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub file_type: String,
    pub data: Vec<u8>,
}

/// Partial update for the mutable workflow fields. `None` leaves a field
/// unchanged; `Some("")` overwrites it with an empty value.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub entrance_date: Option<String>,
    pub entrance_person: Option<String>,
    pub approval_date: Option<String>,
    pub approval_person1: Option<String>,
    pub approval_person2: Option<String>,
    pub shippment_date: Option<String>,
    pub comment: Option<String>,
}

impl DocumentPatch {
    pub fn apply_to(&self, document: &mut Document) {
        if let Some(value) = &self.entrance_date {
            document.entrance_date = Some(value.clone());
        }
        if let Some(value) = &self.entrance_person {
            document.entrance_person = Some(value.clone());
        }
        if let Some(value) = &self.approval_date {
            document.approval_date = Some(value.clone());
        }
        if let Some(value) = &self.approval_person1 {
            document.approval_person1 = Some(value.clone());
        }
        if let Some(value) = &self.approval_person2 {
            document.approval_person2 = Some(value.clone());
        }
        if let Some(value) = &self.shippment_date {
            document.shippment_date = Some(value.clone());
        }
        if let Some(value) = &self.comment {
            document.comment = Some(value.clone());
        }
    }
}

/// Everything needed to serve a download response.
#[derive(Debug, Clone)]
pub struct DocumentDownload {
    pub file_name: String,
    pub file_type: String,
    pub data: Vec<u8>,
}

/// Presentation projection of a document. Carries a download link instead of
/// the payload and the derived `closed` flag instead of raw status columns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: i64,
    pub file_name: String,
    pub download_link: String,
    pub entrance_date: Option<String>,
    pub entrance_person: Option<String>,
    pub approval_date: Option<String>,
    pub approval_person1: Option<String>,
    pub approval_person2: Option<String>,
    pub shippment_date: Option<String>,
    pub comment: Option<String>,
    pub closed: bool,
}

impl From<&Document> for DocumentView {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id,
            file_name: document.file_name.clone(),
            download_link: format!("/files/{}", document.id),
            entrance_date: document.entrance_date.clone(),
            entrance_person: document.entrance_person.clone(),
            approval_date: document.approval_date.clone(),
            approval_person1: document.approval_person1.clone(),
            approval_person2: document.approval_person2.clone(),
            shippment_date: document.shippment_date.clone(),
            comment: document.comment.clone(),
            closed: document.is_closed(),
        }
    }
}
