//! Handlers for the document upload and workflow pages

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    documents::{DocumentPatch, DocumentUpload, DocumentView},
    error::{AppError, Result},
    AppState,
};

/// Payload of the overview page: every document, newest upload first.
#[derive(Debug, Serialize)]
pub struct OverviewPage {
    pub documents: Vec<DocumentView>,
}

/// Payload of the per-document edit page. `document` is `null` for ids
/// that do not exist (anymore); the page itself still renders.
#[derive(Debug, Serialize)]
pub struct EditPage {
    pub document: Option<DocumentView>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditPageQuery {
    pub uploaded: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentForm {
    pub id: i64,
    pub entrance_date: Option<String>,
    pub entrance_person: Option<String>,
    pub approval_date: Option<String>,
    pub approval_person1: Option<String>,
    pub approval_person2: Option<String>,
    pub shippment_date: Option<String>,
    pub comment: Option<String>,
}

pub async fn show_overview(State(state): State<AppState>) -> Result<Json<OverviewPage>> {
    info!("GET / - listing documents");

    let documents = state.store.list_all().await?;
    let documents = documents.iter().map(DocumentView::from).collect();

    Ok(Json(OverviewPage { documents }))
}

pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect> {
    let mut upload: Option<DocumentUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed multipart request: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();

        let file_type = match field.content_type() {
            Some(content_type) => content_type.to_string(),
            None => mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .to_string(),
        };

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("could not read the uploaded file: {}", e)))?;

        upload = Some(DocumentUpload {
            file_name,
            file_type,
            data: data.to_vec(),
        });
        break;
    }

    let upload =
        upload.ok_or_else(|| AppError::BadRequest("multipart field 'file' is missing".to_string()))?;

    let document = state.store.create(upload).await?;
    info!(
        "POST / - stored document {} ({}, {} bytes)",
        document.id,
        document.file_name,
        document.file_data.len()
    );

    Ok(Redirect::to(&format!(
        "/document/{}?uploaded=true",
        document.id
    )))
}

pub async fn show_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<EditPageQuery>,
) -> Result<Json<EditPage>> {
    info!("GET /document/{}", id);

    let document = state.store.get(id).await?;
    let view = document.as_ref().map(DocumentView::from);

    let message = match &view {
        Some(view) if query.uploaded.unwrap_or(false) => {
            Some(format!("You successfully uploaded {}!", view.file_name))
        }
        _ => None,
    };

    Ok(Json(EditPage {
        document: view,
        message,
    }))
}

pub async fn update_document(
    State(state): State<AppState>,
    Form(form): Form<UpdateDocumentForm>,
) -> Result<Redirect> {
    info!("POST /update - document {}", form.id);

    let patch = DocumentPatch {
        entrance_date: form.entrance_date,
        entrance_person: form.entrance_person,
        approval_date: form.approval_date,
        approval_person1: form.approval_person1,
        approval_person2: form.approval_person2,
        shippment_date: form.shippment_date,
        comment: form.comment,
    };

    if state.store.update(form.id, patch).await?.is_none() {
        info!("POST /update - document {} not found, nothing to change", form.id);
    }

    Ok(Redirect::to("/"))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    if state.store.delete(id).await? {
        info!("GET /document/{}/delete - document removed", id);
    } else {
        info!("GET /document/{}/delete - document already gone", id);
    }

    Ok(Redirect::to("/"))
}

pub async fn download_document(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response> {
    info!("GET /files/{}", id);

    let download = match state.store.download(id).await? {
        Some(download) => download,
        // Unknown ids answer with an empty 200 rather than an error page.
        None => return Ok(StatusCode::OK.into_response()),
    };

    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        download
            .file_type
            .parse()
            .unwrap_or_else(|_| "application/octet-stream".parse().unwrap()),
    );

    headers.insert(
        header::CONTENT_LENGTH,
        download.data.len().to_string().parse().unwrap(),
    );

    let disposition = format!(
        "attachment; filename=\"{}\"",
        download.file_name.replace('"', "\\\"")
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        disposition
            .parse()
            .unwrap_or_else(|_| "attachment".parse().unwrap()),
    );

    Ok((StatusCode::OK, headers, download.data).into_response())
}
