//! Group-level handlers: everything that addresses a whole file.

use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use sha2::Digest as _;

use crate::error::AppError;
use crate::form::{CopyInput, FormFields, GroupInput, RenameInput};
use crate::models::Group;
use crate::state::AppState;
use crate::store::{normalize_filename, GroupStore};
use crate::views::pages;
use crate::views::PageQuery;

use super::{group_path, see_other};

// ── list ──────────────────────────────────────────────────────────────────────

/// GET /
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let files = state.store.list()?;
    Ok(Html(pages::index_page(&files, query.flash().as_ref())))
}

// ── create ────────────────────────────────────────────────────────────────────

/// Testable inner logic for [`create_group`].
pub(crate) fn create_group_inner(
    store: &GroupStore,
    fields: &FormFields,
) -> Result<(String, Group), AppError> {
    store.create(&GroupInput::from_fields(fields))
}

/// GET /new
pub async fn new_group_form(Query(query): Query<PageQuery>) -> Html<String> {
    Html(pages::new_group_page(query.flash().as_ref()))
}

/// POST /new
pub async fn create_group(
    State(state): State<AppState>,
    Form(fields): Form<FormFields>,
) -> Result<Redirect, AppError> {
    let (filename, group) = create_group_inner(&state.store, &fields)?;
    Ok(see_other(
        &group_path(&filename),
        format!("Group \"{}\" created successfully!", group.name),
    ))
}

// ── edit metadata ─────────────────────────────────────────────────────────────

/// Testable inner logic for [`update_group`].
pub(crate) fn update_group_inner(
    store: &GroupStore,
    filename: &str,
    fields: &FormFields,
) -> Result<Group, AppError> {
    store.update_metadata(filename, &GroupInput::from_fields(fields))
}

/// GET /edit/{filename}
pub async fn edit_group_form(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let filename = normalize_filename(&filename)?;
    let group = state.store.load(&filename)?;
    Ok(Html(pages::edit_group_page(
        &filename,
        &group,
        query.flash().as_ref(),
    )))
}

/// POST /edit/{filename}
pub async fn update_group(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Form(fields): Form<FormFields>,
) -> Result<Redirect, AppError> {
    let filename = normalize_filename(&filename)?;
    update_group_inner(&state.store, &filename, &fields)?;
    Ok(see_other(&group_path(&filename), "Group updated successfully!"))
}

// ── delete ────────────────────────────────────────────────────────────────────

/// POST /delete/{filename}
pub async fn delete_group(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Redirect, AppError> {
    let filename = normalize_filename(&filename)?;
    state.store.delete(&filename)?;
    Ok(see_other(
        "/",
        format!("File \"{filename}\" deleted successfully!"),
    ))
}

// ── copy ──────────────────────────────────────────────────────────────────────

/// Testable inner logic for [`copy_group`].
pub(crate) fn copy_group_inner(
    store: &GroupStore,
    filename: &str,
    fields: &FormFields,
) -> Result<(String, Group), AppError> {
    store.copy(filename, &CopyInput::from_fields(fields))
}

/// GET /copy/{filename}
pub async fn copy_group_form(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let filename = normalize_filename(&filename)?;
    state.store.load(&filename)?;
    Ok(Html(pages::copy_group_page(&filename, query.flash().as_ref())))
}

/// POST /copy/{filename}
pub async fn copy_group(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Form(fields): Form<FormFields>,
) -> Result<Redirect, AppError> {
    let (new_filename, _) = copy_group_inner(&state.store, &filename, &fields)?;
    Ok(see_other(
        &group_path(&new_filename),
        format!("File copied to \"{new_filename}\" successfully!"),
    ))
}

// ── rename ────────────────────────────────────────────────────────────────────

/// Testable inner logic for [`rename_group`].
pub(crate) fn rename_group_inner(
    store: &GroupStore,
    filename: &str,
    fields: &FormFields,
) -> Result<String, AppError> {
    let input = RenameInput::from_fields(fields);
    store.rename(filename, &input.new_filename)
}

/// GET /rename/{filename}
pub async fn rename_group_form(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let filename = normalize_filename(&filename)?;
    state.store.load(&filename)?;
    Ok(Html(pages::rename_group_page(&filename, query.flash().as_ref())))
}

/// POST /rename/{filename}
pub async fn rename_group(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Form(fields): Form<FormFields>,
) -> Result<Redirect, AppError> {
    let new_filename = rename_group_inner(&state.store, &filename, &fields)?;
    Ok(see_other(
        &group_path(&new_filename),
        format!("File renamed to \"{new_filename}\" successfully!"),
    ))
}

// ── download / upload ─────────────────────────────────────────────────────────

/// Strong ETag for a stored document: the quoted SHA-256 hex digest.
pub(crate) fn etag(bytes: &[u8]) -> String {
    format!("\"{:x}\"", sha2::Sha256::digest(bytes))
}

/// `Content-Disposition` value for downloading `filename`, as an RFC 6266
/// quoted string.
pub(crate) fn attachment(filename: &str) -> String {
    let mut quoted = String::with_capacity(filename.len() + 2);
    for c in filename.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    format!("attachment; filename=\"{quoted}\"")
}

/// GET /download/{filename}
///
/// Answers `304 Not Modified` when `If-None-Match` carries the current ETag.
pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let filename = normalize_filename(&filename)?;
    let bytes = state.store.export_document(&filename)?;
    let tag = etag(&bytes);

    let unchanged = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|t| t.trim() == tag));
    if unchanged {
        return Ok((StatusCode::NOT_MODIFIED, [(header::ETAG, tag)]).into_response());
    }

    tracing::info!(%filename, bytes = bytes.len(), "group downloaded");
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_DISPOSITION, attachment(&filename))
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(header::ETAG, tag)
        .body(Body::from(bytes))
        .map_err(|e| AppError::Io(format!("response build failed: {e}")))
}

/// POST /upload — multipart field `file`
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidFormat(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidFormat(format!("Read error: {e}")))?;
        upload = Some((file_name, data.to_vec()));
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::InvalidFormat("No file provided".to_string()))?;
    let stored = state.store.import_document(&data, &file_name)?;
    Ok(see_other(
        "/",
        format!("File \"{stored}\" uploaded successfully!"),
    ))
}

// ── health ────────────────────────────────────────────────────────────────────

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
