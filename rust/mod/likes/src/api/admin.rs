//! Like editing: create a draft, show the edit form, save, autosave, trash.
//!
//! Saves go through the content write pipeline, so the like hooks decide
//! what is actually stored. A save with a bad token succeeds but changes
//! nothing.

use std::collections::HashMap;

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use likes_content::{FormData, RecordChanges, RecordId, RecordStatus, WriteRequest};
use likes_core::ServiceError;

use super::AppState;
use crate::model::{LikeRecord, RECORD_TYPE, TEXT_DOMAIN};
use crate::sanitize::esc_html;

/// Optional form field selecting the status to save with.
const FIELD_STATUS: &str = "status";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/likes", post(create_like))
        .route("/admin/likes/{id}", post(save_like).delete(trash_like))
        .route("/admin/likes/{id}/edit", get(edit_like))
        .route("/admin/likes/{id}/autosave", post(autosave_like))
}

async fn create_like(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<LikeRecord>), ServiceError> {
    let record = state.writer.create_auto_draft(RECORD_TYPE)?;
    Ok((StatusCode::CREATED, Json(state.view(record))))
}

async fn edit_like(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Html<String>, ServiceError> {
    let record = state.load_like(id)?;
    let meta_box = state
        .post_types
        .get(RECORD_TYPE)
        .and_then(|def| def.meta_box.clone())
        .ok_or_else(|| ServiceError::Internal("like record type is not registered".into()))?;

    let t = |text: &str| esc_html(&state.service.i18n.translate(TEXT_DOMAIN, text));
    let html = format!(
        "<form method=\"post\" action=\"/admin/likes/{id}\">\n\
         <div class=\"postbox\" id=\"{}\">\n<h2>{}</h2>\n{}</div>\n\
         <button type=\"submit\" name=\"{FIELD_STATUS}\" value=\"draft\">{}</button>\n\
         <button type=\"submit\" name=\"{FIELD_STATUS}\" value=\"publish\">{}</button>\n\
         </form>\n",
        esc_html(&meta_box.id),
        esc_html(&meta_box.title),
        (meta_box.render)(&record),
        t("Save Draft"),
        t("Publish"),
    );
    Ok(Html(html))
}

async fn save_like(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<LikeRecord>, ServiceError> {
    let record = state.load_like(id)?;
    let form = FormData::from(fields);

    let status = match form.get(FIELD_STATUS) {
        None | Some("") => None,
        Some(s) => Some(s.parse::<RecordStatus>()?),
    };
    // The first real save moves a like out of auto-draft.
    let status = status.or(
        (record.fields.status == RecordStatus::AutoDraft).then_some(RecordStatus::Draft),
    );

    let changes = RecordChanges {
        status,
        ..Default::default()
    };
    let saved = state.writer.update(id, changes, &WriteRequest::form(form))?;
    Ok(Json(state.view(saved)))
}

async fn autosave_like(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<LikeRecord>, ServiceError> {
    state.load_like(id)?;
    let request = WriteRequest::autosave(FormData::from(fields));
    let saved = state.writer.update(id, RecordChanges::default(), &request)?;
    Ok(Json(state.view(saved)))
}

async fn trash_like(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<LikeRecord>, ServiceError> {
    state.load_like(id)?;
    let trashed = state.writer.trash(id)?;
    Ok(Json(state.view(trashed)))
}
