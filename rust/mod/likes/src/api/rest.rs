use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use likes_content::{RecordId, RecordStatus, events};
use likes_core::ServiceError;

use super::AppState;
use crate::model::LikeRecord;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/likes/v1/likes", get(list_likes))
        .route("/likes/v1/likes/{id}", get(get_like))
        .route("/likes/v1/likes/{id}/webmention-targets", get(webmention_targets))
}

async fn list_likes(State(state): State<AppState>) -> Result<Json<Vec<LikeRecord>>, ServiceError> {
    let likes = state.published_likes()?;
    Ok(Json(likes.into_iter().map(|r| state.view(r)).collect()))
}

async fn get_like(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<LikeRecord>, ServiceError> {
    let record = state.load_like(id)?;
    if record.fields.status != RecordStatus::Publish {
        return Err(ServiceError::NotFound(format!("like {id} not found")));
    }
    Ok(Json(state.view(record)))
}

/// Targets the notification dispatcher should ping for record `id`.
async fn webmention_targets(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> Result<Json<Vec<String>>, ServiceError> {
    if state.service.repo.get_record(id)?.is_none() {
        return Err(ServiceError::NotFound(format!("record {id} not found")));
    }
    let targets = state
        .hooks
        .apply_filters(events::NOTIFICATION_TARGETS, Vec::<String>::new(), &id);
    Ok(Json(targets))
}
