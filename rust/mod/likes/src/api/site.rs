//! Public like pages under the `liked` rewrite base.

use axum::{
    Router,
    extract::{Path, State},
    response::Html,
    routing::get,
};
use likes_content::{Record, RecordStatus, RenderContext, events};
use likes_core::ServiceError;

use super::{ApiState, AppState};
use crate::model::{ARCHIVE_SLUG, RECORD_TYPE};
use crate::sanitize::{esc_attr, esc_html};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(&format!("/{ARCHIVE_SLUG}"), get(archive))
        .route(&format!("/{ARCHIVE_SLUG}/{{slug}}"), get(single))
}

async fn archive(State(state): State<AppState>) -> Result<Html<String>, ServiceError> {
    let labels = state
        .post_types
        .by_rewrite_slug(ARCHIVE_SLUG)
        .map(|def| def.labels.clone())
        .ok_or_else(|| ServiceError::NotFound(format!("no archive at /{ARCHIVE_SLUG}")))?;

    let likes = state.published_likes()?;
    let mut body = format!("<h1>{}</h1>\n", esc_html(&labels.name));
    if likes.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", esc_html(&labels.not_found)));
    }
    for record in likes {
        let permalink = format!("/{ARCHIVE_SLUG}/{}", record.fields.slug);
        let id = record.id;
        let content = render(&state, record);
        body.push_str(&format!(
            "<article class=\"h-entry\" id=\"like-{id}\">\n{content}\n\
             <a class=\"u-url\" href=\"{}\">#</a>\n</article>\n",
            esc_attr(&permalink),
        ));
    }
    Ok(page(&labels.name, &body))
}

async fn single(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, ServiceError> {
    let record = state
        .service
        .repo
        .find_by_slug(RECORD_TYPE, &slug)?
        .filter(|r| r.fields.status == RecordStatus::Publish)
        .ok_or_else(|| ServiceError::NotFound(format!("like '{slug}' not found")))?;

    let heading = if record.fields.title.is_empty() {
        state.service.resolver.resolve(record.id)
    } else {
        record.fields.title.clone()
    };
    let content = render(&state, record);
    let body = format!(
        "<article class=\"h-entry\">\n<h1 class=\"p-name\">{}</h1>\n{content}\n</article>\n",
        esc_html(&heading),
    );
    Ok(page(&heading, &body))
}

/// Run a record's body through the render hooks.
fn render(state: &ApiState, record: Record) -> String {
    let content = record.fields.content.clone();
    state
        .hooks
        .apply_filters(events::RENDER_CONTENT, content, &RenderContext::for_record(record))
}

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n\
         <body>\n{body}</body>\n</html>\n",
        esc_html(title),
    ))
}
