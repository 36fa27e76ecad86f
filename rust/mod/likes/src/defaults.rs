//! TitleSlugDeriver: title and slug of a like, filled in just before each
//! write.
//!
//! Runs for every record type and leaves anything but likes alone.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use likes_content::{AUTO_DRAFT_TITLE, FormData, InsertContext, RecordFields};
use likes_core::{I18nStore, NonceVerifier};
use tracing::debug;

use crate::model::{FIELD_TITLE, RECORD_TYPE, TEXT_DOMAIN};
use crate::sanitize::{sanitize_slug, sanitize_text_field};
use crate::save::has_valid_token;

/// Timestamp slug given to new likes, e.g. `20240102030405`.
const SLUG_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

pub struct TitleSlugDeriver {
    nonces: Arc<dyn NonceVerifier>,
    i18n: Arc<I18nStore>,
}

impl TitleSlugDeriver {
    pub fn new(nonces: Arc<dyn NonceVerifier>, i18n: Arc<I18nStore>) -> Self {
        Self { nonces, i18n }
    }

    /// Hook entry point for `content/insert_record_data`.
    pub fn handle(&self, fields: RecordFields, ctx: &InsertContext) -> RecordFields {
        self.apply_defaults(fields, &ctx.form)
    }

    pub fn apply_defaults(&self, fields: RecordFields, form: &FormData) -> RecordFields {
        self.apply_defaults_at(fields, form, Utc::now())
    }

    /// Like [`apply_defaults`](Self::apply_defaults) with an explicit clock.
    pub fn apply_defaults_at(
        &self,
        mut fields: RecordFields,
        form: &FormData,
        now: DateTime<Utc>,
    ) -> RecordFields {
        if fields.record_type != RECORD_TYPE {
            return fields;
        }

        // Checked against the fields as they arrived.
        if fields.slug.is_empty() && fields.title == AUTO_DRAFT_TITLE {
            fields.title = self.i18n.translate(TEXT_DOMAIN, "Like");
            fields.slug = now.format(SLUG_TIMESTAMP_FORMAT).to_string();
        }

        let Some(submitted) = form.get(FIELD_TITLE).filter(|t| !t.is_empty()) else {
            return fields;
        };
        if !has_valid_token(self.nonces.as_ref(), form) {
            debug!("like defaults: missing or invalid token, title not derived");
            return fields;
        }
        // Both come from the same text even when sanitising empties it.
        fields.title = sanitize_text_field(submitted);
        fields.slug = sanitize_slug(submitted);
        fields
    }
}
