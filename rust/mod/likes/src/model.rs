use likes_content::{Record, RecordId, RecordStatus};
use serde::Serialize;

/// Record type of a like.
pub const RECORD_TYPE: &str = "like";

/// Canonical liked URL, written by this module only.
pub const META_LIKE_OF_URL: &str = "like_of_url";

/// Legacy liked URL written by the microformats integration. Read-only
/// here, and possibly stored as a list.
pub const META_LEGACY_LIKE_OF: &str = "mf2_like-of";

/// Archive base path. Existing links depend on it.
pub const ARCHIVE_SLUG: &str = "liked";

/// Anti-forgery action for the like edit form.
pub const NONCE_ACTION: &str = "save-like-data";

// Form fields submitted by the like edit form.
pub const NONCE_FIELD: &str = "like_data_nonce";
pub const FIELD_URL: &str = "like_url";
pub const FIELD_TITLE: &str = "like_title";

/// Translation domain for every user-facing string of this module.
pub const TEXT_DOMAIN: &str = "likes";

/// A like as exposed over REST: the record plus its resolved URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRecord {
    pub id: RecordId,
    pub status: RecordStatus,
    pub title: String,
    pub slug: String,
    pub like_of: String,
    pub created_at: String,
    pub updated_at: String,
}

impl LikeRecord {
    pub fn new(record: Record, like_of: String) -> Self {
        Self {
            id: record.id,
            status: record.fields.status,
            title: record.fields.title,
            slug: record.fields.slug,
            like_of,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Whether `record` is a like.
pub fn is_like(record: &Record) -> bool {
    record.is_type(RECORD_TYPE)
}
