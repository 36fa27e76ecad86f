//! Event names dispatched by the content pipeline, and the context each one
//! carries.
//!
//! | Event | Kind | Value | Context |
//! |-------|------|-------|---------|
//! | [`INSERT_RECORD_DATA`] | filter | [`RecordFields`] | [`InsertContext`] |
//! | [`RECORD_SAVED`] | action | - | [`SaveContext`] |
//! | [`NOTIFICATION_TARGETS`] | filter | `Vec<String>` | [`RecordId`] |
//! | [`RENDER_CONTENT`] | filter | `String` | [`RenderContext`] |

use std::collections::HashMap;

use serde::Deserialize;

use crate::record::{Record, RecordId};

/// Fired for every record write, of every type, just before persistence.
pub const INSERT_RECORD_DATA: &str = "content/insert_record_data";

/// Fired after every record write has been persisted.
pub const RECORD_SAVED: &str = "content/record_saved";

/// Fired while assembling the outbound notification batch for a record.
pub const NOTIFICATION_TARGETS: &str = "content/notification_targets";

/// Fired when a single record's body is rendered for display.
pub const RENDER_CONTENT: &str = "content/render";

// ---------------------------------------------------------------------------
// Submitted form data
// ---------------------------------------------------------------------------

/// Form fields submitted with a write, as sent by the client.
///
/// Distinguishes a field that was omitted (`get` returns None) from one
/// submitted as an empty string (`Some("")`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormData(HashMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for FormData {
    fn from(fields: HashMap<String, String>) -> Self {
        Self(fields)
    }
}

/// Request-scoped inputs of a write, supplied explicitly by the caller.
#[derive(Debug, Clone, Default)]
pub struct WriteRequest {
    pub form: FormData,
    /// Set for background autosaves issued by the editor.
    pub autosave: bool,
}

impl WriteRequest {
    pub fn form(form: FormData) -> Self {
        Self {
            form,
            autosave: false,
        }
    }

    pub fn autosave(form: FormData) -> Self {
        Self {
            form,
            autosave: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Contexts
// ---------------------------------------------------------------------------

/// Context for [`INSERT_RECORD_DATA`].
#[derive(Debug, Clone)]
pub struct InsertContext {
    /// None while the record is being created.
    pub record_id: Option<RecordId>,
    pub form: FormData,
}

/// Context for [`RECORD_SAVED`].
#[derive(Debug, Clone)]
pub struct SaveContext {
    /// The record as persisted by this write.
    pub record: Record,
    pub form: FormData,
    pub autosave: bool,
    /// False for the write that created the record.
    pub update: bool,
}

/// Context for [`RENDER_CONTENT`].
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// The record currently being displayed, if any.
    pub record: Option<Record>,
}

impl RenderContext {
    pub fn for_record(record: Record) -> Self {
        Self {
            record: Some(record),
        }
    }
}
