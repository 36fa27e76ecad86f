use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ContentError;

/// Opaque record identifier assigned by the repository at creation.
pub type RecordId = u64;

/// Title every freshly created draft carries until something replaces it.
pub const AUTO_DRAFT_TITLE: &str = "Auto Draft";

// ---------------------------------------------------------------------------
// RecordStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a record.
///
/// ```text
/// AUTO-DRAFT → DRAFT → PUBLISH → TRASH
///            ↘───────↗
/// ```
///
/// `auto-draft` is the transient state a record sits in between creation
/// and its first real save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordStatus {
    AutoDraft,
    Draft,
    Publish,
    Trash,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoDraft => "auto-draft",
            Self::Draft => "draft",
            Self::Publish => "publish",
            Self::Trash => "trash",
        }
    }
}

impl FromStr for RecordStatus {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto-draft" => Ok(Self::AutoDraft),
            "draft" => Ok(Self::Draft),
            "publish" => Ok(Self::Publish),
            "trash" => Ok(Self::Trash),
            _ => Err(ContentError::UnknownStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The mutable, type-agnostic fields of a record: what gets passed through
/// the insert filter before every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFields {
    pub record_type: String,
    pub status: RecordStatus,
    #[serde(default)]
    pub title: String,
    /// Identifier-safe addressing string.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub content: String,
}

impl RecordFields {
    /// Fields for a brand-new draft of `record_type`.
    pub fn auto_draft(record_type: &str) -> Self {
        Self {
            record_type: record_type.to_string(),
            status: RecordStatus::AutoDraft,
            title: AUTO_DRAFT_TITLE.to_string(),
            slug: String::new(),
            content: String::new(),
        }
    }
}

/// A persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: RecordFields,
    pub created_at: String,
    pub updated_at: String,
}

impl Record {
    pub fn is_type(&self, record_type: &str) -> bool {
        self.fields.record_type == record_type
    }
}

/// Partial update applied on top of an existing record's fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordChanges {
    pub status: Option<RecordStatus>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
}

impl RecordChanges {
    pub fn apply_to(self, fields: &mut RecordFields) {
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(title) = self.title {
            fields.title = title;
        }
        if let Some(slug) = self.slug {
            fields.slug = slug;
        }
        if let Some(content) = self.content {
            fields.content = content;
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// A metadata value attached to a record.
///
/// Most writers store a single string; some foreign integrations store a
/// list under a key even when only one entry is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Text(String),
    List(Vec<String>),
}

impl MetaValue {
    pub fn text(value: impl Into<String>) -> Self {
        MetaValue::Text(value.into())
    }

    /// An empty string or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            MetaValue::Text(s) => s.is_empty(),
            MetaValue::List(items) => items.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            RecordStatus::AutoDraft,
            RecordStatus::Draft,
            RecordStatus::Publish,
            RecordStatus::Trash,
        ] {
            assert_eq!(status.as_str().parse::<RecordStatus>().unwrap(), status);
        }
        let err = "pending".parse::<RecordStatus>().unwrap_err();
        assert!(matches!(err, ContentError::UnknownStatus(ref s) if s == "pending"));
        assert_eq!(err.to_string(), "unknown status: pending");
    }

    #[test]
    fn record_serializes_flat_camel_case() {
        let record = Record {
            id: 7,
            fields: RecordFields {
                record_type: "like".into(),
                status: RecordStatus::AutoDraft,
                title: "Like".into(),
                slug: "20240102030405".into(),
                content: String::new(),
            },
            created_at: "2024-01-02T03:04:05+00:00".into(),
            updated_at: "2024-01-02T03:04:05+00:00".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["recordType"], "like");
        assert_eq!(json["status"], "auto-draft");
        assert_eq!(json["slug"], "20240102030405");

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn meta_value_accepts_string_or_list() {
        let single: MetaValue = serde_json::from_str(r#""https://a.test""#).unwrap();
        assert_eq!(single, MetaValue::text("https://a.test"));

        let many: MetaValue = serde_json::from_str(r#"["https://a.test","https://b.test"]"#).unwrap();
        assert_eq!(
            many,
            MetaValue::List(vec!["https://a.test".into(), "https://b.test".into()])
        );
        assert!(MetaValue::List(vec![]).is_empty());
        assert!(MetaValue::text("").is_empty());
    }

    #[test]
    fn changes_only_touch_given_fields() {
        let mut fields = RecordFields::auto_draft("like");
        RecordChanges {
            status: Some(RecordStatus::Publish),
            ..Default::default()
        }
        .apply_to(&mut fields);
        assert_eq!(fields.status, RecordStatus::Publish);
        assert_eq!(fields.title, AUTO_DRAFT_TITLE);
        assert_eq!(fields.slug, "");
    }
}
