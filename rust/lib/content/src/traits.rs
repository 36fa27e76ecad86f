use crate::error::ContentError;
use crate::record::{MetaValue, Record, RecordFields, RecordId};

/// ContentRepository stores typed records plus free-form per-record metadata.
///
/// Records are addressed by an opaque integer id assigned on insert.
/// Metadata is a flat key → [`MetaValue`] map per record. Every read is the
/// current snapshot and every write is last-writer-wins.
pub trait ContentRepository: Send + Sync {
    /// Persist a new record and return its assigned id.
    fn insert_record(&self, fields: &RecordFields) -> Result<RecordId, ContentError>;

    /// Overwrite an existing record's fields. Returns `ContentError::NotFound`
    /// if the record does not exist.
    fn update_record(&self, id: RecordId, fields: &RecordFields) -> Result<(), ContentError>;

    /// Get a record. Returns None if it does not exist.
    fn get_record(&self, id: RecordId) -> Result<Option<Record>, ContentError>;

    /// All records of one type, ordered by id.
    fn list_records(&self, record_type: &str) -> Result<Vec<Record>, ContentError>;

    /// Delete a record together with all of its metadata. Deleting a missing
    /// record is not an error.
    fn delete_record(&self, id: RecordId) -> Result<(), ContentError>;

    /// Get one metadata value. Returns None if the key is not set.
    fn get_meta(&self, id: RecordId, key: &str) -> Result<Option<MetaValue>, ContentError>;

    /// Set one metadata value, replacing any previous value.
    fn set_meta(&self, id: RecordId, key: &str, value: &MetaValue) -> Result<(), ContentError>;

    /// Remove one metadata value. Removing a missing key is not an error.
    fn delete_meta(&self, id: RecordId, key: &str) -> Result<(), ContentError>;

    /// Find a record of `record_type` by slug.
    fn find_by_slug(&self, record_type: &str, slug: &str) -> Result<Option<Record>, ContentError> {
        Ok(self
            .list_records(record_type)?
            .into_iter()
            .find(|r| r.fields.slug == slug))
    }
}
