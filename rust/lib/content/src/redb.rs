use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ContentError;
use crate::now_rfc3339;
use crate::record::{MetaValue, Record, RecordFields, RecordId};
use crate::traits::ContentRepository;

const RECORDS: TableDefinition<u64, &[u8]> = TableDefinition::new("records");
/// Keyed `"{id:020}/{meta_key}"` so one record's metadata is a contiguous range.
const META: TableDefinition<&str, &[u8]> = TableDefinition::new("record_meta");
const SEQUENCE: TableDefinition<&str, u64> = TableDefinition::new("sequence");

const RECORD_SEQUENCE: &str = "record";

/// RedbRepository is a ContentRepository backed by redb, a pure-Rust
/// embedded key-value database. Records and metadata are stored as JSON.
pub struct RedbRepository {
    db: Arc<Database>,
}

impl RedbRepository {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, ContentError> {
        let db = Database::create(path).map_err(storage)?;

        // Ensure the tables exist by doing a write transaction.
        let write_txn = db.begin_write().map_err(storage)?;
        {
            write_txn.open_table(RECORDS).map_err(storage)?;
            write_txn.open_table(META).map_err(storage)?;
            write_txn.open_table(SEQUENCE).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl ContentRepository for RedbRepository {
    fn insert_record(&self, fields: &RecordFields) -> Result<RecordId, ContentError> {
        let now = now_rfc3339();
        let write_txn = self.db.begin_write().map_err(storage)?;
        let id = {
            let mut sequence = write_txn.open_table(SEQUENCE).map_err(storage)?;
            let id = sequence
                .get(RECORD_SEQUENCE)
                .map_err(storage)?
                .map(|v| v.value())
                .unwrap_or(0)
                + 1;
            sequence.insert(RECORD_SEQUENCE, id).map_err(storage)?;

            let record = Record {
                id,
                fields: fields.clone(),
                created_at: now.clone(),
                updated_at: now,
            };
            let bytes = encode(&record)?;
            let mut records = write_txn.open_table(RECORDS).map_err(storage)?;
            records.insert(id, bytes.as_slice()).map_err(storage)?;
            id
        };
        write_txn.commit().map_err(storage)?;
        Ok(id)
    }

    fn update_record(&self, id: RecordId, fields: &RecordFields) -> Result<(), ContentError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut records = write_txn.open_table(RECORDS).map_err(storage)?;
            let existing = records
                .get(id)
                .map_err(storage)?
                .map(|v| v.value().to_vec())
                .ok_or(ContentError::NotFound(id))?;
            let existing: Record = decode(&existing)?;

            let record = Record {
                id,
                fields: fields.clone(),
                created_at: existing.created_at,
                updated_at: now_rfc3339(),
            };
            let bytes = encode(&record)?;
            records.insert(id, bytes.as_slice()).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn get_record(&self, id: RecordId) -> Result<Option<Record>, ContentError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let records = read_txn.open_table(RECORDS).map_err(storage)?;

        match records.get(id).map_err(storage)? {
            Some(val) => Ok(Some(decode(val.value())?)),
            None => Ok(None),
        }
    }

    fn list_records(&self, record_type: &str) -> Result<Vec<Record>, ContentError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let records = read_txn.open_table(RECORDS).map_err(storage)?;

        let mut results = Vec::new();
        for entry in records.iter().map_err(storage)? {
            let entry = entry.map_err(storage)?;
            let record: Record = decode(entry.1.value())?;
            if record.is_type(record_type) {
                results.push(record);
            }
        }
        Ok(results)
    }

    fn delete_record(&self, id: RecordId) -> Result<(), ContentError> {
        let prefix = meta_prefix(id);
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut records = write_txn.open_table(RECORDS).map_err(storage)?;
            records.remove(id).map_err(storage)?;

            let mut meta = write_txn.open_table(META).map_err(storage)?;
            let mut keys = Vec::new();
            for entry in meta.range(prefix.as_str()..).map_err(storage)? {
                let entry = entry.map_err(storage)?;
                let key = entry.0.value().to_string();
                if !key.starts_with(&prefix) {
                    break;
                }
                keys.push(key);
            }
            for key in &keys {
                meta.remove(key.as_str()).map_err(storage)?;
            }
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn get_meta(&self, id: RecordId, key: &str) -> Result<Option<MetaValue>, ContentError> {
        let read_txn = self.db.begin_read().map_err(storage)?;
        let meta = read_txn.open_table(META).map_err(storage)?;

        match meta.get(meta_key(id, key).as_str()).map_err(storage)? {
            Some(val) => Ok(Some(decode(val.value())?)),
            None => Ok(None),
        }
    }

    fn set_meta(&self, id: RecordId, key: &str, value: &MetaValue) -> Result<(), ContentError> {
        let bytes = encode(value)?;
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let records = write_txn.open_table(RECORDS).map_err(storage)?;
            if records.get(id).map_err(storage)?.is_none() {
                return Err(ContentError::NotFound(id));
            }

            let mut meta = write_txn.open_table(META).map_err(storage)?;
            meta.insert(meta_key(id, key).as_str(), bytes.as_slice())
                .map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }

    fn delete_meta(&self, id: RecordId, key: &str) -> Result<(), ContentError> {
        let write_txn = self.db.begin_write().map_err(storage)?;
        {
            let mut meta = write_txn.open_table(META).map_err(storage)?;
            meta.remove(meta_key(id, key).as_str()).map_err(storage)?;
        }
        write_txn.commit().map_err(storage)?;
        Ok(())
    }
}

fn meta_prefix(id: RecordId) -> String {
    format!("{id:020}/")
}

fn meta_key(id: RecordId, key: &str) -> String {
    format!("{id:020}/{key}")
}

fn storage<E: std::fmt::Display>(e: E) -> ContentError {
    ContentError::Storage(e.to_string())
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ContentError> {
    serde_json::to_vec(value).map_err(|e| ContentError::Serialization(e.to_string()))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ContentError> {
    serde_json::from_slice(bytes).map_err(|e| ContentError::Serialization(e.to_string()))
}
