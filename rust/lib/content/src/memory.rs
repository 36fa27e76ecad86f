use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::ContentError;
use crate::now_rfc3339;
use crate::record::{MetaValue, Record, RecordFields, RecordId};
use crate::traits::ContentRepository;

#[derive(Default)]
struct State {
    next_id: RecordId,
    records: BTreeMap<RecordId, Record>,
    meta: BTreeMap<(RecordId, String), MetaValue>,
}

/// MemoryRepository keeps everything in process memory. Same semantics as
/// the redb backend; nothing survives a restart.
#[derive(Default)]
pub struct MemoryRepository {
    state: RwLock<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ContentRepository for MemoryRepository {
    fn insert_record(&self, fields: &RecordFields) -> Result<RecordId, ContentError> {
        let mut state = self.write();
        state.next_id += 1;
        let id = state.next_id;
        let now = now_rfc3339();
        state.records.insert(
            id,
            Record {
                id,
                fields: fields.clone(),
                created_at: now.clone(),
                updated_at: now,
            },
        );
        Ok(id)
    }

    fn update_record(&self, id: RecordId, fields: &RecordFields) -> Result<(), ContentError> {
        let mut state = self.write();
        let record = state.records.get_mut(&id).ok_or(ContentError::NotFound(id))?;
        record.fields = fields.clone();
        record.updated_at = now_rfc3339();
        Ok(())
    }

    fn get_record(&self, id: RecordId) -> Result<Option<Record>, ContentError> {
        Ok(self.read().records.get(&id).cloned())
    }

    fn list_records(&self, record_type: &str) -> Result<Vec<Record>, ContentError> {
        Ok(self
            .read()
            .records
            .values()
            .filter(|r| r.is_type(record_type))
            .cloned()
            .collect())
    }

    fn delete_record(&self, id: RecordId) -> Result<(), ContentError> {
        let mut state = self.write();
        state.records.remove(&id);
        state.meta.retain(|(record_id, _), _| *record_id != id);
        Ok(())
    }

    fn get_meta(&self, id: RecordId, key: &str) -> Result<Option<MetaValue>, ContentError> {
        Ok(self.read().meta.get(&(id, key.to_string())).cloned())
    }

    fn set_meta(&self, id: RecordId, key: &str, value: &MetaValue) -> Result<(), ContentError> {
        let mut state = self.write();
        if !state.records.contains_key(&id) {
            return Err(ContentError::NotFound(id));
        }
        state.meta.insert((id, key.to_string()), value.clone());
        Ok(())
    }

    fn delete_meta(&self, id: RecordId, key: &str) -> Result<(), ContentError> {
        self.write().meta.remove(&(id, key.to_string()));
        Ok(())
    }
}
