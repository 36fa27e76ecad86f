//! ContentWriter: the record write pipeline.
//!
//! Every insert and update goes through the same steps:
//!
//! 1. `INSERT_RECORD_DATA` filters the fields about to be written.
//! 2. The repository persists them.
//! 3. `RECORD_SAVED` runs with the persisted record.
//!
//! Deletion fires nothing.

use std::sync::Arc;

use likes_core::HookRegistry;
use tracing::{debug, info};

use crate::error::ContentError;
use crate::events::{self, InsertContext, SaveContext, WriteRequest};
use crate::record::{Record, RecordChanges, RecordFields, RecordId, RecordStatus};
use crate::traits::ContentRepository;

pub struct ContentWriter {
    repo: Arc<dyn ContentRepository>,
    hooks: Arc<HookRegistry>,
}

impl ContentWriter {
    pub fn new(repo: Arc<dyn ContentRepository>, hooks: Arc<HookRegistry>) -> Self {
        Self { repo, hooks }
    }

    pub fn repo(&self) -> &Arc<dyn ContentRepository> {
        &self.repo
    }

    /// Create an empty draft of `record_type` for the editor to fill in.
    pub fn create_auto_draft(&self, record_type: &str) -> Result<Record, ContentError> {
        self.insert(RecordFields::auto_draft(record_type), &WriteRequest::default())
    }

    /// Insert a new record.
    pub fn insert(&self, fields: RecordFields, req: &WriteRequest) -> Result<Record, ContentError> {
        let ctx = InsertContext {
            record_id: None,
            form: req.form.clone(),
        };
        let fields = self.hooks.apply_filters(events::INSERT_RECORD_DATA, fields, &ctx);

        let id = self.repo.insert_record(&fields)?;
        let record = self.reload(id)?;
        info!(id, record_type = %record.fields.record_type, status = %record.fields.status, "record created");

        self.fire_saved(&record, req, false);
        Ok(record)
    }

    /// Apply `changes` to an existing record and write it.
    pub fn update(
        &self,
        id: RecordId,
        changes: RecordChanges,
        req: &WriteRequest,
    ) -> Result<Record, ContentError> {
        let existing = self.reload(id)?;
        let mut fields = existing.fields;
        changes.apply_to(&mut fields);

        let ctx = InsertContext {
            record_id: Some(id),
            form: req.form.clone(),
        };
        let fields = self.hooks.apply_filters(events::INSERT_RECORD_DATA, fields, &ctx);

        self.repo.update_record(id, &fields)?;
        let record = self.reload(id)?;
        debug!(id, status = %record.fields.status, autosave = req.autosave, "record updated");

        self.fire_saved(&record, req, true);
        Ok(record)
    }

    /// Move a record to the trash.
    pub fn trash(&self, id: RecordId) -> Result<Record, ContentError> {
        let changes = RecordChanges {
            status: Some(RecordStatus::Trash),
            ..Default::default()
        };
        self.update(id, changes, &WriteRequest::default())
    }

    /// Permanently delete a record and its metadata.
    pub fn delete(&self, id: RecordId) -> Result<(), ContentError> {
        self.repo.delete_record(id)?;
        info!(id, "record deleted");
        Ok(())
    }

    fn reload(&self, id: RecordId) -> Result<Record, ContentError> {
        self.repo.get_record(id)?.ok_or(ContentError::NotFound(id))
    }

    fn fire_saved(&self, record: &Record, req: &WriteRequest, update: bool) {
        let ctx = SaveContext {
            record: record.clone(),
            form: req.form.clone(),
            autosave: req.autosave,
            update,
        };
        self.hooks.do_action(events::RECORD_SAVED, &ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FormData;
    use crate::memory::MemoryRepository;
    use crate::record::{AUTO_DRAFT_TITLE, MetaValue};
    use likes_core::DEFAULT_PRIORITY;
    use std::sync::Mutex;

    fn writer() -> (ContentWriter, Arc<HookRegistry>, Arc<dyn ContentRepository>) {
        let repo: Arc<dyn ContentRepository> = Arc::new(MemoryRepository::new());
        let hooks = Arc::new(HookRegistry::new());
        (
            ContentWriter::new(Arc::clone(&repo), Arc::clone(&hooks)),
            hooks,
            repo,
        )
    }

    #[test]
    fn auto_draft_has_placeholder_title() {
        let (writer, _, _) = writer();
        let record = writer.create_auto_draft("like").unwrap();
        assert_eq!(record.fields.status, RecordStatus::AutoDraft);
        assert_eq!(record.fields.title, AUTO_DRAFT_TITLE);
        assert_eq!(record.fields.slug, "");
    }

    #[test]
    fn insert_filter_runs_before_persist() {
        let (writer, hooks, repo) = writer();
        hooks.add_filter(
            events::INSERT_RECORD_DATA,
            DEFAULT_PRIORITY,
            |mut fields: RecordFields, ctx: &InsertContext| {
                if ctx.record_id.is_none() {
                    fields.slug = "filtered".into();
                }
                fields
            },
        );

        let record = writer.create_auto_draft("like").unwrap();
        assert_eq!(repo.get_record(record.id).unwrap().unwrap().fields.slug, "filtered");
    }

    #[test]
    fn saved_action_sees_persisted_record_and_form() {
        let (writer, hooks, repo) = writer();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let r = Arc::clone(&repo);
        hooks.add_action(events::RECORD_SAVED, DEFAULT_PRIORITY, move |ctx: &SaveContext| {
            s.lock().unwrap().push((ctx.record.fields.status, ctx.update, ctx.autosave));
            if let Some(note) = ctx.form.get("note") {
                r.set_meta(ctx.record.id, "note", &MetaValue::text(note)).unwrap();
            }
        });

        let record = writer.create_auto_draft("like").unwrap();
        let form = FormData::new().with("note", "hello");
        let changes = RecordChanges {
            status: Some(RecordStatus::Publish),
            ..Default::default()
        };
        writer.update(record.id, changes, &WriteRequest::form(form)).unwrap();
        writer
            .update(record.id, RecordChanges::default(), &WriteRequest::autosave(FormData::new()))
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (RecordStatus::AutoDraft, false, false),
                (RecordStatus::Publish, true, false),
                (RecordStatus::Publish, true, true),
            ]
        );
        assert_eq!(repo.get_meta(record.id, "note").unwrap(), Some(MetaValue::text("hello")));
    }

    #[test]
    fn trash_and_delete() {
        let (writer, _, repo) = writer();
        let record = writer.create_auto_draft("like").unwrap();

        let trashed = writer.trash(record.id).unwrap();
        assert_eq!(trashed.fields.status, RecordStatus::Trash);

        writer.delete(record.id).unwrap();
        assert!(repo.get_record(record.id).unwrap().is_none());
    }

    #[test]
    fn update_missing_record_is_not_found() {
        let (writer, _, _) = writer();
        let err = writer
            .update(404, RecordChanges::default(), &WriteRequest::default())
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound(404)));
    }
}
