//! SaveValidator: stores the submitted liked URL after a write.
//!
//! Every guard is a silent early exit. A save that fails one simply
//! changes nothing; callers get no error either way.

use std::sync::Arc;

use likes_content::{ContentRepository, FormData, MetaValue, RecordId, RecordStatus, SaveContext};
use likes_core::NonceVerifier;
use tracing::{debug, error};

use crate::model::{FIELD_URL, META_LIKE_OF_URL, NONCE_ACTION, NONCE_FIELD};
use crate::sanitize::sanitize_url;

/// Whether `form` carries a valid token for the like edit form.
pub(crate) fn has_valid_token(nonces: &dyn NonceVerifier, form: &FormData) -> bool {
    form.get(NONCE_FIELD)
        .is_some_and(|token| nonces.verify(token, NONCE_ACTION).is_valid())
}

pub struct SaveValidator {
    repo: Arc<dyn ContentRepository>,
    nonces: Arc<dyn NonceVerifier>,
}

impl SaveValidator {
    pub fn new(repo: Arc<dyn ContentRepository>, nonces: Arc<dyn NonceVerifier>) -> Self {
        Self { repo, nonces }
    }

    /// Hook entry point for `content/record_saved`.
    pub fn handle(&self, ctx: &SaveContext) {
        self.on_save(ctx.record.id, &ctx.form, ctx.autosave, ctx.record.fields.status);
    }

    /// `like_url` submitted non-empty is sanitised and stored; submitted
    /// as `""` clears the stored URL; omitted leaves it alone.
    pub fn on_save(&self, id: RecordId, form: &FormData, autosave: bool, status: RecordStatus) {
        if autosave {
            debug!(id, "like save: skipping autosave");
            return;
        }
        if status == RecordStatus::AutoDraft {
            debug!(id, "like save: skipping auto-draft");
            return;
        }
        if !has_valid_token(self.nonces.as_ref(), form) {
            debug!(id, "like save: missing or invalid token");
            return;
        }

        let result = match form.get(FIELD_URL) {
            None => return,
            Some("") => self.repo.delete_meta(id, META_LIKE_OF_URL),
            Some(raw) => {
                // A URL rejected by sanitisation is stored as "".
                let url = sanitize_url(raw);
                self.repo.set_meta(id, META_LIKE_OF_URL, &MetaValue::text(url))
            }
        };
        if let Err(e) = result {
            error!(id, error = %e, "like save: failed to write url");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likes_content::{MemoryRepository, RecordFields};
    use likes_core::HmacNonces;
    use std::time::Duration;

    struct Fixture {
        repo: Arc<MemoryRepository>,
        nonces: Arc<HmacNonces>,
        validator: SaveValidator,
        id: RecordId,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(MemoryRepository::new());
        let nonces = Arc::new(HmacNonces::new(b"test-secret", Duration::from_secs(86_400)).unwrap());
        let validator = SaveValidator::new(repo.clone(), nonces.clone());
        let mut fields = RecordFields::auto_draft("like");
        fields.status = RecordStatus::Draft;
        let id = repo.insert_record(&fields).unwrap();
        repo.set_meta(id, META_LIKE_OF_URL, &MetaValue::text("https://example.com/a")).unwrap();
        Fixture {
            repo,
            nonces,
            validator,
            id,
        }
    }

    impl Fixture {
        fn form(&self) -> FormData {
            FormData::new().with(NONCE_FIELD, &self.nonces.create(NONCE_ACTION))
        }

        fn stored(&self) -> Option<MetaValue> {
            self.repo.get_meta(self.id, META_LIKE_OF_URL).unwrap()
        }
    }

    #[test]
    fn omitted_url_leaves_value_untouched() {
        let f = fixture();
        f.validator.on_save(f.id, &f.form(), false, RecordStatus::Draft);
        assert_eq!(f.stored(), Some(MetaValue::text("https://example.com/a")));
    }

    #[test]
    fn empty_url_clears_value() {
        let f = fixture();
        f.validator
            .on_save(f.id, &f.form().with(FIELD_URL, ""), false, RecordStatus::Draft);
        assert_eq!(f.stored(), None);
    }

    #[test]
    fn submitted_url_is_stored() {
        let f = fixture();
        let form = f.form().with(FIELD_URL, "https://example.org/b");
        f.validator.on_save(f.id, &form, false, RecordStatus::Publish);
        assert_eq!(f.stored(), Some(MetaValue::text("https://example.org/b")));
    }

    #[test]
    fn rejected_url_is_stored_empty() {
        let f = fixture();
        let form = f.form().with(FIELD_URL, "javascript:alert(1)");
        f.validator.on_save(f.id, &form, false, RecordStatus::Draft);
        assert_eq!(f.stored(), Some(MetaValue::text("")));
    }

    #[test]
    fn guards_prevent_any_change() {
        let f = fixture();
        let form = f.form().with(FIELD_URL, "https://evil.test");

        f.validator.on_save(f.id, &form, true, RecordStatus::Draft);
        f.validator.on_save(f.id, &form, false, RecordStatus::AutoDraft);

        let forged = FormData::new()
            .with(NONCE_FIELD, "00000000000000000000")
            .with(FIELD_URL, "https://evil.test");
        f.validator.on_save(f.id, &forged, false, RecordStatus::Draft);

        let missing = FormData::new().with(FIELD_URL, "");
        f.validator.on_save(f.id, &missing, false, RecordStatus::Draft);

        assert_eq!(f.stored(), Some(MetaValue::text("https://example.com/a")));
    }

    #[test]
    fn token_for_another_action_is_rejected() {
        let f = fixture();
        let form = FormData::new()
            .with(NONCE_FIELD, &f.nonces.create("delete-like"))
            .with(FIELD_URL, "");
        f.validator.on_save(f.id, &form, false, RecordStatus::Draft);
        assert!(f.stored().is_some());
    }
}
