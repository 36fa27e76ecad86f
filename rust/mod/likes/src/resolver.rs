//! UrlResolver: the effective liked URL of a record.
//!
//! Resolution order is fixed:
//!
//! 1. `like_of_url`, if non-empty.
//! 2. `mf2_like-of`, taking the last element when it is a list.
//! 3. `""`.

use std::sync::Arc;

use likes_content::{ContentRepository, MetaValue, RecordId};
use tracing::warn;

use crate::model::{META_LEGACY_LIKE_OF, META_LIKE_OF_URL};

pub struct UrlResolver {
    repo: Arc<dyn ContentRepository>,
}

impl UrlResolver {
    pub fn new(repo: Arc<dyn ContentRepository>) -> Self {
        Self { repo }
    }

    /// Effective liked URL of record `id`. Never fails: unreadable or absent
    /// metadata resolves to `""`.
    pub fn resolve(&self, id: RecordId) -> String {
        resolve_values(self.read(id, META_LIKE_OF_URL), self.read(id, META_LEGACY_LIKE_OF))
    }

    fn read(&self, id: RecordId, key: &str) -> Option<MetaValue> {
        self.repo.get_meta(id, key).unwrap_or_else(|e| {
            warn!(id, key, error = %e, "like url: metadata read failed");
            None
        })
    }
}

/// Pure resolution over already-loaded metadata values.
pub fn resolve_values(primary: Option<MetaValue>, legacy: Option<MetaValue>) -> String {
    let primary = primary.map(collapse).unwrap_or_default();
    if !primary.is_empty() {
        return primary;
    }
    legacy.map(collapse).unwrap_or_default()
}

fn collapse(value: MetaValue) -> String {
    match value {
        MetaValue::Text(s) => s,
        MetaValue::List(mut items) => items.pop().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likes_content::{MemoryRepository, RecordFields};

    fn text(s: &str) -> Option<MetaValue> {
        Some(MetaValue::text(s))
    }

    fn list(items: &[&str]) -> Option<MetaValue> {
        Some(MetaValue::List(items.iter().map(|s| s.to_string()).collect()))
    }

    #[test]
    fn canonical_wins_over_legacy() {
        assert_eq!(
            resolve_values(text("https://example.com/a"), text("https://legacy.test")),
            "https://example.com/a"
        );
        assert_eq!(
            resolve_values(text("https://example.com/a"), list(&["https://x.test"])),
            "https://example.com/a"
        );
    }

    #[test]
    fn falls_back_to_legacy() {
        assert_eq!(resolve_values(None, text("https://legacy.test")), "https://legacy.test");
        assert_eq!(resolve_values(text(""), text("https://legacy.test")), "https://legacy.test");
    }

    #[test]
    fn legacy_list_takes_last_element() {
        assert_eq!(
            resolve_values(None, list(&["https://first.test", "https://last.test"])),
            "https://last.test"
        );
    }

    #[test]
    fn nothing_resolves_to_empty() {
        assert_eq!(resolve_values(None, None), "");
        assert_eq!(resolve_values(text(""), text("")), "");
        assert_eq!(resolve_values(None, list(&[])), "");
    }

    #[test]
    fn resolves_from_repository() {
        let repo = Arc::new(MemoryRepository::new());
        let id = repo.insert_record(&RecordFields::auto_draft("like")).unwrap();
        let resolver = UrlResolver::new(repo.clone());
        assert_eq!(resolver.resolve(id), "");

        repo.set_meta(id, META_LEGACY_LIKE_OF, &MetaValue::List(vec!["https://x.test".into()]))
            .unwrap();
        assert_eq!(resolver.resolve(id), "https://x.test");

        repo.set_meta(id, META_LIKE_OF_URL, &MetaValue::text("https://y.test")).unwrap();
        assert_eq!(resolver.resolve(id), "https://y.test");

        // Missing records resolve to nothing.
        assert_eq!(resolver.resolve(999), "");
    }
}
