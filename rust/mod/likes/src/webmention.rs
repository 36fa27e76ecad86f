use std::sync::Arc;

use likes_content::{ContentRepository, RecordId};
use tracing::warn;

use crate::model::is_like;
use crate::resolver::UrlResolver;

/// NotificationTargetCollector adds a like's URL to the outbound
/// webmention batch.
pub struct NotificationTargetCollector {
    repo: Arc<dyn ContentRepository>,
    resolver: Arc<UrlResolver>,
}

impl NotificationTargetCollector {
    pub fn new(repo: Arc<dyn ContentRepository>, resolver: Arc<UrlResolver>) -> Self {
        Self { repo, resolver }
    }

    /// Append the resolved URL of record `id` to `targets` if it is a like
    /// with a non-empty URL. No deduplication.
    pub fn collect(&self, mut targets: Vec<String>, id: RecordId) -> Vec<String> {
        let record = match self.repo.get_record(id) {
            Ok(Some(record)) => record,
            Ok(None) => return targets,
            Err(e) => {
                warn!(id, error = %e, "webmention targets: record read failed");
                return targets;
            }
        };
        if !is_like(&record) {
            return targets;
        }

        let url = self.resolver.resolve(id);
        if !url.is_empty() {
            targets.push(url);
        }
        targets
    }
}
