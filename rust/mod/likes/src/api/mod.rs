pub mod admin;
pub mod rest;
pub mod site;

use std::sync::Arc;

use axum::Router;
use likes_content::{ContentWriter, PostTypeRegistry, Record, RecordId, RecordStatus};
use likes_core::{HookRegistry, ServiceError};

use crate::LikesService;
use crate::model::{LikeRecord, RECORD_TYPE, is_like};

/// Shared state of every likes route.
pub struct ApiState {
    pub service: Arc<LikesService>,
    pub writer: Arc<ContentWriter>,
    pub hooks: Arc<HookRegistry>,
    pub post_types: Arc<PostTypeRegistry>,
}

pub type AppState = Arc<ApiState>;

/// Build the likes router: site pages, REST and admin.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(site::routes())
        .merge(rest::routes())
        .merge(admin::routes())
        .with_state(state)
}

impl ApiState {
    /// Load record `id`, which must be a like.
    fn load_like(&self, id: RecordId) -> Result<Record, ServiceError> {
        match self.service.repo.get_record(id)? {
            Some(record) if is_like(&record) => Ok(record),
            _ => Err(ServiceError::NotFound(format!("like {id} not found"))),
        }
    }

    /// Published likes, newest first.
    fn published_likes(&self) -> Result<Vec<Record>, ServiceError> {
        let mut likes: Vec<Record> = self
            .service
            .repo
            .list_records(RECORD_TYPE)?
            .into_iter()
            .filter(|r| r.fields.status == RecordStatus::Publish)
            .collect();
        likes.reverse();
        Ok(likes)
    }

    fn view(&self, record: Record) -> LikeRecord {
        let like_of = self.service.resolver.resolve(record.id);
        LikeRecord::new(record, like_of)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use likes_content::{ContentRepository, ContentWriter, MemoryRepository, PostTypeRegistry};
    use likes_core::{HmacNonces, HookRegistry, I18nStore, Module};
    use tower::ServiceExt;

    use crate::{LikesModule, LikesService};

    pub struct Harness {
        pub router: Router,
        pub repo: Arc<MemoryRepository>,
        pub nonces: Arc<HmacNonces>,
        pub hooks: Arc<HookRegistry>,
    }

    pub fn harness() -> Harness {
        build(true)
    }

    /// Routes of a module whose record type and hooks were never registered.
    pub fn unregistered_harness() -> Harness {
        build(false)
    }

    fn build(register: bool) -> Harness {
        let repo = Arc::new(MemoryRepository::new());
        let nonces = Arc::new(HmacNonces::new(b"test-secret", Duration::from_secs(86_400)).unwrap());
        let i18n = Arc::new(I18nStore::new("en"));
        let hooks = Arc::new(HookRegistry::new());
        let post_types = Arc::new(PostTypeRegistry::new());
        let dyn_repo: Arc<dyn ContentRepository> = repo.clone();
        let writer = Arc::new(ContentWriter::new(dyn_repo.clone(), hooks.clone()));

        let service = LikesService::new(dyn_repo, nonces.clone(), i18n);
        let module = LikesModule::new(service, writer, hooks.clone(), post_types);
        if register {
            module.register(&hooks);
        }

        Harness {
            router: module.routes(),
            repo,
            nonces,
            hooks,
        }
    }

    /// Send a request; `form` is sent url-encoded.
    pub async fn call(
        router: &Router,
        method: &str,
        uri: &str,
        form: Option<&[(&str, &str)]>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match form {
            Some(pairs) => {
                builder = builder.header("content-type", "application/x-www-form-urlencoded");
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs.iter())
                    .finish();
                Body::from(encoded)
            }
            None => Body::empty(),
        };
        let req = builder.body(body).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub fn json(body: &str) -> serde_json::Value {
        serde_json::from_str(body).unwrap_or(serde_json::Value::Null)
    }
}
