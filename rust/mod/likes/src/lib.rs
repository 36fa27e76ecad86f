pub mod api;
pub mod defaults;
pub mod meta_box;
pub mod model;
pub mod post_type;
pub mod render;
pub mod resolver;
pub mod sanitize;
pub mod save;
pub mod webmention;

use std::sync::Arc;

use axum::Router;
use likes_content::events::{self, InsertContext, RenderContext, SaveContext};
use likes_content::{ContentRepository, ContentWriter, PostTypeRegistry, RecordFields, RecordId};
use likes_core::{DEFAULT_PRIORITY, HookRegistry, I18nStore, Module, NonceVerifier};
use tracing::info;

use defaults::TitleSlugDeriver;
use meta_box::LikeMetaBox;
use render::PresentationRenderer;
use resolver::UrlResolver;
use save::SaveValidator;
use webmention::NotificationTargetCollector;

/// The like components, wired to their collaborators.
pub struct LikesService {
    pub repo: Arc<dyn ContentRepository>,
    pub resolver: Arc<UrlResolver>,
    pub validator: SaveValidator,
    pub deriver: TitleSlugDeriver,
    pub collector: NotificationTargetCollector,
    pub renderer: PresentationRenderer,
    pub meta_box: Arc<LikeMetaBox>,
    pub i18n: Arc<I18nStore>,
}

impl LikesService {
    pub fn new(
        repo: Arc<dyn ContentRepository>,
        nonces: Arc<dyn NonceVerifier>,
        i18n: Arc<I18nStore>,
    ) -> Self {
        let resolver = Arc::new(UrlResolver::new(Arc::clone(&repo)));
        Self {
            validator: SaveValidator::new(Arc::clone(&repo), Arc::clone(&nonces)),
            deriver: TitleSlugDeriver::new(Arc::clone(&nonces), Arc::clone(&i18n)),
            collector: NotificationTargetCollector::new(Arc::clone(&repo), Arc::clone(&resolver)),
            renderer: PresentationRenderer::new(Arc::clone(&resolver)),
            meta_box: Arc::new(LikeMetaBox::new(
                Arc::clone(&resolver),
                nonces,
                Arc::clone(&i18n),
            )),
            repo,
            resolver,
            i18n,
        }
    }
}

/// Likes module: registers the `like` record type and its hook callbacks,
/// and serves the site, REST and admin routes.
pub struct LikesModule {
    service: Arc<LikesService>,
    writer: Arc<ContentWriter>,
    hooks: Arc<HookRegistry>,
    post_types: Arc<PostTypeRegistry>,
}

impl LikesModule {
    pub fn new(
        service: LikesService,
        writer: Arc<ContentWriter>,
        hooks: Arc<HookRegistry>,
        post_types: Arc<PostTypeRegistry>,
    ) -> Self {
        Self {
            service: Arc::new(service),
            writer,
            hooks,
            post_types,
        }
    }

    pub fn service(&self) -> &Arc<LikesService> {
        &self.service
    }
}

impl Module for LikesModule {
    fn name(&self) -> &str {
        "likes"
    }

    fn register(&self, hooks: &HookRegistry) {
        self.post_types.register(post_type::definition(
            &self.service.i18n,
            Arc::clone(&self.service.meta_box),
        ));

        let svc = Arc::clone(&self.service);
        hooks.add_filter(
            events::INSERT_RECORD_DATA,
            DEFAULT_PRIORITY,
            move |fields: RecordFields, ctx: &InsertContext| svc.deriver.handle(fields, ctx),
        );

        let svc = Arc::clone(&self.service);
        hooks.add_action(
            events::RECORD_SAVED,
            DEFAULT_PRIORITY,
            move |ctx: &SaveContext| svc.validator.handle(ctx),
        );

        let svc = Arc::clone(&self.service);
        hooks.add_filter(
            events::NOTIFICATION_TARGETS,
            DEFAULT_PRIORITY,
            move |targets: Vec<String>, id: &RecordId| svc.collector.collect(targets, *id),
        );

        let svc = Arc::clone(&self.service);
        hooks.add_filter(
            events::RENDER_CONTENT,
            DEFAULT_PRIORITY,
            move |content: String, ctx: &RenderContext| svc.renderer.handle(content, ctx),
        );

        info!(record_type = model::RECORD_TYPE, "likes: registered record type and hooks");
    }

    fn routes(&self) -> Router {
        api::router(Arc::new(api::ApiState {
            service: Arc::clone(&self.service),
            writer: Arc::clone(&self.writer),
            hooks: Arc::clone(&self.hooks),
            post_types: Arc::clone(&self.post_types),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use likes_content::MemoryRepository;
    use likes_core::HmacNonces;
    use std::time::Duration;

    #[test]
    fn register_wires_record_type_and_hooks() {
        let repo: Arc<dyn ContentRepository> = Arc::new(MemoryRepository::new());
        let nonces = Arc::new(HmacNonces::new(b"secret", Duration::from_secs(3600)).unwrap());
        let hooks = Arc::new(HookRegistry::new());
        let post_types = Arc::new(PostTypeRegistry::new());
        let writer = Arc::new(ContentWriter::new(Arc::clone(&repo), Arc::clone(&hooks)));
        let service = LikesService::new(repo, nonces, Arc::new(I18nStore::new("en")));
        let module = LikesModule::new(service, writer, Arc::clone(&hooks), Arc::clone(&post_types));

        module.register(&hooks);

        assert_eq!(module.name(), "likes");
        assert_eq!(post_types.by_rewrite_slug("liked").unwrap().name, "like");
        for event in [
            events::INSERT_RECORD_DATA,
            events::RECORD_SAVED,
            events::NOTIFICATION_TARGETS,
            events::RENDER_CONTENT,
        ] {
            assert_eq!(hooks.hook_count(event), 1, "{event}");
        }
    }
}
