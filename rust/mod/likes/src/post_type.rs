use std::sync::Arc;

use likes_content::{MetaBox, PostTypeDefinition, PostTypeLabels, Record};
use likes_core::I18nStore;

use crate::meta_box::LikeMetaBox;
use crate::model::{ARCHIVE_SLUG, RECORD_TYPE, TEXT_DOMAIN};

const MENU_POSITION: u32 = 6;
const MENU_ICON: &str = "dashicons-star-filled";

/// Declaration of the `like` record type, labels in the current locale.
pub fn definition(i18n: &I18nStore, meta_box: Arc<LikeMetaBox>) -> PostTypeDefinition {
    let t = |text: &str| i18n.translate(TEXT_DOMAIN, text);

    PostTypeDefinition {
        name: RECORD_TYPE.to_string(),
        labels: PostTypeLabels {
            name: t("Likes"),
            singular_name: t("Like"),
            add_new_item: t("Add New Like"),
            view_item: t("View Like"),
            view_items: t("View Likes"),
            all_items: t("All Likes"),
            search_items: t("Search Likes"),
            not_found: t("No likes found."),
            not_found_in_trash: t("No likes found in Trash."),
        },
        public: true,
        show_in_rest: true,
        has_archive: true,
        rewrite_slug: ARCHIVE_SLUG.to_string(),
        menu_position: MENU_POSITION,
        menu_icon: MENU_ICON.to_string(),
        supports: Vec::new(),
        meta_box: Some(MetaBox {
            id: LikeMetaBox::ID.to_string(),
            title: t("Like data"),
            render: Arc::new(move |record: &Record| meta_box.render(record)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::UrlResolver;
    use likes_content::MemoryRepository;
    use likes_core::{HmacNonces, StaticCatalog};
    use std::time::Duration;

    fn meta_box(i18n: Arc<I18nStore>) -> Arc<LikeMetaBox> {
        let repo = Arc::new(MemoryRepository::new());
        let nonces = Arc::new(HmacNonces::new(b"secret", Duration::from_secs(3600)).unwrap());
        Arc::new(LikeMetaBox::new(Arc::new(UrlResolver::new(repo)), nonces, i18n))
    }

    #[test]
    fn declares_like_capabilities() {
        let i18n = Arc::new(I18nStore::new("en"));
        let def = definition(&i18n, meta_box(i18n.clone()));
        assert_eq!(def.name, "like");
        assert_eq!(def.rewrite_slug, "liked");
        assert!(def.public && def.show_in_rest && def.has_archive);
        assert!(def.supports.is_empty());
        assert_eq!(def.menu_position, 6);
        assert_eq!(def.labels.not_found_in_trash, "No likes found in Trash.");
        let mb = def.meta_box.unwrap();
        assert_eq!(mb.id, "like-data-primary");
        assert_eq!(mb.title, "Like data");
    }

    #[test]
    fn labels_follow_locale() {
        let i18n = Arc::new(I18nStore::new("fr"));
        let mut catalog = StaticCatalog::new();
        catalog.insert("fr", "Likes", "J'aime");
        catalog.insert("fr", "Like data", "Données du j'aime");
        i18n.handle(TEXT_DOMAIN, Arc::new(catalog));

        let def = definition(&i18n, meta_box(i18n.clone()));
        assert_eq!(def.labels.name, "J'aime");
        assert_eq!(def.labels.all_items, "All Likes");
        assert_eq!(def.meta_box.unwrap().title, "Données du j'aime");
    }
}
