use std::sync::Arc;

use likes_content::Record;
use likes_core::{I18nStore, NonceVerifier};

use crate::model::{FIELD_TITLE, FIELD_URL, NONCE_ACTION, NONCE_FIELD, TEXT_DOMAIN};
use crate::resolver::UrlResolver;
use crate::sanitize::{esc_attr, esc_html, esc_url};

/// Edit panel of a like: a hidden anti-forgery token, the URL input
/// pre-filled with the resolved URL, and the title input.
pub struct LikeMetaBox {
    resolver: Arc<UrlResolver>,
    nonces: Arc<dyn NonceVerifier>,
    i18n: Arc<I18nStore>,
}

impl LikeMetaBox {
    pub const ID: &'static str = "like-data-primary";

    pub fn new(
        resolver: Arc<UrlResolver>,
        nonces: Arc<dyn NonceVerifier>,
        i18n: Arc<I18nStore>,
    ) -> Self {
        Self {
            resolver,
            nonces,
            i18n,
        }
    }

    pub fn render(&self, record: &Record) -> String {
        let nonce = self.nonces.create(NONCE_ACTION);
        let url = self.resolver.resolve(record.id);
        let url_label = esc_html(&self.i18n.translate(TEXT_DOMAIN, "URL"));
        let title_label = esc_html(&self.i18n.translate(TEXT_DOMAIN, "Title"));

        format!(
            "<input type=\"hidden\" id=\"{NONCE_FIELD}\" name=\"{NONCE_FIELD}\" value=\"{}\" />\n\
             <h3>{url_label}</h3>\n\
             <input class=\"widefat\" type=\"text\" id=\"like-url\" name=\"{FIELD_URL}\" value=\"{}\" />\n\
             <h3>{title_label}</h3>\n\
             <input class=\"widefat\" type=\"text\" id=\"like-title\" name=\"{FIELD_TITLE}\" value=\"{}\" />\n",
            esc_attr(&nonce),
            esc_url(&url),
            esc_attr(&record.fields.title),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::META_LEGACY_LIKE_OF;
    use likes_content::{ContentRepository, MemoryRepository, MetaValue, RecordFields};
    use likes_core::HmacNonces;
    use std::time::Duration;

    #[test]
    fn renders_fields_prefilled() {
        let repo = Arc::new(MemoryRepository::new());
        let nonces = Arc::new(HmacNonces::new(b"secret", Duration::from_secs(3600)).unwrap());
        let meta_box = LikeMetaBox::new(
            Arc::new(UrlResolver::new(repo.clone())),
            nonces.clone(),
            Arc::new(I18nStore::new("en")),
        );

        let mut fields = RecordFields::auto_draft("like");
        fields.title = "Say \"hi\"".into();
        let id = repo.insert_record(&fields).unwrap();
        repo.set_meta(id, META_LEGACY_LIKE_OF, &MetaValue::List(vec!["https://x.test/".into()]))
            .unwrap();
        let record = repo.get_record(id).unwrap().unwrap();

        let html = meta_box.render(&record);
        assert!(html.contains("name=\"like_url\" value=\"https://x.test/\""));
        assert!(html.contains("name=\"like_title\" value=\"Say &quot;hi&quot;\""));
        assert!(html.contains("<h3>URL</h3>"));

        let token = html
            .split("name=\"like_data_nonce\" value=\"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap();
        assert!(nonces.verify(token, NONCE_ACTION).is_valid());
    }
}
