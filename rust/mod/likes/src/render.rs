//! PresentationRenderer: the display fragment of a single like.

use std::sync::Arc;

use likes_content::{Record, RenderContext};

use crate::model::is_like;
use crate::resolver::UrlResolver;
use crate::sanitize::{esc_html, esc_url, host_of};

pub struct PresentationRenderer {
    resolver: Arc<UrlResolver>,
}

impl PresentationRenderer {
    pub fn new(resolver: Arc<UrlResolver>) -> Self {
        Self { resolver }
    }

    /// Hook entry point for `content/render`.
    pub fn handle(&self, content: String, ctx: &RenderContext) -> String {
        self.render(content, ctx.record.as_ref())
    }

    /// Replace `content` with the like fragment when `current` is a like.
    /// Anything else passes through unchanged.
    ///
    /// The title falls back to the URL; the host label is empty when the
    /// URL does not parse.
    pub fn render(&self, content: String, current: Option<&Record>) -> String {
        let Some(record) = current.filter(|r| is_like(r)) else {
            return content;
        };

        let url = self.resolver.resolve(record.id);
        let title = if record.fields.title.is_empty() {
            url.as_str()
        } else {
            record.fields.title.as_str()
        };
        let host = host_of(&url);

        format!(
            "<p>\n\t<span class=\"screen-reader-text\">Liked </span>\n\t\
             <a class=\"u-like-of\" href=\"{}\">{}</a>\n\t\
             <span class=\"like-of-domain\">{}</span>\n</p>",
            esc_url(&url),
            esc_html(title),
            esc_html(&host),
        )
    }
}
