//! Link rewriting from CMS URLs to frontend URLs.
//!
//! # Module Structure
//!
//! ```text
//! link/
//! ├── template.rs    # PathTemplate (placeholders), SplitPath
//! ├── url.rs         # build_publish_url / build_preview_url
//! └── mod.rs         # LinkRewriter (this file)
//! ```
//!
//! Missing configuration is never an error: when no template is mapped for
//! the item's content type, the CMS link is returned unchanged.

pub mod template;
pub mod url;

use crate::config::{LinkKind, Settings};
use crate::content::ContentItem;
use crate::token::TokenCodec;
use template::PathTemplate;

/// Rewrites publish and preview links for content items.
#[derive(Debug, Clone, Copy)]
pub struct LinkRewriter<'a> {
    settings: &'a Settings,
    codec: TokenCodec<'a>,
}

impl<'a> LinkRewriter<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            codec: TokenCodec::new(&settings.preview_token),
        }
    }

    /// Token codec bound to the same settings.
    pub fn codec(&self) -> &TokenCodec<'a> {
        &self.codec
    }

    /// Rewrite a permalink to the frontend public URL.
    ///
    /// Returns `original_link` when permalink rewriting is disabled or no
    /// publish template is mapped for the item's content type.
    pub fn rewrite_publish_link(&self, original_link: &str, item: &ContentItem) -> String {
        if self.settings.disable_permalink_rewrite {
            return original_link.to_string();
        }

        match self.template(item, LinkKind::Publish) {
            Some(template) => url::build_publish_url(self.settings, template, item),
            None => original_link.to_string(),
        }
    }

    /// Rewrite a preview link to the frontend preview URL with a token.
    ///
    /// Not affected by `disable_permalink_rewrite`.
    pub fn rewrite_preview_link(&self, original_link: &str, item: &ContentItem) -> String {
        let Some(template) = self.template(item, LinkKind::Preview) else {
            return original_link.to_string();
        };

        match url::build_preview_url(self.settings, template, item, &self.codec) {
            Ok(link) => link,
            Err(err) => {
                tracing::warn!(id = item.id, error = %err, "failed to issue preview token");
                original_link.to_string()
            }
        }
    }

    /// Correct the `link` field of a content API response.
    ///
    /// Drafts have no public permalink, so their `link` is replaced with the
    /// rewritten preview link. Other statuses keep `current_link`.
    pub fn fix_draft_link(
        &self,
        current_link: &str,
        preview_link: &str,
        item: &ContentItem,
    ) -> String {
        if item.status.is_draft() {
            self.rewrite_preview_link(preview_link, item)
        } else {
            current_link.to_string()
        }
    }

    fn template(&self, item: &ContentItem, kind: LinkKind) -> Option<PathTemplate<'a>> {
        let template = self.settings.path_mapping(&item.content_type, kind);
        if template.is_none() {
            tracing::debug!(
                content_type = %item.content_type,
                kind = kind.as_str(),
                "no path mapping, keeping original link"
            );
        }
        template.map(PathTemplate::new)
    }
}
