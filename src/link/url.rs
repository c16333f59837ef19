//! Frontend URL building.

use super::template::{PathTemplate, SplitPath};
use crate::config::Settings;
use crate::content::ContentItem;
use crate::token::{TokenCodec, TokenError};

/// Public URL: base URL followed by the substituted template, verbatim.
pub fn build_publish_url(
    settings: &Settings,
    template: PathTemplate<'_>,
    item: &ContentItem,
) -> String {
    format!("{}{}", settings.frontend_base_url, template.substitute(item))
}

/// Preview URL carrying a freshly issued preview token.
///
/// ```text
/// "/news/preview/%slug%"     -> <base>/news/preview/my-slug?preview=true&preview_token=<jwt>
/// "news/%id%?lang=ja"        -> <base>/news/12?lang=ja&preview=true&preview_token=<jwt>
/// ```
pub fn build_preview_url(
    settings: &Settings,
    template: PathTemplate<'_>,
    item: &ContentItem,
    codec: &TokenCodec<'_>,
) -> Result<String, TokenError> {
    // 1. Subject kind comes from the raw template, before substitution
    let kind = template.subject_kind();

    // 2. Token
    let token = codec.generate_token(item, kind)?;

    // 3. Substitute, then split off the query
    let substituted = template.substitute(item);
    let split = SplitPath::parse(&substituted);

    // 4. Exactly one leading slash
    let path = split.normalized_path();

    // 5. Append preview parameters to any existing query
    let query = match split.query {
        Some(existing) => format!("?{existing}&preview=true&preview_token={token}"),
        None => format!("?preview=true&preview_token={token}"),
    };

    Ok(format!("{}{path}{query}", settings.frontend_base_url))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_settings;
    use crate::token::TokenSubject;

    const BASE: &str = "https://frontend.example.com";

    fn settings() -> Settings {
        test_settings(
            r#"
            frontend_base_url = "https://frontend.example.com"

            [preview_token]
            secret_key = "test-secret-key-for-unit-tests-!!"
            expiry_time = 3600
            "#,
        )
    }

    /// Split a preview URL into (url before token, token).
    fn split_token(url: &str) -> (&str, &str) {
        url.split_once("preview_token=").unwrap()
    }

    #[test]
    fn test_publish_url() {
        let settings = settings();
        let item = ContentItem::new(123, "my-slug", "post");
        assert_eq!(
            build_publish_url(&settings, PathTemplate::new("/post/%id%"), &item),
            format!("{BASE}/post/123")
        );
    }

    #[test]
    fn test_publish_url_is_verbatim() {
        let settings = settings();
        let item = ContentItem::new(5, "five", "post");

        // No slash normalization for publish links
        assert_eq!(
            build_publish_url(&settings, PathTemplate::new("post/%slug%"), &item),
            format!("{BASE}post/five")
        );
        assert_eq!(
            build_publish_url(&settings, PathTemplate::new("//p/%id%?x=1#top"), &item),
            format!("{BASE}//p/5?x=1#top")
        );
    }

    #[test]
    fn test_publish_url_empty_base() {
        let settings = test_settings("");
        let item = ContentItem::new(5, "", "post");
        assert_eq!(
            build_publish_url(&settings, PathTemplate::new("/p/%slug%"), &item),
            "/p/5"
        );
    }

    #[test]
    fn test_preview_url_slug() {
        let settings = settings();
        let codec = TokenCodec::new(&settings.preview_token);
        let item = ContentItem::new(456, "my-news-slug", "news");

        let template = PathTemplate::new("/news/preview/%slug%");
        let url = build_preview_url(&settings, template, &item, &codec).unwrap();
        let (prefix, token) = split_token(&url);

        assert_eq!(prefix, format!("{BASE}/news/preview/my-news-slug?preview=true&"));
        assert_eq!(
            codec.decode_claims(token).unwrap().sub,
            TokenSubject::Slug("my-news-slug".into())
        );
    }

    #[test]
    fn test_preview_url_slug_template_without_slug() {
        let settings = settings();
        let codec = TokenCodec::new(&settings.preview_token);
        let item = ContentItem::new(789, "", "news");

        let template = PathTemplate::new("/news/preview/%slug%");
        let url = build_preview_url(&settings, template, &item, &codec).unwrap();
        let (prefix, token) = split_token(&url);

        assert_eq!(prefix, format!("{BASE}/news/preview/789?preview=true&"));
        assert_eq!(codec.decode_claims(token).unwrap().sub, TokenSubject::Id(789));
    }

    #[test]
    fn test_preview_url_id() {
        let settings = settings();
        let codec = TokenCodec::new(&settings.preview_token);
        let item = ContentItem::new(123, "my-slug", "post");

        let template = PathTemplate::new("/post/preview/%id%");
        let url = build_preview_url(&settings, template, &item, &codec).unwrap();
        let (prefix, token) = split_token(&url);

        assert_eq!(prefix, format!("{BASE}/post/preview/123?preview=true&"));
        assert_eq!(codec.decode_claims(token).unwrap().sub, TokenSubject::Id(123));
    }

    #[test]
    fn test_preview_url_keeps_template_query() {
        let settings = settings();
        let codec = TokenCodec::new(&settings.preview_token);
        let item = ContentItem::new(12, "", "post");

        let template = PathTemplate::new("post?id=%id%&lang=ja");
        let url = build_preview_url(&settings, template, &item, &codec).unwrap();
        let (prefix, _) = split_token(&url);

        assert_eq!(prefix, format!("{BASE}/post?id=12&lang=ja&preview=true&"));
    }

    #[test]
    fn test_preview_url_normalizes_leading_slashes() {
        let settings = settings();
        let codec = TokenCodec::new(&settings.preview_token);
        let item = ContentItem::new(3, "three", "post");

        for template in ["p/%slug%", "/p/%slug%", "///p/%slug%"] {
            let template = PathTemplate::new(template);
            let url = build_preview_url(&settings, template, &item, &codec).unwrap();
            let (prefix, _) = split_token(&url);
            assert_eq!(prefix, format!("{BASE}/p/three?preview=true&"), "failed for {template:?}");
        }
    }

    #[test]
    fn test_preview_url_drops_fragment() {
        let settings = settings();
        let codec = TokenCodec::new(&settings.preview_token);
        let item = ContentItem::new(3, "", "post");

        let template = PathTemplate::new("/p/%id%#comments");
        let url = build_preview_url(&settings, template, &item, &codec).unwrap();
        let (prefix, token) = split_token(&url);

        assert_eq!(prefix, format!("{BASE}/p/3?preview=true&"));
        assert!(codec.verify_token(token));
    }
}
