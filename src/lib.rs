//! wack-preview - frontend link rewriting and preview tokens for a headless CMS.
//!
//! # Module Structure
//!
//! ```text
//! src/
//! ├── config/        # Settings, sources, resolution, validation
//! ├── content        # ContentItem, content-type enumeration
//! ├── link/          # LinkRewriter, path templates, URL building
//! └── token          # Preview token issue / verify (HS256)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let handle = SettingsHandle::load(FileSource::new("wack-preview.toml", "options.json"))?;
//! let settings = handle.current();
//!
//! let item = ContentItem::new(12, "hello-world", "post");
//! let rewriter = LinkRewriter::new(&settings);
//! let url = rewriter.rewrite_preview_link("https://cms.example.com/?p=12&preview=true", &item);
//!
//! // The frontend hands the token back when it requests the draft
//! let (_, token) = url.split_once("preview_token=").unwrap();
//! assert!(verify_preview_token(&settings, token));
//! ```

pub mod config;
pub mod content;
pub mod link;
pub mod token;

pub use config::{
    ConfigDiagnostics, ConfigError, ConfigSource, FileSource, LinkKind, MemorySource,
    PathMapping, PreviewTokenSettings, RawSettings, Settings, SettingsHandle, resolve,
    sanitize_options,
};
pub use content::{ContentItem, ContentType, PostStatus, rewritable_content_types};
pub use link::LinkRewriter;
pub use token::{PreviewClaims, SubjectKind, TokenCodec, TokenSubject};

/// Check whether `token` grants preview access under `settings`.
///
/// Entry point for host application or theme code gating preview requests.
pub fn verify_preview_token(settings: &Settings, token: &str) -> bool {
    TokenCodec::new(&settings.preview_token).verify_token(token)
}
