//! Preview settings management.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── raw.rs         # RawSettings (one source document, all fields optional)
//! ├── resolve.rs     # Static-over-persisted merge into Settings
//! ├── source.rs      # ConfigSource trait, file and in-memory sources
//! ├── validate.rs    # Options validation for submitted documents
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # SettingsHandle (cached settings with reload)
//! └── mod.rs         # Settings (this file)
//! ```
//!
//! # Sources
//!
//! | Source      | Format | Precedence                                   |
//! |-------------|--------|----------------------------------------------|
//! | static      | TOML   | Deploy-time, wins per field                  |
//! | persisted   | JSON   | Runtime options store, fills what static omits |

mod raw;
mod resolve;
mod source;
pub mod types;
mod validate;

pub use raw::{RawAdvancedSettings, RawPathMapping, RawPreviewToken, RawSettings};
pub use resolve::resolve;
pub use source::{ConfigSource, FileSource, MemorySource};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath, SettingsHandle};
pub use validate::sanitize_options;

use serde::Serialize;
use std::collections::BTreeMap;

/// Secret used when neither source configures one.
pub const DEFAULT_SECRET_KEY: &str = "THIS_IS_A_DEFAULT_SECRET_KEY";

/// Token lifetime used when neither source configures one (1 week).
pub const DEFAULT_EXPIRY_TIME: u64 = 60 * 60 * 24 * 7;

// ============================================================================
// effective settings
// ============================================================================

/// Effective settings after merging the static and persisted sources.
///
/// Immutable once built; rebuild through [`resolve`] or
/// [`SettingsHandle::reload`] when a source changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Frontend origin prepended to every rewritten path (may be empty).
    pub frontend_base_url: String,
    pub preview_token: PreviewTokenSettings,
    /// Content-type key -> templates.
    pub path_mappings: BTreeMap<String, PathMapping>,
    pub disable_permalink_rewrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frontend_base_url: String::new(),
            preview_token: PreviewTokenSettings::default(),
            path_mappings: BTreeMap::new(),
            disable_permalink_rewrite: false,
        }
    }
}

impl Settings {
    /// Look up the path template for a content type and link kind.
    ///
    /// Returns `None` when nothing is configured for the pair.
    pub fn path_mapping(&self, content_type: &str, kind: LinkKind) -> Option<&str> {
        self.path_mappings.get(content_type)?.get(kind)
    }
}

/// Preview token signing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewTokenSettings {
    /// HS256 symmetric key.
    pub secret_key: String,
    /// Token lifetime in seconds, always positive.
    pub expiry_time: u64,
}

impl Default for PreviewTokenSettings {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            expiry_time: DEFAULT_EXPIRY_TIME,
        }
    }
}

/// Frontend path templates for one content type.
///
/// Templates may contain `%id%` and `%slug%` placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathMapping {
    pub publish: Option<String>,
    pub preview: Option<String>,
}

impl PathMapping {
    pub fn get(&self, kind: LinkKind) -> Option<&str> {
        match kind {
            LinkKind::Publish => self.publish.as_deref(),
            LinkKind::Preview => self.preview.as_deref(),
        }
    }
}

// ============================================================================
// link kind
// ============================================================================

/// Which link is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Public permalink.
    Publish,
    /// Preview link for unpublished content.
    Preview,
}

impl LinkKind {
    /// Parse a kind name, falling back to `Publish` for anything that is not
    /// exactly `"publish"` or `"preview"`.
    pub fn parse(name: &str) -> Self {
        match name {
            "preview" => Self::Preview,
            _ => Self::Publish,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Publish => "publish",
            Self::Preview => "preview",
        }
    }
}

// ============================================================================
// tests
// ============================================================================

/// Resolve settings from a static TOML snippet with an empty persisted source.
#[cfg(test)]
pub fn test_settings(static_toml: &str) -> Settings {
    let raw = RawSettings::from_toml_str(static_toml).unwrap();
    resolve(&raw, &RawSettings::default())
}
