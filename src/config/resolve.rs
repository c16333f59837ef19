//! Static-over-persisted settings resolution.
//!
//! Precedence is decided per field:
//!
//! | Field                        | Rule                                            |
//! |------------------------------|-------------------------------------------------|
//! | `frontend_base_url`          | static, else persisted, else `""`               |
//! | `preview_token.*`            | per key: static, else persisted, else default   |
//! | `path_mappings.<type>.<kind>`| per (type, kind): static, else persisted        |
//! | `disable_permalink_rewrite`  | static if defined (even `false`), else persisted, else `false` |

use super::{
    PathMapping, PreviewTokenSettings, RawPathMapping, RawPreviewToken, RawSettings, Settings,
};
use std::collections::BTreeMap;

/// Merge the two sources into effective settings. Never fails.
pub fn resolve(static_source: &RawSettings, persisted_source: &RawSettings) -> Settings {
    Settings {
        frontend_base_url: resolve_frontend_base_url(static_source, persisted_source),
        preview_token: resolve_preview_token(
            static_source.preview_token.as_ref(),
            persisted_source.preview_token.as_ref(),
        ),
        path_mappings: resolve_path_mappings(
            static_source.path_mappings.as_ref(),
            persisted_source.path_mappings.as_ref(),
        ),
        disable_permalink_rewrite: static_source
            .disable_permalink_rewrite()
            .or(persisted_source.disable_permalink_rewrite())
            .unwrap_or(false),
    }
}

fn resolve_frontend_base_url(static_source: &RawSettings, persisted: &RawSettings) -> String {
    static_source
        .frontend_base_url
        .as_ref()
        .or(persisted.frontend_base_url.as_ref())
        .cloned()
        .unwrap_or_default()
}

fn resolve_preview_token(
    static_token: Option<&RawPreviewToken>,
    persisted_token: Option<&RawPreviewToken>,
) -> PreviewTokenSettings {
    let defaults = PreviewTokenSettings::default();

    let secret_key = static_token
        .and_then(|token| token.secret_key.as_ref())
        .or_else(|| persisted_token.and_then(|token| token.secret_key.as_ref()))
        .cloned()
        .unwrap_or(defaults.secret_key);

    // A zero lifetime would mint tokens that are expired on arrival
    let positive = |token: &RawPreviewToken| token.expiry_time.filter(|&secs| secs > 0);
    let expiry_time = static_token
        .and_then(positive)
        .or_else(|| persisted_token.and_then(positive))
        .unwrap_or(defaults.expiry_time);

    PreviewTokenSettings {
        secret_key,
        expiry_time,
    }
}

fn resolve_path_mappings(
    static_mappings: Option<&BTreeMap<String, RawPathMapping>>,
    persisted_mappings: Option<&BTreeMap<String, RawPathMapping>>,
) -> BTreeMap<String, PathMapping> {
    let mut merged: BTreeMap<String, PathMapping> = BTreeMap::new();

    for (content_type, mapping) in persisted_mappings.into_iter().flatten() {
        merged.insert(content_type.clone(), PathMapping::from(mapping));
    }

    for (content_type, mapping) in static_mappings.into_iter().flatten() {
        let entry = merged.entry(content_type.clone()).or_default();
        if mapping.publish.is_some() {
            entry.publish = mapping.publish.clone();
        }
        if mapping.preview.is_some() {
            entry.preview = mapping.preview.clone();
        }
    }

    merged
}

impl From<&RawPathMapping> for PathMapping {
    fn from(raw: &RawPathMapping) -> Self {
        Self {
            publish: raw.publish.clone(),
            preview: raw.preview.clone(),
        }
    }
}
