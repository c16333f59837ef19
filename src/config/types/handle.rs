//! Cached settings with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic settings replacement, so a
//! long-running host can resolve once and rebuild when the persisted source
//! changes. The handle is an ordinary value: construct it where the host
//! boots and pass it (or the `Arc<Settings>` it hands out) down explicitly.

use crate::config::{ConfigError, ConfigSource, Settings, resolve};
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Owner of a settings source and the settings last resolved from it.
pub struct SettingsHandle<S> {
    source: S,
    current: ArcSwap<Settings>,
}

impl<S: ConfigSource> SettingsHandle<S> {
    /// Resolve settings from `source` and cache the result.
    pub fn load(source: S) -> Result<Self, ConfigError> {
        let settings = Self::resolve_from(&source)?;
        Ok(Self {
            source,
            current: ArcSwap::from_pointee(settings),
        })
    }

    /// Snapshot of the current settings.
    #[inline]
    pub fn current(&self) -> Arc<Settings> {
        self.current.load_full()
    }

    /// Re-resolve from the source.
    ///
    /// Returns `Ok(true)` if the effective settings changed, `Ok(false)` if
    /// unchanged. On error the previous settings stay in place.
    pub fn reload(&self) -> Result<bool, ConfigError> {
        let settings = Self::resolve_from(&self.source)?;
        if **self.current.load() == settings {
            return Ok(false);
        }

        self.current.store(Arc::new(settings));
        tracing::info!("preview settings reloaded");
        Ok(true)
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn resolve_from(source: &S) -> Result<Settings, ConfigError> {
        let static_settings = source.static_settings()?;
        let persisted_settings = source.persisted_settings()?;
        Ok(resolve(&static_settings, &persisted_settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FileSource, MemorySource, RawSettings};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_resolves_memory_source() {
        let source = MemorySource::new(
            RawSettings::from_toml_str("frontend_base_url = \"https://A\"").unwrap(),
            RawSettings::from_json_str(r#"{"preview_token": {"secret_key": "db"}}"#).unwrap(),
        );

        let handle = SettingsHandle::load(source).unwrap();
        let settings = handle.current();
        assert_eq!(settings.frontend_base_url, "https://A");
        assert_eq!(settings.preview_token.secret_key, "db");
    }

    #[test]
    fn test_reload_picks_up_persisted_changes() {
        let dir = TempDir::new().unwrap();
        let persisted = dir.path().join("options.json");
        fs::write(&persisted, r#"{"frontend_base_url": "https://old"}"#).unwrap();

        let handle =
            SettingsHandle::load(FileSource::new(dir.path().join("static.toml"), &persisted))
                .unwrap();
        let before = handle.current();
        assert_eq!(before.frontend_base_url, "https://old");

        // Unchanged source
        assert!(!handle.reload().unwrap());

        fs::write(&persisted, r#"{"frontend_base_url": "https://new"}"#).unwrap();
        assert!(handle.reload().unwrap());
        assert_eq!(handle.current().frontend_base_url, "https://new");

        // Earlier snapshots are not mutated
        assert_eq!(before.frontend_base_url, "https://old");
    }

    #[test]
    fn test_failed_reload_keeps_previous_settings() {
        let dir = TempDir::new().unwrap();
        let persisted = dir.path().join("options.json");
        fs::write(&persisted, r#"{"frontend_base_url": "https://ok"}"#).unwrap();

        let handle =
            SettingsHandle::load(FileSource::new(dir.path().join("static.toml"), &persisted))
                .unwrap();

        fs::write(&persisted, "{broken").unwrap();
        assert!(handle.reload().is_err());
        assert_eq!(handle.current().frontend_base_url, "https://ok");
    }

    #[test]
    fn test_load_survives_wrong_typed_persisted_fields() {
        let dir = TempDir::new().unwrap();
        let persisted = dir.path().join("options.json");
        fs::write(
            &persisted,
            r#"{
                "frontend_base_url": "https://B",
                "preview_token": {"secret_key": "db", "expiry_time": "3600"},
                "path_mappings": {"post": null, "news": {"publish": "/news/%slug%"}}
            }"#,
        )
        .unwrap();

        let handle =
            SettingsHandle::load(FileSource::new(dir.path().join("static.toml"), &persisted))
                .unwrap();
        let settings = handle.current();
        assert_eq!(settings.frontend_base_url, "https://B");
        assert_eq!(settings.preview_token.secret_key, "db");
        assert_eq!(settings.preview_token.expiry_time, 3600);
        assert!(!settings.path_mappings.contains_key("post"));
        assert_eq!(settings.path_mappings["news"].publish.as_deref(), Some("/news/%slug%"));
    }
}
