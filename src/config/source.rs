//! Settings sources.
//!
//! A [`ConfigSource`] supplies the two raw documents that
//! [`resolve`](super::resolve) merges:
//!
//! - **static**: deploy-time settings, fixed for the lifetime of a release
//! - **persisted**: runtime settings written by an admin screen
//!
//! A source with nothing to say returns an empty [`RawSettings`].

use super::{ConfigError, RawSettings};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Provider of the static and persisted settings documents.
pub trait ConfigSource {
    /// Deploy-time settings. Values here take precedence.
    fn static_settings(&self) -> Result<RawSettings, ConfigError>;

    /// Runtime settings from the options store.
    fn persisted_settings(&self) -> Result<RawSettings, ConfigError>;
}

// ============================================================================
// file source
// ============================================================================

/// Static settings from a TOML file, persisted settings from a JSON file.
///
/// Missing or blank files count as empty documents.
#[derive(Debug, Clone)]
pub struct FileSource {
    static_path: PathBuf,
    persisted_path: PathBuf,
}

impl FileSource {
    pub fn new(static_path: impl Into<PathBuf>, persisted_path: impl Into<PathBuf>) -> Self {
        Self {
            static_path: static_path.into(),
            persisted_path: persisted_path.into(),
        }
    }

    pub fn static_path(&self) -> &Path {
        &self.static_path
    }

    pub fn persisted_path(&self) -> &Path {
        &self.persisted_path
    }
}

impl ConfigSource for FileSource {
    fn static_settings(&self) -> Result<RawSettings, ConfigError> {
        match read_optional(&self.static_path)? {
            Some(content) => RawSettings::from_toml_str(&content),
            None => Ok(RawSettings::default()),
        }
    }

    fn persisted_settings(&self) -> Result<RawSettings, ConfigError> {
        match read_optional(&self.persisted_path)? {
            Some(content) => RawSettings::from_json_str(&content),
            None => Ok(RawSettings::default()),
        }
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(
                path = %path.display(),
                "settings file not found, using empty document"
            );
            Ok(None)
        }
        Err(err) => Err(ConfigError::Io(path.to_path_buf(), err)),
    }
}

// ============================================================================
// memory source
// ============================================================================

/// Source backed by documents held in memory.
///
/// Useful for embedding hosts that already hold the documents, and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub static_settings: RawSettings,
    pub persisted_settings: RawSettings,
}

impl MemorySource {
    pub fn new(static_settings: RawSettings, persisted_settings: RawSettings) -> Self {
        Self {
            static_settings,
            persisted_settings,
        }
    }
}

impl ConfigSource for MemorySource {
    fn static_settings(&self) -> Result<RawSettings, ConfigError> {
        Ok(self.static_settings.clone())
    }

    fn persisted_settings(&self) -> Result<RawSettings, ConfigError> {
        Ok(self.persisted_settings.clone())
    }
}
