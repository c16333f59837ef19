//! Raw settings documents as read from a single source.
//!
//! Every field is optional: an absent field means "this source has no
//! opinion" and lets the other source (or the built-in default) apply.
//!
//! ```toml
//! frontend_base_url = "https://frontend.example.com"
//!
//! [preview_token]
//! secret_key = "change-me"
//! expiry_time = 3600
//!
//! [path_mappings.post]
//! publish = "/post/%id%"
//! preview = "/post/preview/%id%"
//!
//! [advanced_settings]
//! disable_permalink_rewrite = false
//! ```
//!
//! Only syntax errors fail a document. A field with the wrong type, a
//! section that is not a table, or a `null` mapping is dropped with a
//! warning and the rest of the document still applies.

use super::ConfigError;
use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One settings document (static TOML or persisted JSON).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontend_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_token: Option<RawPreviewToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_mappings: Option<BTreeMap<String, RawPathMapping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_settings: Option<RawAdvancedSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPreviewToken {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(deserialize_with = "lenient_expiry", skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPathMapping {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub publish: Option<String>,
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAdvancedSettings {
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub disable_permalink_rewrite: Option<bool>,
}

/// Top-level keys. Sections stay untyped here and are read one by one.
#[derive(Default, Deserialize)]
#[serde(default)]
struct Document {
    #[serde(deserialize_with = "lenient")]
    frontend_base_url: Option<String>,
    preview_token: Option<Value>,
    path_mappings: Option<Value>,
    advanced_settings: Option<Value>,
}

impl RawSettings {
    /// Parse a TOML document. Blank input yields an empty document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let (settings, ignored) = Self::parse_toml_with_ignored(content)?;
        warn_unknown_fields("toml", &ignored);
        Ok(settings)
    }

    /// Parse a JSON document. Blank input yields an empty document.
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let (settings, ignored) = Self::parse_json_with_ignored(content)?;
        warn_unknown_fields("json", &ignored);
        Ok(settings)
    }

    /// Read an already parsed JSON document.
    pub fn from_json_value(value: Value) -> Self {
        let (settings, ignored) = Self::read_with_ignored(value);
        warn_unknown_fields("json", &ignored);
        settings
    }

    /// Parse TOML content, collecting any unknown fields.
    pub fn parse_toml_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        if content.trim().is_empty() {
            return Ok((Self::default(), Vec::new()));
        }

        let value: Value = toml::from_str(content)?;
        Ok(Self::read_with_ignored(value))
    }

    /// Parse JSON content, collecting any unknown fields.
    pub fn parse_json_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        if content.trim().is_empty() {
            return Ok((Self::default(), Vec::new()));
        }

        let value: Value = serde_json::from_str(content)?;
        Ok(Self::read_with_ignored(value))
    }

    fn read_with_ignored(value: Value) -> (Self, Vec<String>) {
        let mut ignored = Vec::new();
        let Some(document) = read_table::<Document>("", value, &mut ignored) else {
            return (Self::default(), ignored);
        };

        let settings = Self {
            frontend_base_url: document.frontend_base_url,
            preview_token: document
                .preview_token
                .and_then(|value| read_table("preview_token", value, &mut ignored)),
            path_mappings: document
                .path_mappings
                .and_then(|value| read_path_mappings(value, &mut ignored)),
            advanced_settings: document
                .advanced_settings
                .and_then(|value| read_table("advanced_settings", value, &mut ignored)),
        };
        (settings, ignored)
    }

    /// Whether this document has an explicit opinion on permalink rewriting.
    pub fn disable_permalink_rewrite(&self) -> Option<bool> {
        self.advanced_settings
            .as_ref()
            .and_then(|advanced| advanced.disable_permalink_rewrite)
    }
}

// ============================================================================
// Lenient readers
// ============================================================================

/// Deserialize one table, recording unknown keys as `prefix.key`.
///
/// `null` is an absent table; any other non-table value is dropped.
fn read_table<T: DeserializeOwned>(
    prefix: &str,
    value: Value,
    ignored: &mut Vec<String>,
) -> Option<T> {
    if !value.is_object() {
        if !value.is_null() {
            tracing::warn!(
                section = display_section(prefix),
                found = value_kind(&value),
                "expected a table, ignoring settings section"
            );
        }
        return None;
    }

    let result = serde_ignored::deserialize(value, |path| {
        let path = path.to_string();
        ignored.push(if prefix.is_empty() {
            path
        } else {
            format!("{prefix}.{path}")
        });
    });
    match result {
        Ok(table) => Some(table),
        Err(err) => {
            tracing::warn!(
                section = display_section(prefix),
                %err,
                "ignoring malformed settings section"
            );
            None
        }
    }
}

fn read_path_mappings(
    value: Value,
    ignored: &mut Vec<String>,
) -> Option<BTreeMap<String, RawPathMapping>> {
    let entries = match value {
        Value::Object(entries) => entries,
        Value::Null => return None,
        other => {
            tracing::warn!(
                section = "path_mappings",
                found = value_kind(&other),
                "expected a table, ignoring settings section"
            );
            return None;
        }
    };

    let mappings = entries
        .into_iter()
        .filter_map(|(content_type, mapping)| {
            let prefix = format!("path_mappings.{content_type}");
            read_table(&prefix, mapping, ignored).map(|mapping| (content_type, mapping))
        })
        .collect();
    Some(mappings)
}

/// Wrong-typed values become `None` instead of failing the document.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }

    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            tracing::warn!(%err, "ignoring wrong-typed settings field");
            Ok(None)
        }
    }
}

/// Seconds as an integer or a numeric string.
fn lenient_expiry<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let expiry = match &value {
        Value::Null => return Ok(None),
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };

    if expiry.is_none() {
        tracing::warn!(found = value_kind(&value), "ignoring invalid preview_token.expiry_time");
    }
    Ok(expiry)
}

fn display_section(prefix: &str) -> &str {
    if prefix.is_empty() { "<root>" } else { prefix }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "table",
    }
}

fn warn_unknown_fields(format: &str, fields: &[String]) {
    if !fields.is_empty() {
        tracing::warn!(source = format, ?fields, "ignoring unknown settings fields");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_documents() {
        assert_eq!(RawSettings::from_toml_str("").unwrap(), RawSettings::default());
        assert_eq!(RawSettings::from_json_str("  \n").unwrap(), RawSettings::default());
    }

    #[test]
    fn test_parse_toml() {
        let raw = RawSettings::from_toml_str(
            r#"
            frontend_base_url = "https://frontend.example.com"

            [preview_token]
            expiry_time = 3600

            [path_mappings.news]
            publish = "/news/%slug%"

            [advanced_settings]
            disable_permalink_rewrite = false
            "#,
        )
        .unwrap();

        assert_eq!(raw.frontend_base_url.as_deref(), Some("https://frontend.example.com"));
        let token = raw.preview_token.as_ref().unwrap();
        assert_eq!(token.secret_key, None);
        assert_eq!(token.expiry_time, Some(3600));
        let news = &raw.path_mappings.as_ref().unwrap()["news"];
        assert_eq!(news.publish.as_deref(), Some("/news/%slug%"));
        assert_eq!(news.preview, None);
        assert_eq!(raw.disable_permalink_rewrite(), Some(false));
    }

    #[test]
    fn test_parse_json() {
        let raw = RawSettings::from_json_str(
            r#"{
                "frontend_base_url": "https://b.example.com",
                "preview_token": {"secret_key": "db-secret"},
                "path_mappings": {"post": {"publish": "/d/%id%", "preview": null}},
                "advanced_settings": {"disable_permalink_rewrite": true}
            }"#,
        )
        .unwrap();

        assert_eq!(raw.frontend_base_url.as_deref(), Some("https://b.example.com"));
        assert_eq!(
            raw.preview_token.as_ref().unwrap().secret_key.as_deref(),
            Some("db-secret")
        );
        let post = &raw.path_mappings.as_ref().unwrap()["post"];
        assert_eq!(post.publish.as_deref(), Some("/d/%id%"));
        assert_eq!(post.preview, None);
        assert_eq!(raw.disable_permalink_rewrite(), Some(true));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let (raw, ignored) = RawSettings::parse_toml_with_ignored(
            "frontend_base_url = \"https://a\"\nfrontend_url = \"typo\"\n[preview_token]\nttl = 5",
        )
        .unwrap();

        assert_eq!(raw.frontend_base_url.as_deref(), Some("https://a"));
        assert_eq!(ignored.len(), 2);
        assert!(ignored.iter().any(|field| field == "frontend_url"));
        assert!(ignored.iter().any(|field| field == "preview_token.ttl"));
    }

    #[test]
    fn test_unknown_mapping_fields_use_full_path() {
        let (raw, ignored) = RawSettings::parse_json_with_ignored(
            r#"{"path_mappings": {"post": {"publish": "/p/%id%", "draft": "/d"}}}"#,
        )
        .unwrap();

        assert_eq!(raw.path_mappings.unwrap()["post"].publish.as_deref(), Some("/p/%id%"));
        assert_eq!(ignored, vec!["path_mappings.post.draft".to_string()]);
    }

    #[test]
    fn test_wrong_typed_fields_are_dropped() {
        let raw = RawSettings::from_json_str(
            r#"{
                "frontend_base_url": "https://b.example.com",
                "preview_token": {"secret_key": 42, "expiry_time": "3600"},
                "path_mappings": {"post": null, "news": {"publish": "/n/%slug%", "preview": 7}}
            }"#,
        )
        .unwrap();

        assert_eq!(raw.frontend_base_url.as_deref(), Some("https://b.example.com"));
        let token = raw.preview_token.as_ref().unwrap();
        assert_eq!(token.secret_key, None);
        assert_eq!(token.expiry_time, Some(3600));

        let mappings = raw.path_mappings.as_ref().unwrap();
        assert!(!mappings.contains_key("post"));
        assert_eq!(mappings["news"].publish.as_deref(), Some("/n/%slug%"));
        assert_eq!(mappings["news"].preview, None);
    }

    #[test]
    fn test_wrong_typed_toml_values() {
        let raw = RawSettings::from_toml_str(
            "frontend_base_url = 42\n[preview_token]\nsecret_key = \"s\"\nexpiry_time = -1",
        )
        .unwrap();

        assert_eq!(raw.frontend_base_url, None);
        let token = raw.preview_token.unwrap();
        assert_eq!(token.secret_key.as_deref(), Some("s"));
        assert_eq!(token.expiry_time, None);
    }

    #[test]
    fn test_non_table_sections_are_dropped() {
        let raw = RawSettings::from_json_str(
            r#"{
                "frontend_base_url": "https://a.example.com",
                "preview_token": "secret",
                "path_mappings": [1, 2],
                "advanced_settings": {"disable_permalink_rewrite": "yes"}
            }"#,
        )
        .unwrap();

        assert_eq!(raw.frontend_base_url.as_deref(), Some("https://a.example.com"));
        assert_eq!(raw.preview_token, None);
        assert_eq!(raw.path_mappings, None);
        assert_eq!(raw.disable_permalink_rewrite(), None);

        assert_eq!(RawSettings::from_json_str("[1, 2]").unwrap(), RawSettings::default());
    }

    #[test]
    fn test_syntax_errors_still_fail() {
        assert!(matches!(
            RawSettings::from_toml_str("frontend_base_url = "),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            RawSettings::from_json_str("{} trailing"),
            Err(ConfigError::Json(_))
        ));
    }
}
