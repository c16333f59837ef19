//! Validation of submitted settings documents.
//!
//! Settings forms submit everything as strings. [`sanitize_options`] checks
//! the submitted document, normalizes the values the resolver expects as
//! typed (`expiry_time` as an integer, the permalink flag as a bool) and
//! returns the document ready to be persisted.
//!
//! On error nothing should be written: the caller keeps the previously
//! stored document.

use super::{ConfigDiagnostics, ConfigError, FieldPath, RawSettings};
use serde_json::{Value, json};

/// Validate and normalize a submitted options document.
///
/// Every problem found is reported at once through
/// [`ConfigError::Diagnostics`].
pub fn sanitize_options(options: &Value) -> Result<RawSettings, ConfigError> {
    let mut diag = ConfigDiagnostics::new();
    let mut options = options.clone();

    let Some(map) = options.as_object_mut() else {
        diag.error(FieldPath::new("options"), "settings must be an object");
        return Err(diag.into());
    };

    if let Some(url) = map.get("frontend_base_url").filter(|value| !value.is_null())
        && !is_http_url(url)
    {
        diag.error_with_hint(
            FieldPath::FRONTEND_BASE_URL,
            "Frontend Base URL must be a valid URL starting with http:// or https://.",
            "use an absolute URL like https://frontend.example.com",
        );
    }

    if let Some(expiry) = map
        .get_mut("preview_token")
        .and_then(|token| token.get_mut("expiry_time"))
        && !expiry.is_null()
    {
        match parse_expiry_time(expiry) {
            Some(secs) => *expiry = Value::from(secs),
            None => diag.error(
                FieldPath::EXPIRY_TIME,
                "Expiry Time must be a positive integer.",
            ),
        }
    }

    if let Some(mappings) = map.get("path_mappings").filter(|value| !value.is_null())
        && !is_path_mappings(mappings)
    {
        diag.error_with_hint(
            FieldPath::PATH_MAPPINGS,
            "Path mappings must map each content type to publish/preview templates.",
            "use {\"post\": {\"publish\": \"/post/%id%\", \"preview\": \"/post/preview/%id%\"}}",
        );
    }

    // Checkbox semantics: present means checked
    let disabled = map
        .get("advanced_settings")
        .and_then(|advanced| advanced.get("disable_permalink_rewrite"))
        .is_some_and(|value| !value.is_null());
    let advanced = map
        .entry("advanced_settings")
        .or_insert_with(|| json!({}));
    if !advanced.is_object() {
        *advanced = json!({});
    }
    advanced["disable_permalink_rewrite"] = Value::Bool(disabled);

    diag.into_result()?;
    Ok(RawSettings::from_json_value(options))
}

fn is_http_url(value: &Value) -> bool {
    let Some(raw) = value.as_str() else {
        return false;
    };
    if !raw.starts_with("http://") && !raw.starts_with("https://") {
        return false;
    }

    url::Url::parse(raw)
        .map(|url| url.host_str().is_some_and(|host| !host.is_empty()))
        .unwrap_or(false)
}

fn is_path_mappings(value: &Value) -> bool {
    let Some(entries) = value.as_object() else {
        return false;
    };

    entries.values().all(|mapping| match mapping {
        Value::Null => true,
        Value::Object(templates) => ["publish", "preview"].iter().all(|kind| {
            templates
                .get(*kind)
                .is_none_or(|template| template.is_null() || template.is_string())
        }),
        _ => false,
    })
}

/// Accept a number or numeric string whose integer part is positive.
fn parse_expiry_time(value: &Value) -> Option<u64> {
    if let Some(secs) = value.as_u64() {
        return (secs > 0).then_some(secs);
    }

    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !number.is_finite() {
        return None;
    }
    let truncated = number.trunc();
    (truncated >= 1.0).then_some(truncated as u64)
}
