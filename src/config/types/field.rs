//! Type-safe config field path.

/// Dotted path of a settings field, used to point diagnostics at the
/// offending input.
///
/// ```ignore
/// diag.error(FieldPath::EXPIRY_TIME, "must be a positive integer");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    pub const FRONTEND_BASE_URL: Self = Self("frontend_base_url");
    pub const SECRET_KEY: Self = Self("preview_token.secret_key");
    pub const EXPIRY_TIME: Self = Self("preview_token.expiry_time");
    pub const PATH_MAPPINGS: Self = Self("path_mappings");

    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}
