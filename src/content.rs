//! Content items handed in by the host CMS.

/// A post, page or custom-type entry whose links are being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: u64,
    /// URL slug, empty for entries that have never been given one.
    pub slug: String,
    /// Content-type key (e.g. `post`, `news`).
    pub content_type: String,
    pub status: PostStatus,
}

impl ContentItem {
    pub fn new(id: u64, slug: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            id,
            slug: slug.into(),
            content_type: content_type.into(),
            status: PostStatus::Publish,
        }
    }

    pub fn with_status(mut self, status: PostStatus) -> Self {
        self.status = status;
        self
    }

    /// Slug, or the decimal id when the slug is empty.
    pub fn slug_or_id(&self) -> String {
        if self.slug.is_empty() {
            self.id.to_string()
        } else {
            self.slug.clone()
        }
    }
}

/// Publication status of a content item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PostStatus {
    Draft,
    #[default]
    Publish,
    /// Any other CMS status (`pending`, `future`, `private`, ...).
    Other(String),
}

impl PostStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "draft" => Self::Draft,
            "publish" => Self::Publish,
            other => Self::Other(other.to_string()),
        }
    }

    #[inline]
    pub fn is_draft(&self) -> bool {
        matches!(self, Self::Draft)
    }
}

// ============================================================================
// content types
// ============================================================================

/// Built-in content types that never get a path mapping.
pub const EXCLUDED_CONTENT_TYPES: &[&str] = &[
    "page",
    "attachment",
    "revision",
    "nav_menu_item",
    "wp_template",
    "wp_template_part",
];

/// A registered content type as reported by the CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub name: String,
    pub label: String,
    pub public: bool,
}

impl ContentType {
    pub fn new(name: impl Into<String>, label: impl Into<String>, public: bool) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            public,
        }
    }
}

/// Content types that can carry path mappings: public and not built-in.
///
/// `post` is kept. Order of the input is preserved.
pub fn rewritable_content_types(types: impl IntoIterator<Item = ContentType>) -> Vec<ContentType> {
    types
        .into_iter()
        .filter(|ty| ty.public && !EXCLUDED_CONTENT_TYPES.contains(&ty.name.as_str()))
        .collect()
}
