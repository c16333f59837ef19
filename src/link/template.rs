//! Frontend path templates.
//!
//! A template is a path (optionally with a query string) containing
//! placeholders that are replaced textually:
//!
//! | Placeholder | Replacement                                   |
//! |-------------|-----------------------------------------------|
//! | `%id%`      | decimal item id                               |
//! | `%slug%`    | item slug, or the decimal id when slug is empty |
//!
//! # Example
//!
//! ```text
//! "/news/%slug%?ref=cms"  + {id: 456, slug: "my-news"} -> "/news/my-news?ref=cms"
//! "/news/%slug%"          + {id: 789, slug: ""}        -> "/news/789"
//! ```

use crate::content::ContentItem;
use crate::token::SubjectKind;

pub const ID_PLACEHOLDER: &str = "%id%";
pub const SLUG_PLACEHOLDER: &str = "%slug%";

/// A configured path template (borrowed from settings).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTemplate<'a>(&'a str);

impl<'a> PathTemplate<'a> {
    #[inline]
    pub const fn new(template: &'a str) -> Self {
        Self(template)
    }

    #[inline]
    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    /// Token subject kind implied by the template itself.
    ///
    /// Decided on the raw template, not on the substituted path: a template
    /// asking for `%slug%` yields `Slug` even if the item has no slug.
    pub fn subject_kind(&self) -> SubjectKind {
        if self.0.contains(SLUG_PLACEHOLDER) {
            SubjectKind::Slug
        } else {
            SubjectKind::Id
        }
    }

    /// Replace every placeholder occurrence with the item's values.
    pub fn substitute(&self, item: &ContentItem) -> String {
        let id = item.id.to_string();
        self.0
            .replace(ID_PLACEHOLDER, &id)
            .replace(SLUG_PLACEHOLDER, &item.slug_or_id())
    }
}

/// Path and query parts of a substituted template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPath<'a> {
    pub path: &'a str,
    /// `Some` whenever the template contained `?`, even with nothing after it.
    pub query: Option<&'a str>,
}

impl<'a> SplitPath<'a> {
    /// Split off the query; a `#fragment` is discarded.
    pub fn parse(raw: &'a str) -> Self {
        let without_fragment = raw.split_once('#').map_or(raw, |(before, _)| before);
        match without_fragment.split_once('?') {
            Some((path, query)) => Self {
                path,
                query: Some(query),
            },
            None => Self {
                path: without_fragment,
                query: None,
            },
        }
    }

    /// Path with exactly one leading `/`.
    pub fn normalized_path(&self) -> String {
        format!("/{}", self.path.trim_start_matches('/'))
    }
}
