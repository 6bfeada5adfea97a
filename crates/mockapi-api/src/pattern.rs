//! Path pattern classification.
//!
//! Each path segment is classified as `C` when it names an existing
//! collection and `I` otherwise. The concatenated classification selects
//! the dispatch branch.

use std::fmt;

/// A classified request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern<'a> {
    /// `C`: `/collection`
    Collection { collection: &'a str },
    /// `CI`: `/collection/id`
    Resource { collection: &'a str, id: &'a str },
    /// `CIC`: `/collection/id/related`
    ResourceRelated {
        collection: &'a str,
        id: &'a str,
        related: &'a str,
    },
    /// `CC`: `/collection/related`
    CollectionRelated { collection: &'a str, related: &'a str },
    /// Any other classification, including an empty path.
    Unsupported(String),
}

impl<'a> RoutePattern<'a> {
    /// Classifies `segments` using `is_collection` to recognise collections.
    pub fn classify<S, F>(segments: &'a [S], is_collection: F) -> Self
    where
        S: AsRef<str>,
        F: Fn(&str) -> bool,
    {
        let code: String = segments
            .iter()
            .map(|s| if is_collection(s.as_ref()) { 'C' } else { 'I' })
            .collect();
        let seg = move |i: usize| segments[i].as_ref();

        match code.as_str() {
            "C" => RoutePattern::Collection { collection: seg(0) },
            "CI" => RoutePattern::Resource {
                collection: seg(0),
                id: seg(1),
            },
            "CIC" => RoutePattern::ResourceRelated {
                collection: seg(0),
                id: seg(1),
                related: seg(2),
            },
            "CC" => RoutePattern::CollectionRelated {
                collection: seg(0),
                related: seg(1),
            },
            _ => RoutePattern::Unsupported(code),
        }
    }

    /// Returns the classification code, e.g. `CIC`.
    pub fn code(&self) -> &str {
        match self {
            RoutePattern::Collection { .. } => "C",
            RoutePattern::Resource { .. } => "CI",
            RoutePattern::ResourceRelated { .. } => "CIC",
            RoutePattern::CollectionRelated { .. } => "CC",
            RoutePattern::Unsupported(code) => code,
        }
    }
}

impl fmt::Display for RoutePattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
