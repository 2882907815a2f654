//! Cache namespaces.

use std::fmt;

/// Independent partition of the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Single recipes keyed by id
    Items,
    /// Recipe list pages keyed by page, limit and filters
    Lists,
    /// One unkeyed value (the category list)
    Singleton,
}

impl Namespace {
    pub const ALL: [Namespace; 3] = [Namespace::Items, Namespace::Lists, Namespace::Singleton];

    /// Maps a caller key onto the stored key. Every singleton key shares one slot.
    pub(crate) fn normalize_key(self, key: &str) -> &str {
        match self {
            Namespace::Singleton => "",
            _ => key,
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Namespace::Items => "items",
            Namespace::Lists => "lists",
            Namespace::Singleton => "singleton",
        };
        f.write_str(name)
    }
}
