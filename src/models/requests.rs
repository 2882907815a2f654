//! Request parameters for the recipe list endpoint
//!
//! Defines how a list query is expressed, serialized into a query string and
//! keyed in the cache.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Page used when none is given
pub const DEFAULT_PAGE: u32 = 1;

/// Page size used by the recipe grid
pub const DEFAULT_LIMIT: u32 = 20;

/// Query parameters owned by the pagination itself
const RESERVED_PARAMS: [&str; 2] = ["page", "limit"];

/// Parameters for `GET /api/recipes`
///
/// # Fields
/// - `page`: 1-based page number
/// - `limit`: recipes per page
/// - filters: extra query parameters such as `category`, `sort`, `search`.
///   Filters with an empty value are treated as unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number
    pub page: u32,
    /// Recipes per page
    pub limit: u32,
    filters: BTreeMap<String, String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

impl ListParams {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            filters: BTreeMap::new(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(name.into(), value.into());
        self
    }

    pub fn with_category(self, category: impl Into<String>) -> Self {
        self.with_filter("category", category)
    }

    pub fn with_sort(self, sort: impl Into<String>) -> Self {
        self.with_filter("sort", sort)
    }

    pub fn with_search(self, search: impl Into<String>) -> Self {
        self.with_filter("search", search)
    }

    /// Filters that are actually sent, in name order.
    pub fn filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Validates the parameters
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.page == 0 {
            return Some("Page must be at least 1".to_string());
        }
        if self.limit == 0 {
            return Some("Limit must be at least 1".to_string());
        }
        if self.filters().any(|(name, _)| name.is_empty()) {
            return Some("Filter name cannot be empty".to_string());
        }
        if let Some((name, _)) = self
            .filters()
            .find(|(name, _)| RESERVED_PARAMS.contains(name))
        {
            return Some(format!("Filter name '{}' is reserved", name));
        }
        None
    }

    /// Query pairs in the order they are sent: `page`, `limit`, then filters.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        pairs.extend(
            self.filters()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        pairs
    }

    /// Key shared by every cached list page with this page and limit.
    pub fn key_prefix(page: u32, limit: u32) -> String {
        format!("recipes_{}_{}", page, limit)
    }

    /// Cache key for these exact parameters.
    ///
    /// Equal parameter sets always produce the same key regardless of the
    /// order filters were added in. Filter names and values are
    /// form-urlencoded, so distinct parameter sets never share a key.
    pub fn cache_key(&self) -> String {
        let mut key = Self::key_prefix(self.page, self.limit);
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.filters())
            .finish();
        if !query.is_empty() {
            key.push('?');
            key.push_str(&query);
        }
        key
    }

    /// True if `key` was produced by `cache_key` for this page and limit.
    pub fn key_matches_page(key: &str, page: u32, limit: u32) -> bool {
        let prefix = Self::key_prefix(page, limit);
        match key.strip_prefix(&prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('?'),
            None => false,
        }
    }

    /// Parses a page number taken from a URL query value.
    ///
    /// Missing, non-numeric and zero values fall back to the first page.
    pub fn page_from_query(raw: Option<&str>) -> u32 {
        raw.and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|page| *page > 0)
            .unwrap_or(DEFAULT_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ListParams::default();
        assert_eq!(params.page, 1);
        assert_eq!(params.limit, 20);
        assert_eq!(params.filters().count(), 0);
        assert!(params.validate().is_none());
    }

    #[test]
    fn test_query_pairs_order() {
        let params = ListParams::new(2, 20)
            .with_search("tomato")
            .with_category("soup");

        let pairs = params.query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("limit".to_string(), "20".to_string()),
                ("category".to_string(), "soup".to_string()),
                ("search".to_string(), "tomato".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let params = ListParams::default()
            .with_category("")
            .with_sort("")
            .with_search("");
        assert_eq!(params.cache_key(), "recipes_1_20");
        assert_eq!(params.query_pairs().len(), 2);
    }

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = ListParams::new(3, 12).with_sort("new").with_category("cake");
        let b = ListParams::new(3, 12).with_category("cake").with_sort("new");
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(a.cache_key(), "recipes_3_12?category=cake&sort=new");
    }

    #[test]
    fn test_cache_key_escapes_filter_values() {
        let injected = ListParams::default().with_search("a&sort=new");
        let separate = ListParams::default().with_search("a").with_sort("new");
        assert_ne!(injected.cache_key(), separate.cache_key());
        assert_eq!(injected.cache_key(), "recipes_1_20?search=a%26sort%3Dnew");
        assert_eq!(separate.cache_key(), "recipes_1_20?search=a&sort=new");
        assert!(ListParams::key_matches_page(&injected.cache_key(), 1, 20));
    }

    #[test]
    fn test_key_matches_page() {
        assert!(ListParams::key_matches_page("recipes_1_20", 1, 20));
        assert!(ListParams::key_matches_page("recipes_1_20?sort=new", 1, 20));
        assert!(!ListParams::key_matches_page("recipes_1_200", 1, 20));
        assert!(!ListParams::key_matches_page("recipes_11_20", 1, 20));
    }

    #[test]
    fn test_validate_rejects_zero_page_and_limit() {
        assert!(ListParams::new(0, 20).validate().is_some());
        assert!(ListParams::new(1, 0).validate().is_some());
    }

    #[test]
    fn test_validate_rejects_reserved_filter() {
        let params = ListParams::default().with_filter("page", "3");
        let message = params.validate().unwrap();
        assert!(message.contains("reserved"));
    }

    #[test]
    fn test_page_from_query() {
        assert_eq!(ListParams::page_from_query(Some("4")), 4);
        assert_eq!(ListParams::page_from_query(Some(" 2 ")), 2);
        assert_eq!(ListParams::page_from_query(Some("0")), 1);
        assert_eq!(ListParams::page_from_query(Some("abc")), 1);
        assert_eq!(ListParams::page_from_query(Some("-3")), 1);
        assert_eq!(ListParams::page_from_query(None), 1);
    }
}
