//! API Routes
//!
//! Builds the URLs of the recipe API endpoints from the configured origin.
//!
//! # Endpoints
//! - `GET /api/recipes/{id}` - A single recipe
//! - `GET /api/recipes?page=&limit=&...` - A page of recipes
//! - `GET /api/categories` - All categories

use reqwest::Url;

use crate::error::ErrorKind;
use crate::models::ListParams;

const RECIPES: [&str; 2] = ["api", "recipes"];
const CATEGORIES: [&str; 2] = ["api", "categories"];

/// Endpoint URLs resolved against one base URL.
#[derive(Debug, Clone)]
pub struct Routes {
    base: Url,
}

impl Routes {
    /// Parses `base_url`, which must be an absolute URL that can carry a path.
    pub fn new(base_url: &str) -> Result<Self, ErrorKind> {
        let base = Url::parse(base_url).map_err(|err| {
            ErrorKind::InvalidArgument(format!("Invalid base URL '{}': {}", base_url, err))
        })?;
        if base.cannot_be_a_base() {
            return Err(ErrorKind::InvalidArgument(format!(
                "Base URL '{}' cannot carry a path",
                base_url
            )));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn with_segments<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /api/recipes/{id}`; the id is percent-encoded as one segment.
    pub fn recipe(&self, id: &str) -> Url {
        self.with_segments(RECIPES.into_iter().chain([id]))
    }

    /// `GET /api/recipes?page=&limit=&{filters}`
    pub fn recipes(&self, params: &ListParams) -> Url {
        let mut url = self.with_segments(RECIPES);
        url.query_pairs_mut().extend_pairs(params.query_pairs());
        url
    }

    /// `GET /api/categories`
    pub fn categories(&self) -> Url {
        self.with_segments(CATEGORIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Routes {
        Routes::new("http://localhost:3000").unwrap()
    }

    #[test]
    fn test_recipe_url() {
        assert_eq!(
            routes().recipe("42").as_str(),
            "http://localhost:3000/api/recipes/42"
        );
    }

    #[test]
    fn test_recipe_id_is_one_segment() {
        assert_eq!(
            routes().recipe("a/b c").as_str(),
            "http://localhost:3000/api/recipes/a%2Fb%20c"
        );
    }

    #[test]
    fn test_recipes_url_with_filters() {
        let params = ListParams::new(2, 20).with_category("soup");
        assert_eq!(
            routes().recipes(&params).as_str(),
            "http://localhost:3000/api/recipes?page=2&limit=20&category=soup"
        );
    }

    #[test]
    fn test_categories_url() {
        assert_eq!(
            routes().categories().as_str(),
            "http://localhost:3000/api/categories"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let routes = Routes::new("http://example.test/v1/").unwrap();
        assert_eq!(
            routes.categories().as_str(),
            "http://example.test/v1/api/categories"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            Routes::new("not a url"),
            Err(ErrorKind::InvalidArgument(_))
        ));
        assert!(matches!(
            Routes::new("mailto:chef@example.test"),
            Err(ErrorKind::InvalidArgument(_))
        ));
    }
}
