//! Recipe API client
//!
//! Cached fetch wrappers for each resource the recipe browser reads, plus the
//! invalidation calls used after server-side changes.

use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::routes::Routes;
use crate::cache::{CacheStats, CacheStore, Namespace};
use crate::config::Config;
use crate::error::{ApiError, ErrorKind, Result};
use crate::models::{ListParams, RecipePage};

/// Key of the category list in the singleton namespace
const CATEGORIES_KEY: &str = "categories";

/// Client for the recipe API with a transparent in-memory cache.
///
/// Every read goes through the cache first; a network request is only made
/// on a miss, and only fully successful responses are cached. Concurrent
/// misses for the same key are not merged; the last response to arrive wins.
#[derive(Debug, Clone)]
pub struct RecipeApi {
    http: Client,
    routes: Routes,
    cache: CacheStore,
    default_limit: u32,
}

impl RecipeApi {
    /// Creates a client with a fresh cache using `config.cache_ttl`.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_cache(config, CacheStore::new(config.cache_ttl_duration()))
    }

    /// Creates a client around an existing cache handle.
    pub fn with_cache(config: &Config, cache: CacheStore) -> Result<Self> {
        let routes = Routes::new(&config.base_url)
            .map_err(|kind| ApiError::new("Error configuring recipe API", kind))?;
        info!("Recipe API client targeting {}", routes.base());

        Ok(Self {
            http: Client::new(),
            routes,
            cache,
            default_limit: config.default_limit,
        })
    }

    /// The cache backing this client.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Snapshot of the cache counters, e.g. for a debug panel.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Parameters for `page` at the configured default page size.
    pub fn list_params(&self, page: u32) -> ListParams {
        ListParams::new(page, self.default_limit)
    }

    // == Fetch Wrappers ==

    /// Fetches a single recipe (`GET /api/recipes/{id}`).
    pub async fn get_recipe_by_id(&self, id: &str) -> Result<Value> {
        if id.trim().is_empty() {
            return Err(failure(
                "Error fetching recipe".to_string(),
                ErrorKind::InvalidArgument("Recipe ID is required".to_string()),
            ));
        }
        let context = format!("Error fetching recipe {}", id);

        if let Some(recipe) = self.cache.get(Namespace::Items, id) {
            return Ok(recipe);
        }

        let recipe = self
            .fetch_json(
                self.routes.recipe(id),
                "Recipe not found",
                "Failed to fetch recipe details",
            )
            .await
            .map_err(|kind| failure(context, kind))?;

        self.cache.set(Namespace::Items, id, recipe.clone());
        Ok(recipe)
    }

    /// Fetches one page of recipes (`GET /api/recipes?page=&limit=&...`).
    pub async fn get_recipes(&self, params: &ListParams) -> Result<RecipePage> {
        let context = format!(
            "Error fetching recipes (page {}, limit {})",
            params.page, params.limit
        );
        if let Some(message) = params.validate() {
            return Err(failure(context, ErrorKind::InvalidArgument(message)));
        }

        let key = params.cache_key();
        if let Some(body) = self.cache.get(Namespace::Lists, &key) {
            return decode_page(body).map_err(|kind| failure(context, kind));
        }

        let body = self
            .fetch_json(
                self.routes.recipes(params),
                "Recipes not found",
                "Failed to fetch recipes",
            )
            .await
            .map_err(|kind| failure(context.clone(), kind))?;
        let page = decode_page(body.clone()).map_err(|kind| failure(context, kind))?;

        self.cache.set(Namespace::Lists, key, body);
        Ok(page)
    }

    /// Fetches every category (`GET /api/categories`).
    pub async fn get_categories(&self) -> Result<Vec<Value>> {
        let context = "Error fetching categories".to_string();

        if let Some(Value::Array(categories)) = self.cache.get(Namespace::Singleton, CATEGORIES_KEY)
        {
            return Ok(categories);
        }

        let body = self
            .fetch_json(
                self.routes.categories(),
                "Categories not found",
                "Failed to fetch categories",
            )
            .await
            .map_err(|kind| failure(context.clone(), kind))?;
        let Value::Array(categories) = body else {
            return Err(failure(
                context,
                ErrorKind::InvalidResponse("expected a JSON array of categories".to_string()),
            ));
        };

        self.cache.set(
            Namespace::Singleton,
            CATEGORIES_KEY,
            Value::Array(categories.clone()),
        );
        Ok(categories)
    }

    // == Invalidation ==

    /// Drops everything cached so the next read of anything hits the network.
    pub fn clear_cache(&self) {
        let stats = self.cache.stats();
        self.cache.clear();
        info!(
            "Recipe cache cleared ({} entries dropped, hit rate {:.2})",
            stats.total_entries,
            stats.hit_rate()
        );
    }

    /// Drops one cached recipe.
    pub fn invalidate_recipe(&self, id: &str) {
        if self.cache.delete(Namespace::Items, id) {
            info!("Invalidated cached recipe {}", id);
        }
    }

    /// Drops every cached list page for `page`/`limit`, whatever its filters.
    pub fn invalidate_recipes_list(&self, page: u32, limit: u32) {
        let removed = self.cache.remove_where(Namespace::Lists, |key| {
            ListParams::key_matches_page(key, page, limit)
        });
        if removed > 0 {
            info!(
                "Invalidated {} cached list page(s) for page {}, limit {}",
                removed, page, limit
            );
        }
    }

    /// Drops a single entry by namespace and key.
    pub fn invalidate(&self, namespace: Namespace, key: &str) {
        if self.cache.delete(namespace, key) {
            info!("Invalidated cached {}/{}", namespace, key);
        }
    }

    // == Transport ==

    /// Issues one GET and returns the parsed JSON body of a 2xx response.
    async fn fetch_json(
        &self,
        url: Url,
        not_found: &str,
        fallback: &str,
    ) -> std::result::Result<Value, ErrorKind> {
        info!("Fetching {}", url);
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ErrorKind::NotFound(not_found.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = server_message(&body).unwrap_or_else(|| fallback.to_string());
            return Err(ErrorKind::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        debug!("Received {} bytes ({})", bytes.len(), status);
        serde_json::from_slice(&bytes).map_err(|err| ErrorKind::InvalidResponse(err.to_string()))
    }
}

fn failure(context: String, kind: ErrorKind) -> ApiError {
    warn!("{}: {}", context, kind);
    ApiError::new(context, kind)
}

fn decode_page(body: Value) -> std::result::Result<RecipePage, ErrorKind> {
    serde_json::from_value(body).map_err(|err| ErrorKind::InvalidResponse(err.to_string()))
}

/// Extracts a human-readable message from an error response body.
///
/// Accepts a bare JSON string or an object with an `error` or `message`
/// string field.
fn server_message(body: &str) -> Option<String> {
    let message = match serde_json::from_str::<Value>(body).ok()? {
        Value::String(message) => message,
        Value::Object(fields) => fields
            .get("error")
            .or_else(|| fields.get("message"))
            .and_then(Value::as_str)?
            .to_string(),
        _ => return None,
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::assert_err;

    fn offline_api() -> RecipeApi {
        // Nothing listens on the discard port
        let config = Config::default().with_base_url("http://127.0.0.1:9");
        RecipeApi::new(&config).unwrap()
    }

    #[test]
    fn test_server_message() {
        assert_eq!(
            server_message(r#"{"error":"Recipe store offline"}"#).as_deref(),
            Some("Recipe store offline")
        );
        assert_eq!(
            server_message(r#"{"message":"Bad page"}"#).as_deref(),
            Some("Bad page")
        );
        assert_eq!(server_message(r#""plain""#).as_deref(), Some("plain"));
        assert_eq!(server_message(r#"{"error":""}"#), None);
        assert_eq!(server_message(r#"{"error":42}"#), None);
        assert_eq!(server_message("<html>oops</html>"), None);
        assert_eq!(server_message(""), None);
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let config = Config::default().with_base_url("::nonsense::");
        let err = RecipeApi::new(&config).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_empty_id_is_invalid() {
        let api = offline_api();

        let err = assert_err!(api.get_recipe_by_id("").await);
        assert!(err.is_invalid_argument());
        assert_eq!(err.to_string(), "Error fetching recipe: Recipe ID is required");

        let err = assert_err!(api.get_recipe_by_id("   ").await);
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_cached_recipe_skips_network() {
        let api = offline_api();
        api.cache().set(Namespace::Items, "42", json!({"_id": "42"}));

        let recipe = api.get_recipe_by_id("42").await.unwrap();
        assert_eq!(recipe, json!({"_id": "42"}));
    }

    #[tokio::test]
    async fn test_cached_page_skips_network() {
        let api = offline_api();
        let params = ListParams::new(1, 20);
        api.cache().set(
            Namespace::Lists,
            params.cache_key(),
            json!({"recipes": [], "total": 0, "totalPages": 0}),
        );

        let page = api.get_recipes(&params).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_list_params() {
        let api = offline_api();
        let err = assert_err!(api.get_recipes(&ListParams::new(0, 20)).await);
        assert!(err.is_invalid_argument());
    }

    #[tokio::test]
    async fn test_invalidate_recipes_list_covers_filters() {
        let api = offline_api();
        let plain = ListParams::new(1, 20);
        let filtered = ListParams::new(1, 20).with_category("soup");
        let other = ListParams::new(2, 20);
        for params in [&plain, &filtered, &other] {
            api.cache().set(Namespace::Lists, params.cache_key(), json!({}));
        }

        api.invalidate_recipes_list(1, 20);

        assert!(!api.cache().contains(Namespace::Lists, &plain.cache_key()));
        assert!(!api.cache().contains(Namespace::Lists, &filtered.cache_key()));
        assert!(api.cache().contains(Namespace::Lists, &other.cache_key()));
    }

    #[tokio::test]
    async fn test_invalidation_is_idempotent() {
        let api = offline_api();
        api.cache().set(Namespace::Items, "1", json!({}));

        api.invalidate_recipe("1");
        api.invalidate_recipe("1");
        api.invalidate(Namespace::Singleton, CATEGORIES_KEY);
        api.clear_cache();
        api.clear_cache();

        assert!(api.cache().is_empty());
        assert_eq!(api.cache().pending_timers(), 0);
    }

    #[test]
    fn test_list_params_use_configured_limit() {
        let config = Config::default()
            .with_base_url("http://127.0.0.1:9")
            .with_default_limit(12);
        let api = RecipeApi::new(&config).unwrap();

        let params = api.list_params(3);
        assert_eq!(params, ListParams::new(3, 12));
        assert_eq!(offline_api().list_params(1), ListParams::default());
    }

    #[tokio::test]
    async fn test_cache_stats_track_hits() {
        let api = offline_api();
        api.cache().set(Namespace::Items, "42", json!({"_id": "42"}));

        api.get_recipe_by_id("42").await.unwrap();
        api.get_recipe_by_id("42").await.unwrap();

        let stats = api.cache_stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hit_rate(), 1.0);
    }

    #[tokio::test]
    async fn test_clones_share_cache() {
        let api = offline_api();
        let other = api.clone();

        api.cache().set(Namespace::Items, "7", json!({"_id": "7"}));
        assert_eq!(other.get_recipe_by_id("7").await.unwrap()["_id"], "7");
    }
}
