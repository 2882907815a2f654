//! Recipe Cache - data-access layer for a recipe browser
//!
//! Fetches recipes, recipe pages and categories from a REST API and keeps
//! them in an in-memory cache with per-entry expiry and manual invalidation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::RecipeApi;
pub use cache::{CacheStats, CacheStore, Namespace};
pub use config::Config;
pub use error::{ApiError, ErrorKind, Result};
pub use models::{ListParams, PageCursor, RecipePage};
