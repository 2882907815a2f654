//! API Module
//!
//! Cached client for the recipe REST API.
//!
//! # Endpoints
//! - `GET /api/recipes/{id}` - A single recipe
//! - `GET /api/recipes?page=&limit=&...` - A page of recipes
//! - `GET /api/categories` - All categories

pub mod client;
pub mod routes;

pub use client::RecipeApi;
pub use routes::Routes;
