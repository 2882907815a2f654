//! Request and Response models for the recipe API
//!
//! This module defines the list query parameters sent to the API and the
//! typed form of what comes back.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{ListParams, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use responses::{PageCursor, RecipePage};
