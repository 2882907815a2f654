//! Background Tasks Module
//!
//! Contains the tasks that run alongside the cache.
//!
//! # Tasks
//! - Expiry timer: removes one cache entry when its lifetime elapses

mod expiry;

pub use expiry::spawn_expiry_timer;
