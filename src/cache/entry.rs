//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with expiry support.

use std::time::Duration;

use serde_json::Value;
use tokio::task::JoinHandle;
use tokio::time::Instant;

// == Cache Entry ==
/// A cached value, its expiry deadline and the timer that enforces it.
///
/// Dropping an entry aborts its timer, so replacing or removing an entry
/// never leaves a timer behind.
#[derive(Debug)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// When the entry was stored
    pub created_at: Instant,
    /// When the entry stops being served
    pub expires_at: Instant,
    /// Store-wide sequence number of this write
    pub generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now. No timer is attached yet.
    pub fn new(value: Value, ttl: Duration, generation: u64) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: now + ttl,
            generation,
            timer: None,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its deadline.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    /// Attaches the expiry timer, aborting any timer already attached.
    pub(crate) fn attach_timer(&mut self, timer: JoinHandle<()>) {
        if let Some(previous) = self.timer.replace(timer) {
            previous.abort();
        }
    }

    /// Takes the timer out without aborting it.
    pub(crate) fn detach_timer(&mut self) -> Option<JoinHandle<()>> {
        self.timer.take()
    }

    /// True while a timer is attached and has not run to completion.
    pub fn has_pending_timer(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for CacheEntry {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
