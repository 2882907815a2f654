//! Expiry Timer Task
//!
//! One background task per cached entry that fires once its lifetime elapses.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Spawns a task that runs `on_expire` once `ttl` has elapsed.
///
/// The deadline is fixed at spawn time, not when the task is first polled.
/// The returned handle is owned by the cache entry; aborting it cancels the
/// expiry. Returns `None` when called outside a tokio runtime, in which case
/// the caller has to enforce the deadline some other way.
///
/// # Example
/// ```ignore
/// let timer = spawn_expiry_timer(Duration::from_secs(300), move || {
///     store.expire(namespace, &key, generation);
/// });
/// ```
pub fn spawn_expiry_timer<F>(ttl: Duration, on_expire: F) -> Option<JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    let runtime = match Handle::try_current() {
        Ok(runtime) => runtime,
        Err(_) => {
            debug!("No tokio runtime available, expiry will be enforced on read");
            return None;
        }
    };

    let deadline = Instant::now() + ttl;
    Some(runtime.spawn(async move {
        tokio::time::sleep_until(deadline).await;
        on_expire();
    }))
}
