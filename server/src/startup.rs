//! Waits for the backing store to accept schema creation before serving.
//!
//! Failure is never fatal: once the attempts run out the process carries on
//! and store-backed requests fail individually until the database appears.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::storage::TodoStore;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_DELAY_SECS: u64 = 3;
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 5;

/// Fixed-delay retry bounds.
///
/// `attempt_timeout` caps a single attempt, including the pool's internal
/// reconnect loop on refused connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub attempt_timeout: Duration,
}

/// Run `op` until it succeeds or `policy.max_attempts` is reached, sleeping
/// `policy.delay` between attempts. An attempt still pending after
/// `policy.attempt_timeout` counts as failed. Returns whether any attempt
/// succeeded.
pub async fn retry<F, Fut, E>(policy: RetryPolicy, mut op: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        match tokio::time::timeout(policy.attempt_timeout, op()).await {
            Ok(Ok(())) => return true,
            Ok(Err(err)) => warn!(attempt, attempts, %err, "database not ready, retrying"),
            Err(_) => warn!(
                attempt,
                attempts,
                timeout = ?policy.attempt_timeout,
                "database not ready, attempt timed out"
            ),
        }
        if attempt < attempts {
            tokio::time::sleep(policy.delay).await;
        }
    }
    false
}

pub async fn ensure_schema(store: &TodoStore, policy: RetryPolicy) -> bool {
    let ready = retry(policy, || store.create_schema()).await;
    if ready {
        info!("schema ready");
    } else {
        error!(
            attempts = policy.max_attempts.max(1),
            "schema creation failed; serving without a ready store"
        );
    }
    ready
}
