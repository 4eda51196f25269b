use async_trait::async_trait;

use crate::domain::CallerId;

/// Per-caller request admission. Callers over quota are rejected, not delayed.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn allow(&self, caller: &CallerId) -> bool;
}
