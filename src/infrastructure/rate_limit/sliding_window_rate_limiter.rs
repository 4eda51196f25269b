use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::application::ports::RateLimiter;
use crate::domain::CallerId;

struct Windows {
    by_caller: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

/// Per-caller sliding window held in process memory. Callers whose window
/// has fully elapsed are dropped at most once per window.
pub struct SlidingWindowRateLimiter {
    max_requests: usize,
    window: Duration,
    windows: Mutex<Windows>,
}

impl SlidingWindowRateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            windows: Mutex::new(Windows {
                by_caller: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    pub async fn tracked_callers(&self) -> usize {
        self.windows.lock().await.by_caller.len()
    }
}

#[async_trait]
impl RateLimiter for SlidingWindowRateLimiter {
    async fn allow(&self, caller: &CallerId) -> bool {
        let now = Instant::now();
        let window = self.window;
        let mut windows = self.windows.lock().await;

        if now.duration_since(windows.last_sweep) >= window {
            let before = windows.by_caller.len();
            windows
                .by_caller
                .retain(|_, ts| ts.back().is_some_and(|&at| now.duration_since(at) < window));
            windows.last_sweep = now;
            debug!(
                dropped = before - windows.by_caller.len(),
                remaining = windows.by_caller.len(),
                "Swept idle rate limit windows"
            );
        }

        let timestamps = windows
            .by_caller
            .entry(caller.as_str().to_string())
            .or_default();

        while timestamps
            .front()
            .is_some_and(|&at| now.duration_since(at) >= window)
        {
            timestamps.pop_front();
        }

        if timestamps.len() >= self.max_requests {
            debug!(caller = %caller, in_window = timestamps.len(), "Rate limit reached");
            return false;
        }

        timestamps.push_back(now);
        true
    }
}

/// Admits every request.
pub struct UnlimitedRateLimiter;

#[async_trait]
impl RateLimiter for UnlimitedRateLimiter {
    async fn allow(&self, _caller: &CallerId) -> bool {
        true
    }
}
