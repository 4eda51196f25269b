mod sliding_window_rate_limiter;

pub use sliding_window_rate_limiter::{SlidingWindowRateLimiter, UnlimitedRateLimiter};
