//! Minimum-interval rate limiter with jitter.
//!
//! Keeps a polite pace between page fetches against coteur.com.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};

/// Enforces a minimum interval between acquisitions
pub struct RateLimiter {
    /// None until the first acquisition, which is always immediate.
    /// Instant arithmetic before then would underflow on a young
    /// monotonic clock.
    last_request: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Create a limiter allowing at most `requests_per_minute` acquisitions
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        Self {
            last_request: Arc::new(Mutex::new(None)),
            min_interval: Duration::from_secs_f64(60.0 / rpm as f64),
        }
    }

    /// Wait until the next request is allowed
    pub async fn acquire(&self) {
        let wait = {
            let mut last = self.last_request.lock().await;
            let wait = match *last {
                Some(prev) => {
                    let jittered = self.min_interval.mul_f64(0.8 + 0.4 * jitter());
                    jittered.saturating_sub(prev.elapsed())
                }
                None => Duration::ZERO,
            };
            *last = Some(Instant::now() + wait);
            wait
        };

        if !wait.is_zero() {
            sleep(wait).await;
        }
    }
}

/// Pseudo-random factor in [0.0, 1.0) from the clock's subsecond nanos
fn jitter() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    (nanos % 1000) as f64 / 1000.0
}
