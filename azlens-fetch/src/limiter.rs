//! Request rate limiting for az invocations.
//!
//! The Azure management plane throttles aggressive callers, so every gated
//! command acquires the limiter first. The limiter tracks a sliding fixed
//! window of one minute plus a minimum spacing between consecutive
//! requests; callers sleep for [`RateLimiter::wait_time`] and record the
//! request immediately before dispatch, not after completion, which bounds
//! the request rate regardless of downstream latency.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

/// Length of the counting window.
const WINDOW: Duration = Duration::from_secs(60);

// ============================================================================
// Config
// ============================================================================

/// Rate limiter settings.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Whether rate limiting is applied at all.
    pub enabled: bool,
    /// Maximum requests within one window.
    pub max_requests_per_minute: u32,
    /// Minimum spacing between consecutive requests.
    pub min_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests_per_minute: 30,
            min_interval: Duration::from_millis(500),
        }
    }
}

impl RateLimitConfig {
    /// Settings with rate limiting switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}

// ============================================================================
// Rate Limiter
// ============================================================================

#[derive(Debug)]
struct LimiterState {
    last_request: Option<Instant>,
    request_count: u32,
    window_start: Instant,
}

/// Sliding fixed-window request gate.
///
/// The window resets whenever more than [`WINDOW`] has elapsed since it
/// opened. A request is throttled when the window is full or when it would
/// follow the previous request closer than the configured minimum
/// interval.
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    /// Creates a limiter with the given settings.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            state: Mutex::new(LimiterState {
                last_request: None,
                request_count: 0,
                window_start: Instant::now(),
            }),
        }
    }

    /// Creates a limiter that never throttles.
    pub fn disabled() -> Self {
        Self::new(RateLimitConfig::disabled())
    }

    /// Returns true if the next request must be delayed.
    pub fn should_throttle(&self) -> bool {
        self.should_throttle_at(Instant::now())
    }

    /// Required delay before the next request may be dispatched.
    pub fn wait_time(&self) -> Duration {
        self.wait_time_at(Instant::now())
    }

    /// Records a dispatched request.
    pub fn record_request(&self) {
        self.record_request_at(Instant::now());
    }

    /// Sleeps out any required delay, then records the request.
    ///
    /// Callers invoke this immediately before dispatching the gated
    /// operation.
    pub async fn acquire(&self) {
        if !self.config.enabled {
            return;
        }

        let wait = self.wait_time();
        if !wait.is_zero() {
            debug!(wait = ?wait, "Rate limit reached, delaying request");
            tokio::time::sleep(wait).await;
        }
        self.record_request();
    }

    // ========================================================================
    // Clock-explicit internals
    // ========================================================================

    pub(crate) fn should_throttle_at(&self, now: Instant) -> bool {
        if !self.config.enabled {
            return false;
        }

        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        roll_window(&mut state, now);

        if state.request_count >= self.config.max_requests_per_minute {
            return true;
        }

        state
            .last_request
            .is_some_and(|last| now.duration_since(last) < self.config.min_interval)
    }

    pub(crate) fn wait_time_at(&self, now: Instant) -> Duration {
        if !self.should_throttle_at(now) {
            return Duration::ZERO;
        }

        let state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state
            .last_request
            .map(|last| {
                self.config
                    .min_interval
                    .saturating_sub(now.duration_since(last))
            })
            .unwrap_or(Duration::ZERO)
    }

    pub(crate) fn record_request_at(&self, now: Instant) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        roll_window(&mut state, now);
        state.last_request = Some(now);
        state.request_count += 1;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

fn roll_window(state: &mut LimiterState, now: Instant) {
    if now.duration_since(state.window_start) > WINDOW {
        state.request_count = 0;
        state.window_start = now;
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32, min_interval_ms: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            enabled: true,
            max_requests_per_minute: max,
            min_interval: Duration::from_millis(min_interval_ms),
        })
    }

    #[test]
    fn test_disabled_never_throttles() {
        let limiter = RateLimiter::disabled();
        let now = Instant::now();

        for _ in 0..100 {
            assert!(!limiter.should_throttle_at(now));
            assert_eq!(limiter.wait_time_at(now), Duration::ZERO);
        }
    }

    #[test]
    fn test_first_request_unthrottled() {
        let limiter = limiter(10, 500);
        let now = Instant::now();

        assert!(!limiter.should_throttle_at(now));
        assert_eq!(limiter.wait_time_at(now), Duration::ZERO);
    }

    #[test]
    fn test_min_interval_spacing() {
        let limiter = limiter(10, 500);
        let t0 = Instant::now();

        limiter.record_request_at(t0);

        // 100ms later: too soon, must wait the remaining 400ms.
        let t1 = t0 + Duration::from_millis(100);
        assert!(limiter.should_throttle_at(t1));
        assert_eq!(limiter.wait_time_at(t1), Duration::from_millis(400));

        // After the full interval the request may go out.
        let t2 = t0 + Duration::from_millis(500);
        assert!(!limiter.should_throttle_at(t2));
        assert_eq!(limiter.wait_time_at(t2), Duration::ZERO);
    }

    #[test]
    fn test_window_capacity() {
        let limiter = limiter(3, 0);
        let t0 = Instant::now();

        for i in 0..3 {
            let t = t0 + Duration::from_secs(i);
            assert!(!limiter.should_throttle_at(t));
            limiter.record_request_at(t);
        }

        // Window full.
        let t3 = t0 + Duration::from_secs(3);
        assert!(limiter.should_throttle_at(t3));

        // A new window opens after 60s.
        let t4 = t0 + Duration::from_secs(61);
        assert!(!limiter.should_throttle_at(t4));
    }

    #[test]
    fn test_window_reset_clears_count() {
        let limiter = limiter(2, 0);
        let t0 = Instant::now();

        limiter.record_request_at(t0);
        limiter.record_request_at(t0 + Duration::from_secs(1));
        assert!(limiter.should_throttle_at(t0 + Duration::from_secs(2)));

        // Recording in a fresh window starts the count over.
        let fresh = t0 + Duration::from_secs(90);
        limiter.record_request_at(fresh);
        assert!(!limiter.should_throttle_at(fresh + Duration::from_secs(1)));
    }

    #[tokio::test]
    async fn test_acquire_spaces_requests() {
        let limiter = limiter(100, 20);

        let start = Instant::now();
        limiter.acquire().await;
        limiter.acquire().await;
        limiter.acquire().await;

        // Two gaps of at least the minimum interval.
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[tokio::test]
    async fn test_acquire_disabled_is_instant() {
        let limiter = RateLimiter::disabled();

        let start = Instant::now();
        for _ in 0..50 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
