//! # Circuit Breaker Module
//!
//! Stops calling a failing price backend for a while so that a dead
//! upstream does not add its timeout to every ingredient lookup.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::config::BreakerConfig;

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

/// Circuit breaker for an upstream price backend
///
/// # State Machine
///
/// - **Closed**: Normal operation, requests pass through
/// - **Open**: Failure threshold exceeded, requests are skipped
/// - **Half-Open**: Reset timeout elapsed, the next request is let through
///
/// # Configuration
///
/// Uses `BreakerConfig` for:
/// - `failure_threshold`: Failures before opening (default: 5)
/// - `reset_secs`: Time before attempting reset (default: 60s)
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    config: BreakerConfig,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    ///
    /// ```rust
    /// use meal_planner::config::BreakerConfig;
    /// use meal_planner::circuit_breaker::CircuitBreaker;
    ///
    /// let circuit_breaker = CircuitBreaker::new(BreakerConfig::default());
    /// assert!(!circuit_breaker.is_open());
    /// ```
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    /// Check if the breaker is open (requests should be skipped)
    ///
    /// Resets itself to closed once the reset timeout has elapsed since the
    /// last recorded failure.
    pub fn is_open(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.failure_count >= self.config.failure_threshold {
            if let Some(last_time) = state.last_failure_time {
                if last_time.elapsed() < Duration::from_secs(self.config.reset_secs) {
                    return true;
                }
                *state = BreakerState::default();
            }
        }
        false
    }

    /// Record a failed upstream call
    pub fn record_failure(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());

        if state.failure_count == self.config.failure_threshold {
            warn!(
                "Circuit breaker opened after {} failures, pausing for {}s",
                state.failure_count, self.config.reset_secs
            );
        }
    }

    /// Record a successful upstream call, closing the breaker
    pub fn record_success(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = BreakerState::default();
    }

    /// Failures recorded since the last success or reset
    pub fn failure_count(&self) -> u32 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .failure_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaker(threshold: u32, reset_secs: u64) -> CircuitBreaker {
        CircuitBreaker::new(BreakerConfig {
            failure_threshold: threshold,
            reset_secs,
        })
    }

    #[test]
    fn test_starts_closed() {
        let cb = breaker(2, 60);
        assert!(!cb.is_open());
        assert_eq!(cb.failure_count(), 0);
    }

    #[test]
    fn test_opens_at_threshold() {
        let cb = breaker(2, 60);
        cb.record_failure();
        assert!(!cb.is_open());
        cb.record_failure();
        assert!(cb.is_open());
    }

    #[test]
    fn test_success_closes() {
        let cb = breaker(1, 60);
        cb.record_failure();
        assert!(cb.is_open());
        cb.record_success();
        assert!(!cb.is_open());
        assert_eq!(cb.failure_count(), 0);
    }

    #[test]
    fn test_resets_after_timeout() {
        let cb = breaker(1, 0);
        cb.record_failure();
        // zero-second reset window has always elapsed
        assert!(!cb.is_open());
        assert_eq!(cb.failure_count(), 0);
    }
}
