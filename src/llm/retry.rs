use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::info;

use crate::constants::{
    DEFAULT_BACKOFF_MAX_SECS, DEFAULT_BACKOFF_MULTIPLIER_SECS, DEFAULT_CALL_ATTEMPTS,
};

#[derive(Debug, Clone, PartialEq)]
/// Per-call retry policy with randomized exponential backoff.
///
/// After failed attempt `n` (1-based) the wait is drawn uniformly from
/// `[0, min(max_delay, multiplier * 2^(n-1))]`.
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: usize,
    /// Base of the exponential schedule.
    pub multiplier: Duration,
    /// Cap on any single wait.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_CALL_ATTEMPTS,
            multiplier: Duration::from_secs_f64(DEFAULT_BACKOFF_MULTIPLIER_SECS),
            max_delay: Duration::from_secs_f64(DEFAULT_BACKOFF_MAX_SECS),
        }
    }
}

impl RetryPolicy {
    /// Policy with `max_attempts` and the default backoff.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    /// Policy that retries without sleeping (tests, offline tooling).
    pub fn immediate(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            multiplier: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Upper bound of the wait after failed attempt `attempt` (1-based).
    pub fn delay_ceiling(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31) as i32;
        let ceiling = self.multiplier.as_secs_f64() * 2f64.powi(exponent);
        Duration::from_secs_f64(ceiling.min(self.max_delay.as_secs_f64()))
    }

    /// Draws the jittered wait after failed attempt `attempt`.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let ceiling = self.delay_ceiling(attempt).as_secs_f64();
        if ceiling <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(rand::rng().random_range(0.0..=ceiling))
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. The last error is returned on exhaustion.
    pub async fn run<T, E, F, Fut, P>(&self, label: &str, mut op: F, is_retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt = 0usize;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < self.max_attempts && is_retryable(&err) => {
                    let delay = self.delay_for(attempt);
                    info!(
                        label,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying request due to {}",
                        err
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
