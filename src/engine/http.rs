// ── Kaori Engine: Provider Retry Policy & Circuit ──────────────────────────
//
// How the Gemini client reacts to a failed call. The mood pipeline never
// retries; a sentiment call that ends in error simply leaves the mood alone.
//
//   RetryPolicy — which statuses are worth another try, and how long to wait
//                 (doubling backoff, uniform ±25% jitter, Retry-After honoured)
//   Circuit     — after N failed calls in a row, refuse calls for a cooldown

use crate::atoms::constants::*;
use crate::atoms::error::{EngineError, EngineResult};
use log::warn;
use parking_lot::Mutex;
use rand::Rng;
use std::time::{Duration, Instant};

/// Shortest delay a jittered wait may shrink to.
const MIN_DELAY: Duration = Duration::from_millis(100);

// ── Retry policy ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Wait before the first retry; doubles each time.
    pub base: Duration,
    /// Largest computed backoff.
    pub cap: Duration,
    /// Largest server-requested wait we agree to.
    pub retry_after_cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: PROVIDER_MAX_RETRIES,
            base: Duration::from_millis(PROVIDER_RETRY_BASE_MS),
            cap: Duration::from_millis(PROVIDER_RETRY_CAP_MS),
            retry_after_cap: Duration::from_secs(PROVIDER_RETRY_AFTER_CAP_SECS),
        }
    }
}

impl RetryPolicy {
    /// Rate limits and server-side hiccups. Auth and request errors are final.
    pub fn is_transient(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }

    /// Whether the call that just failed with `status` on attempt `attempt`
    /// (0-based) gets another go.
    pub fn should_retry(&self, status: u16, attempt: u32) -> bool {
        Self::is_transient(status) && attempt < self.max_retries
    }

    /// Un-jittered wait before retry number `retry` (0-based). A longer
    /// `Retry-After` from the server wins, up to `retry_after_cap`.
    pub fn backoff(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let doubled = self.base.saturating_mul(2u32.saturating_pow(retry.min(16)));
        let computed = doubled.min(self.cap);
        match retry_after {
            Some(asked) => asked.min(self.retry_after_cap).max(computed),
            None => computed,
        }
    }

    /// `delay` moved by a uniform offset within ±25%, never below 100ms.
    pub fn jittered<R: Rng + ?Sized>(delay: Duration, rng: &mut R) -> Duration {
        let ms = delay.as_millis().min(u64::MAX as u128) as i64;
        let spread = ms / 4;
        let offset = if spread == 0 { 0 } else { rng.gen_range(-spread..=spread) };
        Duration::from_millis((ms + offset).max(0) as u64).max(MIN_DELAY)
    }

    /// Sleep before retry number `retry`; returns how long it slept.
    pub async fn wait(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let delay = Self::jittered(self.backoff(retry, retry_after), &mut rand::thread_rng());
        tokio::time::sleep(delay).await;
        delay
    }
}

/// `Retry-After` in its delta-seconds form. Dates are ignored.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

// ── Circuit ────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct CircuitState {
    failures: u32,
    opened_at: Option<Instant>,
}

/// Consecutive-failure counter for one provider. Open while the cooldown
/// runs; once it has passed the next call goes through, and its result
/// closes the circuit again or restarts the cooldown.
#[derive(Debug)]
pub struct Circuit {
    provider: &'static str,
    threshold: u32,
    cooldown: Duration,
    state: Mutex<CircuitState>,
}

impl Circuit {
    pub fn new(provider: &'static str, threshold: u32, cooldown: Duration) -> Self {
        Circuit {
            provider,
            threshold,
            cooldown,
            state: Mutex::new(CircuitState::default()),
        }
    }

    pub fn check(&self) -> EngineResult<()> {
        let state = self.state.lock();
        match state.opened_at {
            Some(at) if at.elapsed() < self.cooldown => {
                let left = self.cooldown.saturating_sub(at.elapsed());
                Err(EngineError::provider(
                    self.provider,
                    format!(
                        "{} failures in a row, not calling again for {}s",
                        state.failures,
                        left.as_secs()
                    ),
                ))
            }
            _ => Ok(()),
        }
    }

    pub fn succeeded(&self) {
        *self.state.lock() = CircuitState::default();
    }

    pub fn failed(&self) {
        let mut state = self.state.lock();
        state.failures += 1;
        if state.failures >= self.threshold {
            state.opened_at = Some(Instant::now());
            warn!(
                "[{}] {} failures in a row, pausing calls for {}s",
                self.provider,
                state.failures,
                self.cooldown.as_secs()
            );
        }
    }
}
