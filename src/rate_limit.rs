//! Sliding window rate limiting for outgoing EDGAR requests.
//!
//! SEC fair access rules cap automated traffic at ten requests per second per user agent.
//! Every request made by a [`Client`](crate::Client) (and all of its clones) first acquires
//! a permit from one shared [`RateLimiter`]. The limiter keeps the instants of the calls made
//! within the last `period`; when `calls` of them are still inside the window the caller
//! either waits for the oldest one to expire or is refused, depending on the
//! [`RateLimitPolicy`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use edgar_client_sdk::rate_limit::{RateLimitPolicy, RateLimiter};
//!
//! # async fn example() -> edgar_client_sdk::Result<()> {
//! let limiter = RateLimiter::new(2, Duration::from_secs(1), RateLimitPolicy::Fail)?;
//!
//! limiter.acquire().await?;
//! limiter.acquire().await?;
//! // A third call within the same second is refused
//! assert!(limiter.acquire().await.is_err());
//! # Ok(())
//! # }
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
#[cfg(feature = "tracing")]
use tracing::debug;

use crate::Result;
use crate::error::{Error, RateLimitExceeded};

/// What the [`RateLimiter`] does with a call once the quota for the window is used up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[non_exhaustive]
pub enum RateLimitPolicy {
    /// Sleep until the oldest call leaves the window, then proceed (default).
    ///
    /// Waiting callers are served in the order they arrived.
    #[default]
    Wait,
    /// Return a [`Kind::RateLimited`](crate::error::Kind::RateLimited) error immediately.
    Fail,
}

/// A call quota over a rolling time window, shared by every request of a client.
#[derive(Debug)]
pub struct RateLimiter {
    calls: u32,
    period: Duration,
    policy: RateLimitPolicy,
    /// Instants of the calls still inside the window, oldest first.
    /// The fair [`Mutex`] serializes the check-and-record step across tasks.
    window: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter allowing `calls` requests in any `period`.
    ///
    /// # Errors
    ///
    /// Returns an error if `calls` is zero or `period` is zero, since neither describes a
    /// usable quota.
    pub fn new(calls: u32, period: Duration, policy: RateLimitPolicy) -> Result<Self> {
        if calls == 0 {
            return Err(Error::invalid_config("rate limit calls must be at least 1"));
        }
        if period.is_zero() {
            return Err(Error::invalid_config("rate limit period must be non-zero"));
        }

        Ok(Self {
            calls,
            period,
            policy,
            window: Mutex::new(VecDeque::with_capacity(calls as usize)),
        })
    }

    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Number of calls recorded within the current window, finished or not.
    pub async fn calls_in_window(&self) -> usize {
        let mut window = self.window.lock().await;
        self.evict_expired(&mut window, Instant::now());
        window.len()
    }

    /// Acquires permission for one call, recording it against the quota.
    ///
    /// Under [`RateLimitPolicy::Wait`] this sleeps until a slot is free and always succeeds.
    /// Under [`RateLimitPolicy::Fail`] it returns a [`RateLimitExceeded`] error instead, and
    /// the refused call is not recorded.
    pub async fn acquire(&self) -> Result<()> {
        // Held across the sleep so that waiters are released in arrival order
        let mut window = self.window.lock().await;

        loop {
            let now = Instant::now();
            self.evict_expired(&mut window, now);

            if window.len() < self.calls as usize {
                window.push_back(now);
                return Ok(());
            }

            let retry_after = window
                .front()
                .map_or(Duration::ZERO, |oldest| {
                    (*oldest + self.period).saturating_duration_since(now)
                });

            match self.policy {
                RateLimitPolicy::Fail => {
                    #[cfg(feature = "tracing")]
                    debug!(
                        calls = self.calls,
                        retry_after_ms = retry_after.as_millis(),
                        "rate limit exhausted, refusing call"
                    );

                    return Err(RateLimitExceeded {
                        calls: self.calls,
                        period: self.period,
                        retry_after,
                    }
                    .into());
                }
                RateLimitPolicy::Wait => {
                    #[cfg(feature = "tracing")]
                    debug!(
                        calls = self.calls,
                        delay_ms = retry_after.as_millis(),
                        "rate limit exhausted, waiting for window to roll"
                    );

                    tokio::time::sleep(retry_after).await;
                }
            }
        }
    }

    fn evict_expired(&self, window: &mut VecDeque<Instant>, now: Instant) {
        while let Some(oldest) = window.front() {
            if now.saturating_duration_since(*oldest) >= self.period {
                window.pop_front();
            } else {
                break;
            }
        }
    }
}
