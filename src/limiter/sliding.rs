//! Core sliding-window rate limiter.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::error::Result;

use super::log::RequestLog;
use super::policy::{Decision, Policy};

/// Snapshot of a key's raw request log, as returned by
/// [`SlidingWindowLimiter::status`].
///
/// The snapshot is taken without expiring anything, so it reflects true
/// historical volume rather than the currently countable window.
#[derive(Debug, Clone)]
pub struct KeyStatus {
    /// Number of entries in the log.
    pub count: usize,
    /// The recorded admission timestamps, oldest first.
    pub requests: Vec<Instant>,
}

/// A per-key sliding-window rate limiter.
///
/// Each key tracks an ordered [`RequestLog`] of admitted request times and
/// is checked against the policy supplied with each call. The limiter is
/// thread-safe: checks for the same key are totally ordered, while checks
/// for different keys proceed independently.
pub struct SlidingWindowLimiter {
    /// Request logs indexed by caller-supplied key.
    keys: DashMap<String, RequestLog>,
}

impl SlidingWindowLimiter {
    /// Create a new limiter with no tracked keys.
    pub fn new() -> Self {
        Self {
            keys: DashMap::new(),
        }
    }

    /// Check whether a request for `key` is admitted under `policy`.
    ///
    /// On admission the current time is appended to the key's log. On
    /// denial the log is left untouched and the decision carries the time
    /// until the oldest entry ages out.
    pub fn check(&self, key: &str, policy: Policy) -> Result<Decision> {
        self.check_at(key, policy, Instant::now())
    }

    /// Check `key` against `policy` as of `now`.
    ///
    /// This is the deterministic-clock variant of [`check`]: callers supply
    /// the observation time instead of reading the system clock. The `now`
    /// values passed for a given key must not move backwards, or the log's
    /// ordering invariant breaks.
    ///
    /// [`check`]: SlidingWindowLimiter::check
    pub fn check_at(&self, key: &str, policy: Policy, now: Instant) -> Result<Decision> {
        policy.validate()?;

        trace!(
            key = %key,
            limit = policy.max_requests,
            window = ?policy.window,
            "Checking rate limit"
        );

        // Hold the map entry for the whole prune/compare/append sequence so
        // concurrent checks on the same key cannot oversell the quota.
        let mut log = self.keys.entry(key.to_string()).or_insert_with(|| {
            debug!(key = %key, "Tracking new key");
            RequestLog::new()
        });

        log.prune(now, policy.window);

        if log.len() < policy.max_requests as usize {
            log.record(now);
            let remaining = policy.max_requests.saturating_sub(log.len() as u32);
            return Ok(Decision::admitted(remaining));
        }

        let retry_after = match log.oldest() {
            Some(oldest) => oldest
                .checked_add(policy.window)
                .map(|frees_at| frees_at.saturating_duration_since(now))
                .unwrap_or(Duration::MAX),
            // Empty log yet nothing admitted: the quota is zero and no
            // amount of waiting changes the outcome.
            None => Duration::ZERO,
        };

        debug!(
            key = %key,
            limit = policy.max_requests,
            retry_after = ?retry_after,
            "Rate limit exceeded"
        );

        Ok(Decision::denied(retry_after))
    }

    /// Forget `key` entirely, as if it had never been checked.
    ///
    /// Resetting an untracked key is a no-op.
    pub fn reset(&self, key: &str) {
        if self.keys.remove(key).is_some() {
            debug!(key = %key, "Reset key");
        }
    }

    /// Forget every tracked key.
    pub fn reset_all(&self) {
        debug!(keys = self.keys.len(), "Resetting all keys");
        self.keys.clear();
    }

    /// Raw, unexpired view of `key`'s log, or `None` if the key was never
    /// checked (or has been reset).
    ///
    /// This never mutates state: entries older than any window remain
    /// visible until the next check on the key prunes them.
    pub fn status(&self, key: &str) -> Option<KeyStatus> {
        self.keys.get(key).map(|log| KeyStatus {
            count: log.len(),
            requests: log.snapshot(),
        })
    }

    /// Number of distinct keys currently tracked, including keys whose
    /// entries have all expired but were never reset.
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}
