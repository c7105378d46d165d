//! Rate limit policies and admission decisions.

use std::time::Duration;

use crate::error::{FloodgateError, Result};

/// A rate limit policy: how many requests are admitted per sliding window.
///
/// Policies are supplied with every check, so different call sites can hold
/// the same key to different limits. The policy supplied on a check also
/// governs how that key's existing entries are expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Length of the sliding window.
    pub window: Duration,
    /// Maximum requests admitted within the window. Zero admits nothing.
    pub max_requests: u32,
}

impl Policy {
    /// Create a policy from a window length and request quota.
    pub const fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
        }
    }

    /// Policy admitting `max_requests` per second.
    pub const fn per_second(max_requests: u32) -> Self {
        Self::new(Duration::from_secs(1), max_requests)
    }

    /// Policy admitting `max_requests` per minute.
    pub const fn per_minute(max_requests: u32) -> Self {
        Self::new(Duration::from_secs(60), max_requests)
    }

    /// Policy admitting `max_requests` per hour.
    pub const fn per_hour(max_requests: u32) -> Self {
        Self::new(Duration::from_secs(3600), max_requests)
    }

    /// Policy admitting `max_requests` per day.
    pub const fn per_day(max_requests: u32) -> Self {
        Self::new(Duration::from_secs(86400), max_requests)
    }

    /// Validate that the policy is well-formed.
    ///
    /// A zero-length window could never retain or expire anything
    /// meaningfully, so it is rejected rather than clamped.
    pub fn validate(&self) -> Result<()> {
        if self.window.is_zero() {
            return Err(FloodgateError::InvalidPolicy(
                "window must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// The outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Whether the request may proceed.
    pub allowed: bool,
    /// Requests left in the window after this decision.
    pub remaining: u32,
    /// Time until the oldest tracked request ages out and frees a slot.
    /// Zero when allowed, and zero when the policy admits nothing at all
    /// (waiting cannot help).
    pub retry_after: Duration,
}

impl Decision {
    /// An admitted request with `remaining` slots left in the window.
    pub const fn admitted(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after: Duration::ZERO,
        }
    }

    /// A denied request that may succeed after `retry_after`.
    pub const fn denied(retry_after: Duration) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after,
        }
    }
}
