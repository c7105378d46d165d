//! Scope-aware limiter resolving policies from configuration.

use std::time::Instant;

use parking_lot::RwLock;
use tracing::{info, trace};

use crate::config::LimiterConfig;
use crate::error::Result;

use super::policy::Decision;
use super::sliding::SlidingWindowLimiter;

/// A limiter that resolves policies by scope from a [`LimiterConfig`].
///
/// Scopes name classes of traffic ("login", "search") and map to configured
/// policies; unknown scopes fall back to the default policy. State is kept
/// per `scope:key` pair, so the same client key is limited independently in
/// each scope. The configuration can be replaced at runtime without
/// dropping collected state.
pub struct ScopedLimiter {
    /// Core limiter holding per-key state under `scope:key` composite keys.
    limiter: SlidingWindowLimiter,
    /// Scope-to-policy configuration.
    config: RwLock<LimiterConfig>,
}

impl ScopedLimiter {
    /// Create a scoped limiter with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LimiterConfig::default())
    }

    /// Create a scoped limiter with the given configuration.
    pub fn with_config(config: LimiterConfig) -> Self {
        Self {
            limiter: SlidingWindowLimiter::new(),
            config: RwLock::new(config),
        }
    }

    /// Replace the configuration.
    ///
    /// Later checks resolve against the new policies; already collected
    /// request logs are retained.
    pub fn set_config(&self, config: LimiterConfig) {
        let mut current = self.config.write();
        *current = config;
        info!("Limiter configuration updated");
    }

    /// Get a copy of the current configuration.
    pub fn config(&self) -> LimiterConfig {
        self.config.read().clone()
    }

    /// Check whether a request for `key` within `scope` is admitted.
    pub fn check(&self, scope: &str, key: &str) -> Result<Decision> {
        let policy = self.config.read().policy_for(scope);
        trace!(scope = %scope, key = %key, "Checking scoped rate limit");
        self.limiter
            .check_at(&format!("{}:{}", scope, key), policy, Instant::now())
    }

    /// Access the underlying limiter for status and reset operations.
    ///
    /// Entries are keyed by the composite `scope:key` form.
    pub fn limiter(&self) -> &SlidingWindowLimiter {
        &self.limiter
    }
}

impl Default for ScopedLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PolicyRule, TimeUnit};

    fn test_config() -> LimiterConfig {
        let yaml = r#"
default_policy:
  requests_per_unit: 100
  unit: second
scopes:
  login:
    requests_per_unit: 2
    unit: minute
"#;
        LimiterConfig::from_yaml(yaml).unwrap()
    }

    #[test]
    fn test_scope_rule_applies() {
        let limiter = ScopedLimiter::with_config(test_config());

        assert!(limiter.check("login", "10.0.0.1").unwrap().allowed);
        assert!(limiter.check("login", "10.0.0.1").unwrap().allowed);
        assert!(!limiter.check("login", "10.0.0.1").unwrap().allowed);
    }

    #[test]
    fn test_unknown_scope_uses_default() {
        let limiter = ScopedLimiter::with_config(test_config());

        let decision = limiter.check("search", "10.0.0.1").unwrap();

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 99);
    }

    #[test]
    fn test_scopes_partition_keys() {
        let limiter = ScopedLimiter::with_config(test_config());

        assert!(limiter.check("login", "10.0.0.1").unwrap().allowed);
        assert!(limiter.check("login", "10.0.0.1").unwrap().allowed);
        assert!(!limiter.check("login", "10.0.0.1").unwrap().allowed);

        // Same client key under a different scope is unaffected.
        assert!(limiter.check("signup", "10.0.0.1").unwrap().allowed);
    }

    #[test]
    fn test_set_config_applies_to_later_checks() {
        let limiter = ScopedLimiter::new();
        assert!(limiter.check("login", "10.0.0.1").unwrap().allowed);

        let mut config = LimiterConfig::new();
        config.scopes.insert(
            "login".to_string(),
            PolicyRule {
                requests_per_unit: 0,
                unit: TimeUnit::Minute,
            },
        );
        limiter.set_config(config);

        assert!(!limiter.check("login", "10.0.0.1").unwrap().allowed);
        assert_eq!(limiter.config().scopes.len(), 1);
    }

    #[test]
    fn test_state_is_keyed_by_scope_and_key() {
        let limiter = ScopedLimiter::with_config(test_config());

        limiter.check("login", "10.0.0.1").unwrap();

        let status = limiter.limiter().status("login:10.0.0.1").unwrap();
        assert_eq!(status.count, 1);
    }
}
