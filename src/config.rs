//! Policy configuration for scoped limiters.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FloodgateError, Result};
use crate::limiter::Policy;

/// Time unit for configured rate limit rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    /// Get the duration of this time unit.
    pub fn duration(&self) -> Duration {
        match self {
            TimeUnit::Second => Duration::from_secs(1),
            TimeUnit::Minute => Duration::from_secs(60),
            TimeUnit::Hour => Duration::from_secs(3600),
            TimeUnit::Day => Duration::from_secs(86400),
        }
    }
}

/// A configured rate limit rule: requests allowed per unit of time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Number of requests allowed per unit
    #[serde(default = "default_requests_per_unit")]
    pub requests_per_unit: u32,

    /// The time unit for the limit
    #[serde(default = "default_unit")]
    pub unit: TimeUnit,
}

impl PolicyRule {
    /// Convert the rule into a checkable policy.
    pub fn policy(&self) -> Policy {
        Policy::new(self.unit.duration(), self.requests_per_unit)
    }
}

impl Default for PolicyRule {
    fn default() -> Self {
        Self {
            requests_per_unit: default_requests_per_unit(),
            unit: default_unit(),
        }
    }
}

fn default_requests_per_unit() -> u32 {
    1000
}

fn default_unit() -> TimeUnit {
    TimeUnit::Second
}

/// Scope-to-policy configuration for a scoped limiter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LimiterConfig {
    /// Policy applied to scopes without a specific rule
    #[serde(default)]
    pub default_policy: PolicyRule,

    /// Rules keyed by scope name
    #[serde(default)]
    pub scopes: HashMap<String, PolicyRule>,
}

impl LimiterConfig {
    /// Create a configuration holding only the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading limiter configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| FloodgateError::Config(format!("Failed to parse limiter config: {}", e)))
    }

    /// Resolve the policy for a scope, falling back to the default.
    pub fn policy_for(&self, scope: &str) -> Policy {
        self.scopes
            .get(scope)
            .unwrap_or(&self.default_policy)
            .policy()
    }
}
