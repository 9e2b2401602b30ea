use serde::{Deserialize, Serialize};

/// Per-provider key rotation and cooldown policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPoolConfig {
    /// Consecutive failures before a key is placed in cooldown.
    #[serde(default = "d_failure_threshold")]
    pub failure_threshold: u32,
    /// Cooldown duration in seconds after tripping `failure_threshold`.
    #[serde(default = "d_cooldown_secs")]
    pub cooldown_secs: u64,
    /// Cooldown duration in seconds after a 429 / quota-exhausted response.
    #[serde(default = "d_quota_cooldown_secs")]
    pub quota_cooldown_secs: u64,
    /// Daily token budget per key. `None` disables the cap.
    #[serde(default)]
    pub daily_token_budget: Option<u64>,
    /// Rotation strategy across keys within a provider.
    #[serde(default)]
    pub rotation: KeyRotationStrategy,
}

impl Default for KeyPoolConfig {
    fn default() -> Self {
        Self {
            failure_threshold: d_failure_threshold(),
            cooldown_secs: d_cooldown_secs(),
            quota_cooldown_secs: d_quota_cooldown_secs(),
            daily_token_budget: None,
            rotation: KeyRotationStrategy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRotationStrategy {
    /// Always try keys in the order they were configured.
    #[default]
    Ordered,
    /// Start from the least-recently-used key.
    RoundRobin,
}

fn d_failure_threshold() -> u32 {
    3
}
fn d_cooldown_secs() -> u64 {
    60
}
fn d_quota_cooldown_secs() -> u64 {
    3600
}
