//! Per-provider API key rotation, failure cooldown, and daily quota tracking.
//!
//! Tracks a pool of keys per provider, each carrying its own
//! failure-cooldown state on top of daily token/cost counters reset on UTC
//! date rollover, so [`LlmRouter`]-style callers can rotate away from a key
//! that just 429'd without waiting for the whole provider to cool down.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use sa_domain::config::{KeyPoolConfig, KeyRotationStrategy};
use sa_domain::trace::TraceEvent;

/// Why a key is currently unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CooldownReason {
    ConsecutiveFailures,
    QuotaExhausted,
}

#[derive(Debug, Clone)]
struct KeyState {
    consecutive_failures: u32,
    cooldown_until: Option<DateTime<Utc>>,
    cooldown_reason: Option<CooldownReason>,
    usage_date: NaiveDate,
    tokens_used_today: u64,
    last_used_at: Option<DateTime<Utc>>,
}

impl KeyState {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            consecutive_failures: 0,
            cooldown_until: None,
            cooldown_reason: None,
            usage_date: now.date_naive(),
            tokens_used_today: 0,
            last_used_at: None,
        }
    }

    fn roll_day_if_needed(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        if today != self.usage_date {
            self.usage_date = today;
            self.tokens_used_today = 0;
        }
    }

    fn is_cooling_down(&self, now: DateTime<Utc>) -> bool {
        self.cooldown_until.is_some_and(|until| now < until)
    }
}

/// Point-in-time snapshot of a single key's health, for admin/debug surfaces.
#[derive(Debug, Clone)]
pub struct KeySnapshot {
    pub label: String,
    pub available: bool,
    pub consecutive_failures: u32,
    pub cooldown_until: Option<DateTime<Utc>>,
    pub tokens_used_today: u64,
}

/// Tracks rotation/cooldown/quota state for every key registered under
/// every provider.
pub struct KeyPool {
    config: KeyPoolConfig,
    providers: RwLock<HashMap<String, Vec<String>>>,
    state: RwLock<HashMap<(String, String), KeyState>>,
}

impl KeyPool {
    pub fn new(config: KeyPoolConfig) -> Self {
        Self {
            config,
            providers: RwLock::new(HashMap::new()),
            state: RwLock::new(HashMap::new()),
        }
    }

    /// Register the ordered list of key labels available for a provider.
    /// Safe to call repeatedly (e.g. on config reload); replaces the
    /// provider's key list but preserves existing per-key state.
    pub fn register_keys(&self, provider: &str, labels: Vec<String>) {
        self.providers
            .write()
            .insert(provider.to_string(), labels);
    }

    /// Pick the next available key for a provider, skipping any in cooldown.
    /// Returns `None` when every registered key is cooling down.
    pub fn next_available_key(&self, provider: &str, now: DateTime<Utc>) -> Option<String> {
        let labels = self.providers.read().get(provider)?.clone();
        if labels.is_empty() {
            return None;
        }

        let mut state = self.state.write();
        let mut candidates: Vec<(&String, DateTime<Utc>)> = Vec::new();
        for label in &labels {
            let key = (provider.to_string(), label.clone());
            let entry = state.entry(key).or_insert_with(|| KeyState::fresh(now));
            entry.roll_day_if_needed(now);
            if !entry.is_cooling_down(now) {
                let order_key = entry.last_used_at.unwrap_or(DateTime::<Utc>::MIN_UTC);
                candidates.push((label, order_key));
            }
        }

        match self.config.rotation {
            KeyRotationStrategy::Ordered => candidates.first().map(|(l, _)| (*l).clone()),
            KeyRotationStrategy::RoundRobin => candidates
                .into_iter()
                .min_by_key(|(_, last)| *last)
                .map(|(l, _)| l.clone()),
        }
    }

    /// Record a successful call, clearing failure state and accumulating
    /// today's token usage.
    pub fn record_success(&self, provider: &str, key_label: &str, tokens: u64, now: DateTime<Utc>) {
        let mut state = self.state.write();
        let entry = state
            .entry((provider.to_string(), key_label.to_string()))
            .or_insert_with(|| KeyState::fresh(now));
        entry.roll_day_if_needed(now);
        entry.consecutive_failures = 0;
        entry.cooldown_until = None;
        entry.cooldown_reason = None;
        entry.tokens_used_today += tokens;
        entry.last_used_at = Some(now);

        if let Some(budget) = self.config.daily_token_budget {
            if entry.tokens_used_today >= budget {
                let until = now + chrono::Duration::seconds(self.config.quota_cooldown_secs as i64);
                entry.cooldown_until = Some(until);
                entry.cooldown_reason = Some(CooldownReason::QuotaExhausted);
                TraceEvent::KeyCooldown {
                    provider: provider.to_string(),
                    key_label: key_label.to_string(),
                    reason: "daily_token_budget_exceeded".to_string(),
                    until: until.to_rfc3339(),
                }
                .emit();
            }
        }
    }

    /// Record a failed call. `is_quota` marks a 429/quota-exhausted
    /// response, which cools the key down immediately regardless of the
    /// consecutive-failure threshold.
    pub fn record_failure(&self, provider: &str, key_label: &str, is_quota: bool, now: DateTime<Utc>) {
        let mut state = self.state.write();
        let entry = state
            .entry((provider.to_string(), key_label.to_string()))
            .or_insert_with(|| KeyState::fresh(now));
        entry.roll_day_if_needed(now);
        entry.last_used_at = Some(now);

        if is_quota {
            let until = now + chrono::Duration::seconds(self.config.quota_cooldown_secs as i64);
            entry.cooldown_until = Some(until);
            entry.cooldown_reason = Some(CooldownReason::QuotaExhausted);
            TraceEvent::KeyCooldown {
                provider: provider.to_string(),
                key_label: key_label.to_string(),
                reason: "quota_exhausted".to_string(),
                until: until.to_rfc3339(),
            }
            .emit();
            return;
        }

        entry.consecutive_failures += 1;
        if entry.consecutive_failures >= self.config.failure_threshold {
            let until = now + chrono::Duration::seconds(self.config.cooldown_secs as i64);
            entry.cooldown_until = Some(until);
            entry.cooldown_reason = Some(CooldownReason::ConsecutiveFailures);
            TraceEvent::KeyCooldown {
                provider: provider.to_string(),
                key_label: key_label.to_string(),
                reason: "consecutive_failures".to_string(),
                until: until.to_rfc3339(),
            }
            .emit();
        }
    }

    /// Snapshot every key registered for a provider, for admin/debug display.
    pub fn snapshot(&self, provider: &str, now: DateTime<Utc>) -> Vec<KeySnapshot> {
        let labels = self
            .providers
            .read()
            .get(provider)
            .cloned()
            .unwrap_or_default();
        let state = self.state.read();
        labels
            .into_iter()
            .map(|label| {
                let key = (provider.to_string(), label.clone());
                match state.get(&key) {
                    Some(s) => KeySnapshot {
                        label,
                        available: !s.is_cooling_down(now),
                        consecutive_failures: s.consecutive_failures,
                        cooldown_until: s.cooldown_until,
                        tokens_used_today: s.tokens_used_today,
                    },
                    None => KeySnapshot {
                        label,
                        available: true,
                        consecutive_failures: 0,
                        cooldown_until: None,
                        tokens_used_today: 0,
                    },
                }
            })
            .collect()
    }
}
