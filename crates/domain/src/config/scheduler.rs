use serde::{Deserialize, Serialize};

/// Leader election and background job cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Identity of this process instance in the lock table.
    #[serde(default = "d_instance_id")]
    pub instance_id: String,
    /// Lease TTL in seconds. A lease not renewed within this window is
    /// considered abandoned and may be claimed by another instance.
    #[serde(default = "d_lease_ttl_secs")]
    pub lease_ttl_secs: u64,
    /// How often the leader renews its lease, in seconds. Should be well
    /// under `lease_ttl_secs` to tolerate missed ticks.
    #[serde(default = "d_renew_interval_secs")]
    pub renew_interval_secs: u64,
    /// How often a non-leader instance polls to attempt acquisition.
    #[serde(default = "d_poll_interval_secs")]
    pub poll_interval_secs: u64,
    /// Per-job overrides.
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
    /// Soft-signal confidence lost per day of staleness in the Decay job.
    #[serde(default = "d_decay_rate_per_day")]
    pub decay_rate_per_day: f64,
    /// Confidence below which a soft-signal fact moves to DEPRECATED.
    #[serde(default = "d_decay_floor")]
    pub decay_floor: f64,
    /// Default gate applied before ObserverBatch/DueScannerBatch emit a
    /// notification, absent a per-user override.
    #[serde(default)]
    pub notifications: NotificationGateConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            instance_id: d_instance_id(),
            lease_ttl_secs: d_lease_ttl_secs(),
            renew_interval_secs: d_renew_interval_secs(),
            poll_interval_secs: d_poll_interval_secs(),
            jobs: Vec::new(),
            decay_rate_per_day: d_decay_rate_per_day(),
            decay_floor: d_decay_floor(),
            notifications: NotificationGateConfig::default(),
        }
    }
}

/// Default opt-in/quiet-hours/fatigue policy for proactive notifications.
/// A user's own prefs (see glossary `User.notification prefs`) override
/// these per-field; this is the fallback when a user has no override set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationGateConfig {
    /// Whether proactive notifications are emitted at all absent a
    /// per-user opt-in/opt-out.
    #[serde(default = "d_notifications_enabled")]
    pub enabled_by_default: bool,
    /// Quiet-hours window start, `HH:MM`, local to the user's timezone.
    /// `None` disables quiet-hours suppression.
    #[serde(default)]
    pub quiet_hours_start: Option<String>,
    /// Quiet-hours window end, `HH:MM`. A window where `end < start`
    /// wraps past midnight (e.g. `22:00`-`08:00`).
    #[serde(default)]
    pub quiet_hours_end: Option<String>,
    /// Maximum notifications per user per day before further ones are
    /// suppressed as fatigue.
    #[serde(default = "d_max_notifications_per_day")]
    pub max_notifications_per_day: u32,
}

impl Default for NotificationGateConfig {
    fn default() -> Self {
        Self {
            enabled_by_default: d_notifications_enabled(),
            quiet_hours_start: None,
            quiet_hours_end: None,
            max_notifications_per_day: d_max_notifications_per_day(),
        }
    }
}

fn d_notifications_enabled() -> bool {
    true
}
fn d_max_notifications_per_day() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    /// Base interval in seconds between runs.
    pub interval_secs: u64,
    /// Random jitter added to the interval, in seconds, to avoid thundering
    /// herds across a fleet.
    #[serde(default = "d_jitter_secs")]
    pub jitter_secs: u64,
    /// Whether this job only runs on the elected leader.
    #[serde(default = "d_leader_only")]
    pub leader_only: bool,
}

fn d_instance_id() -> String {
    "sa-instance".into()
}
fn d_lease_ttl_secs() -> u64 {
    90
}
fn d_renew_interval_secs() -> u64 {
    10
}
fn d_poll_interval_secs() -> u64 {
    30
}
fn d_jitter_secs() -> u64 {
    3
}
fn d_leader_only() -> bool {
    true
}
fn d_decay_rate_per_day() -> f64 {
    0.05
}
fn d_decay_floor() -> f64 {
    0.1
}
