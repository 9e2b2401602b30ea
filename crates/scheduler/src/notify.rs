//! Gate on whether ObserverBatch/DueScannerBatch may emit a notification
//! for a user on this pass: opt-in, quiet hours, then a daily fatigue cap,
//! each checked in order and short-circuiting on the first block.

use chrono::NaiveTime;
use sa_domain::config::NotificationGateConfig;

/// Why a notification was (or wasn't) allowed through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Disabled,
    QuietHours,
    Fatigue { daily_count: u32 },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }
}

/// `now` must already be converted to the user's local timezone; this
/// function does no timezone handling itself.
pub fn should_emit(
    config: &NotificationGateConfig,
    notifications_enabled: bool,
    now_local: chrono::NaiveDateTime,
    daily_count: u32,
) -> GateDecision {
    if !notifications_enabled {
        return GateDecision::Disabled;
    }

    if let (Some(start), Some(end)) = (&config.quiet_hours_start, &config.quiet_hours_end) {
        if let (Some(start), Some(end)) = (parse_hm(start), parse_hm(end)) {
            if within_range(now_local.time(), start, end) {
                return GateDecision::QuietHours;
            }
        }
    }

    if daily_count >= config.max_notifications_per_day {
        return GateDecision::Fatigue { daily_count };
    }

    GateDecision::Allowed
}

fn parse_hm(s: &str) -> Option<NaiveTime> {
    let (h, m) = s.split_once(':')?;
    NaiveTime::from_hms_opt(h.parse().ok()?, m.parse().ok()?, 0)
}

fn within_range(now: NaiveTime, start: NaiveTime, end: NaiveTime) -> bool {
    if start <= end {
        now >= start && now <= end
    } else {
        // Window wraps past midnight, e.g. 22:00-08:00.
        now >= start || now <= end
    }
}
