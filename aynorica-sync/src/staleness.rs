//! Relative-time formatting and registry staleness.
//!
//! `elapsed` buckets (minutes floor-divided):
//! 1. `< 1 min` → `just now` (future timestamps land here too)
//! 2. `< 60 min` → `{m}m ago`
//! 3. `< 24 h` → `{h}h ago`
//! 4. otherwise → `{d}d ago`

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use aynorica_core::{NodeId, Registry};

pub const UNKNOWN: &str = "unknown";
pub const STALE_AFTER_HOURS: i64 = 24;

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (`2025-06-01T10:00:00Z`, offsets), offset-less date-times
/// (taken as UTC) and bare dates (UTC midnight).
pub fn parse_timestamp(iso: &str) -> Option<DateTime<Utc>> {
    let iso = iso.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(iso) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(iso, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `now - iso` as a short relative string, or `unknown` if `iso` does not parse.
pub fn elapsed(iso: &str, now: DateTime<Utc>) -> String {
    match parse_timestamp(iso) {
        Some(then) => format_elapsed_ms(now.signed_duration_since(then).num_milliseconds()),
        None => UNKNOWN.to_string(),
    }
}

/// [`elapsed`] against the wall clock.
pub fn format_time_since(iso: &str) -> String {
    elapsed(iso, Utc::now())
}

fn format_elapsed_ms(ms: i64) -> String {
    let minutes = ms.div_euclid(MS_PER_MINUTE);
    if minutes < 1 {
        return "just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    format!("{}d ago", hours / 24)
}

/// Staleness of a single `lastSync` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// Synced within the last 24 h.
    Fresh { hours: i64 },
    /// More than 24 h since the last sync. `hours` is floor-divided.
    Stale { hours: i64 },
    /// `lastSync` did not parse.
    Unknown,
}

impl Staleness {
    pub fn is_stale(&self) -> bool {
        matches!(self, Staleness::Stale { .. })
    }
}

/// Classify `last_sync` relative to `now`.
pub fn check(last_sync: &str, now: DateTime<Utc>) -> Staleness {
    let Some(then) = parse_timestamp(last_sync) else {
        return Staleness::Unknown;
    };
    let ms = now.signed_duration_since(then).num_milliseconds();
    let hours = ms.div_euclid(MS_PER_HOUR);
    if ms > STALE_AFTER_HOURS * MS_PER_HOUR {
        Staleness::Stale { hours }
    } else {
        Staleness::Fresh { hours }
    }
}

/// A stale current node, ready to be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleRegistry {
    pub node: NodeId,
    pub hours: i64,
}

impl StaleRegistry {
    pub fn message(&self) -> String {
        format!(
            "Network registry is {} hours old. Consider refreshing.",
            self.hours
        )
    }
}

/// `Some` when the current node's `lastSync` is older than 24 h.
pub fn check_registry(
    registry: &Registry,
    current: Option<&NodeId>,
    now: DateTime<Utc>,
) -> Option<StaleRegistry> {
    let current = current?;
    let node = registry.node(current)?;
    match check(&node.last_sync, now) {
        Staleness::Stale { hours } => {
            tracing::info!("registry for node '{current}' is {hours}h old");
            Some(StaleRegistry {
                node: current.clone(),
                hours,
            })
        }
        _ => None,
    }
}
