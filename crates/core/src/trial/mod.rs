//! Free-trial evaluation.
//!
//! An organization gets a trial window counted from its creation, unless an
//! explicit end was stored for it. Once the window closes, creating new
//! resources requires an active subscription; reads, updates and deletes are
//! never gated.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Serialize;

#[cfg(test)]
mod props;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Trial length policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialPolicy {
    trial_days: i64,
}

impl Default for TrialPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TRIAL_DAYS)
    }
}

/// Outcome of evaluating an organization's trial at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrialStatus {
    /// When the trial ends (or ended).
    pub trial_end: DateTime<Utc>,
    /// `now >= trial_end`.
    pub expired: bool,
    /// Whole days left, rounded up; zero once expired.
    pub remaining_days: i64,
}

impl TrialPolicy {
    /// Trial length used when nothing is configured.
    pub const DEFAULT_TRIAL_DAYS: i64 = 7;

    /// Creates a policy granting `trial_days` days from organization creation.
    #[must_use]
    pub const fn new(trial_days: i64) -> Self {
        Self { trial_days }
    }

    /// Configured trial length in days.
    #[must_use]
    pub const fn trial_days(&self) -> i64 {
        self.trial_days
    }

    /// Resolves the trial end: the explicit end when present, otherwise
    /// creation plus the trial length.
    #[must_use]
    pub fn trial_end(
        &self,
        created_at: DateTime<Utc>,
        trial_ends_at: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        trial_ends_at.unwrap_or_else(|| created_at + Duration::days(self.trial_days))
    }

    /// Evaluates the trial at `now`.
    #[must_use]
    pub fn evaluate(
        &self,
        created_at: DateTime<Utc>,
        trial_ends_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> TrialStatus {
        let trial_end = self.trial_end(created_at, trial_ends_at);
        let left_ms = (trial_end - now).num_milliseconds();

        TrialStatus {
            trial_end,
            expired: now >= trial_end,
            remaining_days: if left_ms > 0 {
                (left_ms + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY
            } else {
                0
            },
        }
    }

    /// Evaluates the trial from raw stored timestamps.
    ///
    /// Returns `None` ("no organization data") when `created_at` is missing or
    /// unparsable. An unparsable explicit end is ignored in favour of the
    /// default window.
    #[must_use]
    pub fn evaluate_raw(
        &self,
        created_at: Option<&str>,
        trial_ends_at: Option<&str>,
        now: DateTime<Utc>,
    ) -> Option<TrialStatus> {
        let created_at = created_at.and_then(parse_timestamp)?;
        let trial_ends_at = trial_ends_at.and_then(parse_timestamp);
        Some(self.evaluate(created_at, trial_ends_at, now))
    }
}

impl TrialStatus {
    /// Whether creating a new resource must be refused.
    ///
    /// Only an expired trial without an active subscription blocks.
    #[must_use]
    pub const fn blocks_creation(&self, subscription_active: bool) -> bool {
        self.expired && !subscription_active
    }
}

/// Whether an organization may create resources given its (optional) trial
/// status. Organizations without trial data are never blocked.
#[must_use]
pub fn can_create(status: Option<&TrialStatus>, subscription_active: bool) -> bool {
    status.is_none_or(|s| !s.blocks_creation(subscription_active))
}

/// Parses the timestamp shapes the store emits.
///
/// Accepts RFC 3339 (`2025-01-10T12:00:00Z`, `...+00:00`), the Postgres text
/// form (`2025-01-10 12:00:00.123+00`) and zone-less date-times, which are
/// read as UTC.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(ts) = DateTime::parse_from_str(raw, fmt) {
            return Some(ts.with_timezone(&Utc));
        }
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
