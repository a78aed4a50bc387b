//! What a recurring rule turns into on a given day.
//!
//! The decision is pure; the store applies it inside one transaction that
//! also compare-and-swaps the rule's cursor, so a second run on the same day
//! finds the cursor already moved and materializes nothing.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use super::frequency::Frequency;
use super::schedule::advance_anchored;

/// The parts of a stored rule that drive materialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSnapshot {
    /// Rule ID.
    pub id: Uuid,
    /// Stored frequency string.
    pub frequency: String,
    /// First occurrence; its day-of-month anchors month arithmetic.
    pub start_date: NaiveDate,
    /// Next occurrence to materialize.
    pub next_run_date: NaiveDate,
    /// Last day an occurrence may fall on.
    pub end_date: Option<NaiveDate>,
    /// Whether the rule is active.
    pub is_active: bool,
}

/// One occurrence to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Due date of the created entry (the rule's cursor).
    pub due_date: NaiveDate,
    /// Bookkeeping date of the created entry (the run day).
    pub entry_date: NaiveDate,
    /// Cursor value after this occurrence.
    pub next_run_date: NaiveDate,
    /// The advanced cursor passed the rule's end date.
    pub deactivate: bool,
}

/// What to do with a rule on a run day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Inactive rule.
    Inactive,
    /// Cursor is after the run day.
    NotDue,
    /// The due occurrence falls after the end date; deactivate without
    /// materializing.
    Ended,
    /// Stored frequency is unknown; the cursor could never advance.
    UnknownFrequency,
    /// Create one pending entry and move the cursor.
    Materialize(Occurrence),
}

/// Decides what the rule yields on `today`.
#[must_use]
pub fn decide(rule: &RuleSnapshot, today: NaiveDate) -> Decision {
    if !rule.is_active {
        return Decision::Inactive;
    }
    if rule.next_run_date > today {
        return Decision::NotDue;
    }
    if rule.end_date.is_some_and(|end| end < rule.next_run_date) {
        return Decision::Ended;
    }
    let Ok(frequency) = rule.frequency.parse::<Frequency>() else {
        return Decision::UnknownFrequency;
    };

    let next_run_date = advance_anchored(rule.next_run_date, frequency, rule.start_date.day());
    Decision::Materialize(Occurrence {
        due_date: rule.next_run_date,
        entry_date: today,
        next_run_date,
        deactivate: rule.end_date.is_some_and(|end| next_run_date > end),
    })
}

/// Per-rule result of a materializer run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// One entry was created; `deactivated` if the rule ended with it.
    Created {
        /// The rule was deactivated in the same transaction.
        deactivated: bool,
    },
    /// The rule ended before its due occurrence and was deactivated.
    Deactivated,
    /// Another run already claimed the occurrence, or the frequency is
    /// unknown.
    Skipped,
    /// The store failed; retried on the next run while still due.
    Failed,
}

/// Counters reported by a materializer run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Rules found due.
    pub due: usize,
    /// Entries created.
    pub created: usize,
    /// Rules skipped (already claimed or unknown frequency).
    pub skipped: usize,
    /// Rules whose processing failed.
    pub failed: usize,
    /// Rules deactivated.
    pub deactivated: usize,
}

impl RunReport {
    /// Accounts for one processed rule.
    pub fn record(&mut self, outcome: RunOutcome) {
        self.due += 1;
        match outcome {
            RunOutcome::Created { deactivated } => {
                self.created += 1;
                if deactivated {
                    self.deactivated += 1;
                }
            }
            RunOutcome::Deactivated => self.deactivated += 1,
            RunOutcome::Skipped => self.skipped += 1,
            RunOutcome::Failed => self.failed += 1,
        }
    }
}
