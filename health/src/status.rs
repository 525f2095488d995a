//! Effective lifecycle status
//!
//! The stored status is only trusted for terminal states. Everything else is
//! recomputed from progress and activity recency:
//!
//! 1. `progress >= 100`                       -> completed
//! 2. stored `cancelled` / `archived`         -> unchanged
//! 3. no reports                              -> on-hold
//! 4. latest report within the recency window -> in-progress, else on-hold

use crate::labels::ProjectStatus;
use crate::record::ActivityReport;
use crate::timestamp::normalize;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Progress percentage at which a project counts as completed
pub const COMPLETION_THRESHOLD: f64 = 100.0;

/// How recently a project was worked on, relative to the recency window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityState {
    /// Latest report is within the window
    Active,
    /// Latest report is older than the window
    Stale,
    /// No reports at all
    NoActivity,
}

/// Most recent `updated_at` across all reports.
///
/// Malformed timestamps normalize to the epoch origin and therefore never win
/// against a well-formed one.
pub fn latest_activity(reports: &[ActivityReport]) -> Option<DateTime<Utc>> {
    reports.iter().map(|r| normalize(&r.updated_at)).max()
}

/// Classify activity recency. The window bound is inclusive.
pub fn activity_state(
    reports: &[ActivityReport],
    now: DateTime<Utc>,
    window: Duration,
) -> ActivityState {
    match latest_activity(reports) {
        None => ActivityState::NoActivity,
        Some(latest) if now - latest <= window => ActivityState::Active,
        Some(_) => ActivityState::Stale,
    }
}

/// Whether a progress value marks the project as completed
pub fn is_completed(progress: f64) -> bool {
    progress >= COMPLETION_THRESHOLD
}

/// Derive the status a project should be displayed with
pub fn derive_status(
    stored: &ProjectStatus,
    progress: f64,
    reports: &[ActivityReport],
    now: DateTime<Utc>,
    window: Duration,
) -> ProjectStatus {
    if is_completed(progress) {
        return ProjectStatus::Completed;
    }
    if stored.is_sticky() {
        return stored.clone();
    }
    match activity_state(reports, now, window) {
        ActivityState::Active => ProjectStatus::InProgress,
        ActivityState::Stale | ActivityState::NoActivity => ProjectStatus::OnHold,
    }
}
