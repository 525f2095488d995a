//! Fleet-wide aggregate statistics
//!
//! Computed over the full, unfiltered collection. Counts that depend on
//! activity use [`activity_state`] so they agree with the status deriver.

use crate::config::HealthConfig;
use crate::labels::{IssueType, ProjectStatus};
use crate::record::ProjectRecord;
use crate::status::{ActivityState, activity_state, is_completed};
use crate::timestamp::normalize;
use crate::view::ProjectView;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Dashboard summary of the whole project collection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub total: usize,
    /// `progress >= 100`
    pub completed: usize,
    /// No reports, or latest report older than the recency window
    pub on_hold: usize,
    /// Latest report within the recency window
    pub in_progress: usize,
    /// Effective status `planning`
    pub planning: usize,
    /// Effective status `approved`
    pub approved: usize,
    /// Estimated end date already passed
    pub overdue: usize,
    /// At least one unresolved safety issue
    pub high_risk: usize,
    /// Stored risk labels; unset labels are not counted
    pub risk_distribution: BTreeMap<String, usize>,
    /// Stored health labels
    pub health_distribution: BTreeMap<String, usize>,
    pub phase_distribution: BTreeMap<String, usize>,
    /// Mean quality score, one decimal
    pub average_quality_score: f64,
    pub total_budget: f64,
    pub total_actual_cost: f64,
    /// `total_actual_cost - total_budget`
    pub budget_variance: f64,
    /// Variance as a percentage of the total budget
    pub budget_variance_pct: Option<f64>,
    /// Unresolved quality and progress issues across all projects
    pub open_quality_progress_issues: usize,
}

/// Reduce a collection to aggregate statistics.
///
/// `views` are expected to be built from `records` in the same order; the
/// distributions read raw labels from `records`, scores and effective status
/// from `views`. Inputs are paired positionally and any unpaired tail is
/// ignored.
pub fn compute_stats(
    records: &[ProjectRecord],
    views: &[ProjectView],
    now: DateTime<Utc>,
    cfg: &HealthConfig,
) -> AggregateStats {
    if records.len() != views.len() {
        tracing::warn!(
            records = records.len(),
            views = views.len(),
            "Record and view counts differ; aggregating paired entries only"
        );
    }

    let window = cfg.activity.recency_window();
    let mut stats = AggregateStats::default();
    let mut score_sum = 0.0;

    for (record, view) in records.iter().zip(views) {
        stats.total += 1;

        if is_completed(record.progress) {
            stats.completed += 1;
        }
        match activity_state(&record.reports, now, window) {
            ActivityState::Active => stats.in_progress += 1,
            ActivityState::Stale | ActivityState::NoActivity => stats.on_hold += 1,
        }
        match view.effective_status {
            ProjectStatus::Planning => stats.planning += 1,
            ProjectStatus::Approved => stats.approved += 1,
            _ => {}
        }
        if record
            .estimated_end_date
            .as_ref()
            .is_some_and(|end| normalize(end) < now)
        {
            stats.overdue += 1;
        }
        if record
            .unresolved_issues()
            .any(|i| i.issue_type == IssueType::Safety)
        {
            stats.high_risk += 1;
        }

        if let Some(risk) = record.risk_level_stored.as_deref() {
            count_label(&mut stats.risk_distribution, risk);
        }
        count_label(&mut stats.health_distribution, record.health_level.as_str());
        count_label(&mut stats.phase_distribution, &record.phase);

        stats.total_budget += record.estimated_budget;
        stats.total_actual_cost += record.actual_budget.unwrap_or_default();

        score_sum += view.quality_score;
        stats.open_quality_progress_issues += view.quality_or_progress_issue_count;
    }

    if stats.total > 0 {
        stats.average_quality_score = round_to_tenth(score_sum / stats.total as f64);
    }
    stats.budget_variance = stats.total_actual_cost - stats.total_budget;
    if stats.total_budget != 0.0 {
        stats.budget_variance_pct = Some(stats.budget_variance * 100.0 / stats.total_budget);
    }

    stats
}

// Unset (empty) labels are not counted.
fn count_label(distribution: &mut BTreeMap<String, usize>, label: &str) {
    if !label.trim().is_empty() {
        *distribution.entry(label.to_string()).or_default() += 1;
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
