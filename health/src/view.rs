//! Derived per-project views
//!
//! A [`ProjectView`] is rebuilt from its [`ProjectRecord`] on every pass and
//! never mutated afterwards. It carries the derived health fields, the
//! display passthrough fields, and the precomputed search text and sort ranks
//! the query engine works from.

use crate::config::HealthConfig;
use crate::errors::Degradation;
use crate::labels::{HealthLevel, Priority, ProjectStatus, RiskLevel};
use crate::quality::assess_quality;
use crate::record::ProjectRecord;
use crate::risk::classify_risk;
use crate::status::{derive_status, latest_activity};
use crate::timestamp::{Timestamp, normalize};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Ordinal ranks used for sorting, from the tables in [`crate::labels`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SortKeys {
    pub priority: u8,
    pub risk: u8,
    pub health: u8,
}

/// Read-only derived view of one project
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,

    // Derived
    pub effective_status: ProjectStatus,
    pub effective_risk_level: RiskLevel,
    pub quality_score: f64,
    pub quality_deduction: f64,
    pub quality_or_progress_issue_count: usize,
    pub open_issue_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_activity: Option<DateTime<Utc>>,

    // Passthrough
    pub stored_status: ProjectStatus,
    pub progress: f64,
    pub priority: Priority,
    pub health_level: HealthLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level_stored: Option<String>,
    pub phase: String,
    pub manager: String,
    pub region: String,
    pub project_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_end_date: Option<DateTime<Utc>>,
    /// Creation time; the epoch origin when the record has none
    pub created_at: DateTime<Utc>,
    pub estimated_budget: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_budget: Option<f64>,

    // Query support
    #[serde(skip)]
    pub search_text: String,
    pub sort_keys: SortKeys,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Degradation>,
}

/// Build the view for one record
pub fn build_view(record: &ProjectRecord, now: DateTime<Utc>, cfg: &HealthConfig) -> ProjectView {
    let mut warnings = Vec::new();

    let start_date = normalize_field(record.start_date.as_ref(), "startDate", &mut warnings);
    let estimated_end_date = normalize_field(
        record.estimated_end_date.as_ref(),
        "estimatedEndDate",
        &mut warnings,
    );
    let created_at = normalize_field(record.created_at.as_ref(), "createdAt", &mut warnings)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    if record
        .reports
        .iter()
        .any(|r| r.updated_at.to_instant().is_none())
    {
        warnings.push(Degradation::MalformedTimestamp {
            field: "reports.updatedAt",
        });
    }

    check_label(
        "status",
        record.stored_status.is_known(),
        record.stored_status.as_str(),
        &mut warnings,
    );
    check_label(
        "priority",
        record.priority.is_known(),
        record.priority.as_str(),
        &mut warnings,
    );
    check_label(
        "healthLevel",
        record.health_level.is_known(),
        record.health_level.as_str(),
        &mut warnings,
    );
    for issue in &record.issues {
        check_label(
            "issues.type",
            issue.issue_type.is_known(),
            issue.issue_type.as_str(),
            &mut warnings,
        );
        check_label(
            "issues.status",
            issue.status.is_known(),
            issue.status.as_str(),
            &mut warnings,
        );
    }

    let assessment = assess_quality(record.quality_score_base, &record.issues, &cfg.quality);
    let effective_risk_level = classify_risk(assessment.final_score, &cfg.risk);
    let effective_status = derive_status(
        &record.stored_status,
        record.progress,
        &record.reports,
        now,
        cfg.activity.recency_window(),
    );

    for warning in &warnings {
        tracing::debug!(
            project_id = %record.id,
            code = warning.code(),
            %warning,
            "Recovered malformed project data"
        );
    }

    ProjectView {
        id: record.id.clone(),
        name: record.name.clone(),
        contract_id: record.contract_id.clone(),
        sort_keys: SortKeys {
            priority: record.priority.rank(),
            risk: effective_risk_level.rank(),
            health: record.health_level.rank(),
        },
        search_text: search_text(record),
        effective_status,
        effective_risk_level,
        quality_score: assessment.final_score,
        quality_deduction: assessment.total_deduction,
        quality_or_progress_issue_count: assessment.quality_or_progress_issue_count,
        open_issue_count: record.unresolved_issues().count(),
        latest_activity: latest_activity(&record.reports),
        stored_status: record.stored_status.clone(),
        progress: record.progress,
        priority: record.priority.clone(),
        health_level: record.health_level.clone(),
        risk_level_stored: record.risk_level_stored.clone(),
        phase: record.phase.clone(),
        manager: record.manager.clone(),
        region: record.region.clone(),
        project_type: record.project_type.clone(),
        start_date,
        estimated_end_date,
        created_at,
        estimated_budget: record.estimated_budget,
        actual_budget: record.actual_budget,
        warnings,
    }
}

/// Build views for a whole collection, preserving order
pub fn build_views(
    records: &[ProjectRecord],
    now: DateTime<Utc>,
    cfg: &HealthConfig,
) -> Vec<ProjectView> {
    records.iter().map(|r| build_view(r, now, cfg)).collect()
}

/// Lower-cased concatenation of the free-text searchable fields
fn search_text(record: &ProjectRecord) -> String {
    [
        record.name.as_str(),
        record.contract_id.as_deref().unwrap_or_default(),
        record.region.as_str(),
        record.manager.as_str(),
        record.project_type.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

fn normalize_field(
    ts: Option<&Timestamp>,
    field: &'static str,
    warnings: &mut Vec<Degradation>,
) -> Option<DateTime<Utc>> {
    let ts = ts?;
    if ts.to_instant().is_none() {
        warnings.push(Degradation::MalformedTimestamp { field });
    }
    Some(normalize(ts))
}

// Empty labels are "not set", not unknown.
fn check_label(field: &'static str, known: bool, raw: &str, warnings: &mut Vec<Degradation>) {
    if !known && !raw.trim().is_empty() {
        warnings.push(Degradation::UnknownEnumValue {
            field,
            value: raw.to_string(),
        });
    }
}
