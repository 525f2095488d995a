//! End-to-end scenarios for the health engine
//!
//! Records are loaded from store-shaped JSON and pushed through the full
//! recompute pass, the same way the dashboard consumes them.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use buildwatch_health::{
    FilterSpec, HealthConfig, ProjectStatus, RiskLevel, SortOption, Snapshot, ValueRange,
    parse_records, recompute,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0)
        .single()
        .expect("valid instant")
}

fn iso(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339()
}

fn run(records: serde_json::Value, filters: &FilterSpec, sort: &str) -> Snapshot {
    let records = parse_records(&records.to_string()).expect("records should parse");
    recompute(
        &records,
        filters,
        SortOption::parse_or_default(sort),
        now(),
        &HealthConfig::default(),
    )
}

fn fleet() -> serde_json::Value {
    json!([
        {
            "id": "A",
            "name": "Quay Wall Upgrade",
            "status": "in-progress",
            "progress": 55,
            "qualityScoreBase": 10,
            "priority": "medium",
            "healthLevel": "good",
            "region": "Harbor",
            "manager": "Noor",
            "projectType": "marine",
            "createdAt": "2024-01-05T00:00:00Z",
            "issues": [
                { "id": "a1", "type": "quality", "status": "open" },
                { "id": "a2", "type": "quality", "status": "in-progress" },
                { "id": "a3", "type": "safety", "status": "open" }
            ],
            "reports": [
                { "id": "ra", "updatedAt": iso(now() - Duration::hours(20)) }
            ]
        },
        {
            "id": "B",
            "name": "Depot Extension",
            "status": "planning",
            "progress": 30,
            "priority": "high",
            "healthLevel": "fair",
            "region": "Inland",
            "manager": "Sam",
            "projectType": "building",
            "createdAt": { "seconds": 1_706_745_600_i64, "nanoseconds": 0 },
            "reports": []
        },
        {
            "id": "C",
            "name": "Ring Road Lot 4",
            "status": "on-hold",
            "progress": 40,
            "priority": "critical",
            "healthLevel": "excellent",
            "region": "Inland",
            "manager": "Noor",
            "projectType": "road",
            "createdAt": 1_709_251_200_000_i64,
            "reports": [
                { "id": "rc1", "updatedAt": iso(now() - Duration::days(9)) },
                { "id": "rc2", "updatedAt": iso(now() - Duration::days(2)) }
            ]
        },
        {
            "id": "D",
            "name": "Substation Retrofit",
            "status": "cancelled",
            "progress": 50,
            "priority": "low",
            "healthLevel": "poor",
            "region": "Harbor",
            "manager": "Lee",
            "projectType": "electrical",
            "createdAt": "2023-11-20",
            "reports": [
                { "id": "rd", "updatedAt": iso(now() - Duration::days(10)) }
            ]
        },
        {
            "id": "E",
            "name": "Footbridge Deck",
            "status": "in-progress",
            "progress": 100,
            "priority": "medium",
            "healthLevel": "good",
            "region": "Harbor",
            "manager": "Sam",
            "projectType": "bridge",
            "issues": [
                { "id": "e1", "type": "safety", "status": "open" },
                { "id": "e2", "type": "safety", "status": "open" }
            ]
        }
    ])
}

fn view<'a>(snapshot: &'a Snapshot, id: &str) -> &'a buildwatch_health::ProjectView {
    snapshot
        .views
        .iter()
        .find(|v| v.id == id)
        .unwrap_or_else(|| panic!("view {id} missing"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Derived fields
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unresolved_quality_and_safety_issues_drop_score_to_medium_risk() {
    let snapshot = run(fleet(), &FilterSpec::default(), "name-asc");
    let a = view(&snapshot, "A");
    assert_eq!(a.quality_deduction, 4.0);
    assert_eq!(a.quality_score, 6.0);
    assert_eq!(a.effective_risk_level, RiskLevel::Medium);
    assert_eq!(a.effective_status, ProjectStatus::InProgress);
}

#[test]
fn planning_project_without_reports_is_on_hold() {
    let snapshot = run(fleet(), &FilterSpec::default(), "name-asc");
    assert_eq!(view(&snapshot, "B").effective_status, ProjectStatus::OnHold);
}

#[test]
fn recent_report_marks_project_in_progress() {
    let snapshot = run(fleet(), &FilterSpec::default(), "name-asc");
    let c = view(&snapshot, "C");
    assert_eq!(c.effective_status, ProjectStatus::InProgress);
    assert_eq!(c.latest_activity, Some(now() - Duration::days(2)));
}

#[test]
fn terminal_statuses_are_sticky() {
    let snapshot = run(fleet(), &FilterSpec::default(), "name-asc");
    assert_eq!(view(&snapshot, "D").effective_status, ProjectStatus::Cancelled);

    let e = view(&snapshot, "E");
    assert_eq!(e.effective_status, ProjectStatus::Completed);
    assert_eq!(e.quality_score, 6.0);
}

#[test]
fn heterogeneous_created_at_shapes_sort_together() {
    let snapshot = run(fleet(), &FilterSpec::default(), "createdAt-asc");
    let ids: Vec<&str> = snapshot.views.iter().map(|v| v.id.as_str()).collect();
    // E has no createdAt and sorts as the epoch origin
    assert_eq!(ids, vec!["E", "D", "A", "B", "C"]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Query + aggregates
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn filters_narrow_views_but_not_stats() {
    let filters = FilterSpec {
        search: Some("noor, sam".to_string()),
        region: Some("Inland".to_string()),
        progress: Some(ValueRange::new(Some(35.0), None)),
        ..Default::default()
    };
    let snapshot = run(fleet(), &filters, "priority-desc");

    let ids: Vec<&str> = snapshot.views.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["C"]);
    assert_eq!(snapshot.stats.total, 5);
}

#[test]
fn ordinal_sort_ranks_health_levels() {
    let snapshot = run(fleet(), &FilterSpec::default(), "healthLevel-desc");
    let ids: Vec<&str> = snapshot.views.iter().map(|v| v.id.as_str()).collect();
    // excellent, good, good (input order kept), fair, poor
    assert_eq!(ids, vec!["C", "A", "E", "B", "D"]);
}

#[test]
fn invalid_sort_falls_back_to_newest_first() {
    let snapshot = run(fleet(), &FilterSpec::default(), "popularity-desc");
    let ids: Vec<&str> = snapshot.views.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["C", "B", "A", "D", "E"]);
}

#[test]
fn fleet_aggregates() {
    let snapshot = run(fleet(), &FilterSpec::default(), "name-asc");
    let stats = &snapshot.stats;

    assert_eq!(stats.total, 5);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.in_progress, 2);
    assert_eq!(stats.on_hold, 3);
    assert_eq!(stats.planning, 0);
    assert_eq!(stats.high_risk, 2);
    assert_eq!(stats.open_quality_progress_issues, 2);
    // (6 + 10 + 10 + 10 + 6) / 5
    assert_eq!(stats.average_quality_score, 8.4);
    assert_eq!(stats.health_distribution.get("good"), Some(&2));
}
