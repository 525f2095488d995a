//! Raw records as supplied by the project store
//!
//! Field names follow the store's camelCase JSON. Everything except `id` and
//! `name` is optional on the wire so a sparse or partially migrated document
//! still loads.

use crate::labels::{HealthLevel, IssueStatus, IssueType, Priority, ProjectStatus};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// An issue raised against a project
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub status: IssueStatus,
    #[serde(default)]
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl IssueRecord {
    pub fn new(
        id: impl Into<String>,
        issue_type: impl Into<IssueType>,
        status: impl Into<IssueStatus>,
    ) -> Self {
        Self {
            id: id.into(),
            issue_type: issue_type.into(),
            status: status.into(),
            ..Default::default()
        }
    }
}

/// One work-log submission; only `updated_at` matters to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReport {
    pub id: String,
    pub updated_at: Timestamp,
}

impl ActivityReport {
    pub fn new(id: impl Into<String>, updated_at: impl Into<Timestamp>) -> Self {
        Self {
            id: id.into(),
            updated_at: updated_at.into(),
        }
    }
}

/// A project document as stored
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default, rename = "status", alias = "storedStatus")]
    pub stored_status: ProjectStatus,
    /// Percent complete, 0–100
    #[serde(default)]
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score_base: Option<f64>,
    #[serde(
        default,
        rename = "riskLevel",
        alias = "riskLevelStored",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_level_stored: Option<String>,
    #[serde(default)]
    pub health_level: HealthLevel,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub manager: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_end_date: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub estimated_budget: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_budget: Option<f64>,
    #[serde(default)]
    pub issues: Vec<IssueRecord>,
    #[serde(default)]
    pub reports: Vec<ActivityReport>,
}

impl ProjectRecord {
    /// Create a record with only identity set; everything else defaulted
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Issues not yet resolved
    pub fn unresolved_issues(&self) -> impl Iterator<Item = &IssueRecord> {
        self.issues.iter().filter(|i| !i.status.is_resolved())
    }
}

/// Parse a JSON array of project records
pub fn parse_records(json: &str) -> crate::Result<Vec<ProjectRecord>> {
    serde_json::from_str(json).map_err(|e| {
        crate::HealthError::input_with_source("failed to parse project records", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_store_document() {
        let json = r#"[{
            "id": "p-1",
            "name": "Harbor Bridge",
            "contractId": "C-2024-017",
            "status": "planning",
            "progress": 35,
            "qualityScoreBase": 9.5,
            "riskLevel": "medium",
            "healthLevel": "good",
            "phase": "foundation",
            "manager": "Kim",
            "region": "North",
            "projectType": "bridge",
            "priority": "high",
            "startDate": "2024-01-10",
            "estimatedEndDate": { "seconds": 1735689600, "nanoseconds": 0 },
            "estimatedBudget": 1200000,
            "actualBudget": 450000.5,
            "issues": [
                { "id": "i-1", "type": "safety", "status": "open", "severity": "high" }
            ],
            "reports": [
                { "id": "r-1", "updatedAt": "2024-03-01T08:00:00Z" }
            ]
        }]"#;

        let records = parse_records(json).expect("parse");
        assert_eq!(records.len(), 1);
        let p = &records[0];
        assert_eq!(p.stored_status, ProjectStatus::Planning);
        assert_eq!(p.progress, 35.0);
        assert_eq!(p.priority, Priority::High);
        assert_eq!(p.health_level, HealthLevel::Good);
        assert_eq!(p.risk_level_stored.as_deref(), Some("medium"));
        assert_eq!(p.issues[0].issue_type, IssueType::Safety);
        assert_eq!(p.reports.len(), 1);
        assert_eq!(p.unresolved_issues().count(), 1);
    }

    #[test]
    fn test_sparse_document_defaults() {
        let records = parse_records(r#"[{ "id": "p-2", "name": "Depot" }]"#).expect("parse");
        let p = &records[0];
        assert_eq!(p.progress, 0.0);
        assert_eq!(p.quality_score_base, None);
        assert!(!p.priority.is_known());
        assert!(p.issues.is_empty());
        assert!(p.reports.is_empty());
    }

    #[test]
    fn test_invalid_json_is_input_error() {
        let err = parse_records("{ not json").expect_err("should fail");
        assert_eq!(err.category(), crate::ErrorCategory::InputError);
    }
}
