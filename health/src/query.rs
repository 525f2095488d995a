//! Filtering and sorting over project views
//!
//! Every supplied predicate in a [`FilterSpec`] must hold for a view to be
//! kept. Sorting uses one key per [`SortOption`] with no secondary key; the
//! sort is stable, so equal keys keep their input order in both directions.

use crate::errors::Degradation;
use crate::labels::{HealthLevel, Priority, ProjectStatus, RiskLevel};
use crate::view::ProjectView;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

// ─────────────────────────────────────────────────────────────────────────────
// Filters
// ─────────────────────────────────────────────────────────────────────────────

/// Inclusive numeric range; a missing bound is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Inclusive instant range; a missing bound is open
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| ts >= from) && self.to.is_none_or(|to| ts <= to)
    }

    fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

/// User-selected filters; `None` means "not filtered on"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Free text; tokens split on whitespace, `,` and `;`, any token may match
    pub search: Option<String>,
    /// Matched against the effective status
    pub status: Option<ProjectStatus>,
    pub project_type: Option<String>,
    pub priority: Option<Priority>,
    /// Matched against the effective risk level
    pub risk_level: Option<RiskLevel>,
    pub health_level: Option<HealthLevel>,
    pub phase: Option<String>,
    pub manager: Option<String>,
    pub region: Option<String>,
    /// Range over the start date; views without one never match
    pub start_date: Option<DateRange>,
    pub progress: Option<ValueRange>,
    /// Range over the estimated budget
    pub budget: Option<ValueRange>,
    pub quality_score: Option<ValueRange>,
}

impl FilterSpec {
    /// Whether no predicate is active
    pub fn is_empty(&self) -> bool {
        self.search_tokens().is_empty()
            && self.status.is_none()
            && self.project_type.is_none()
            && self.priority.is_none()
            && self.risk_level.is_none()
            && self.health_level.is_none()
            && self.phase.is_none()
            && self.manager.is_none()
            && self.region.is_none()
            && self.start_date.is_none_or(|r| r.is_unbounded())
            && self.progress.is_none_or(|r| r.is_unbounded())
            && self.budget.is_none_or(|r| r.is_unbounded())
            && self.quality_score.is_none_or(|r| r.is_unbounded())
    }

    /// Lower-cased search tokens; empty when there is no usable query
    pub fn search_tokens(&self) -> Vec<String> {
        self.search
            .as_deref()
            .map(tokenize)
            .unwrap_or_default()
    }

    /// Check every active predicate against a view
    pub fn matches(&self, view: &ProjectView) -> bool {
        self.matches_with_tokens(view, &self.search_tokens())
    }

    fn matches_with_tokens(&self, view: &ProjectView, tokens: &[String]) -> bool {
        if !tokens.is_empty() && !tokens.iter().any(|t| view.search_text.contains(t.as_str())) {
            return false;
        }

        let exact = [
            eq_opt(self.status.as_ref(), &view.effective_status),
            eq_opt(self.project_type.as_ref(), &view.project_type),
            eq_opt(self.priority.as_ref(), &view.priority),
            eq_opt(self.risk_level.as_ref(), &view.effective_risk_level),
            eq_opt(self.health_level.as_ref(), &view.health_level),
            eq_opt(self.phase.as_ref(), &view.phase),
            eq_opt(self.manager.as_ref(), &view.manager),
            eq_opt(self.region.as_ref(), &view.region),
        ];
        if exact.contains(&false) {
            return false;
        }

        if let Some(range) = self.start_date.filter(|r| !r.is_unbounded()) {
            match view.start_date {
                Some(start) if range.contains(start) => {}
                _ => return false,
            }
        }

        self.progress.is_none_or(|r| r.contains(view.progress))
            && self.budget.is_none_or(|r| r.contains(view.estimated_budget))
            && self.quality_score.is_none_or(|r| r.contains(view.quality_score))
    }
}

fn eq_opt<T: PartialEq>(wanted: Option<&T>, actual: &T) -> bool {
    wanted.is_none_or(|w| w == actual)
}

fn tokenize(query: &str) -> Vec<String> {
    query
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Keep the views that satisfy every active predicate, in input order
pub fn filter_views(views: Vec<ProjectView>, filters: &FilterSpec) -> Vec<ProjectView> {
    if filters.is_empty() {
        return views;
    }
    let tokens = filters.search_tokens();
    views
        .into_iter()
        .filter(|v| filters.matches_with_tokens(v, &tokens))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Sorting
// ─────────────────────────────────────────────────────────────────────────────

/// Field a view list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    CreatedAt,
    Status,
    Progress,
    Priority,
    RiskLevel,
    HealthLevel,
    QualityScore,
    Budget,
    StartDate,
}

impl SortField {
    pub fn all() -> [Self; 10] {
        [
            Self::Name,
            Self::CreatedAt,
            Self::Status,
            Self::Progress,
            Self::Priority,
            Self::RiskLevel,
            Self::HealthLevel,
            Self::QualityScore,
            Self::Budget,
            Self::StartDate,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::CreatedAt => "createdAt",
            Self::Status => "status",
            Self::Progress => "progress",
            Self::Priority => "priority",
            Self::RiskLevel => "riskLevel",
            Self::HealthLevel => "healthLevel",
            Self::QualityScore => "qualityScore",
            Self::Budget => "budget",
            Self::StartDate => "startDate",
        }
    }

    /// Ordinal fields compare by rank table rather than label text
    pub fn is_ordinal(&self) -> bool {
        matches!(self, Self::Priority | Self::RiskLevel | Self::HealthLevel)
    }

    fn compare(self, a: &ProjectView, b: &ProjectView) -> Ordering {
        match self {
            Self::Name => cmp_text(&a.name, &b.name),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::Status => cmp_text(a.effective_status.as_str(), b.effective_status.as_str()),
            Self::Progress => a.progress.total_cmp(&b.progress),
            Self::Priority => a.sort_keys.priority.cmp(&b.sort_keys.priority),
            Self::RiskLevel => a.sort_keys.risk.cmp(&b.sort_keys.risk),
            Self::HealthLevel => a.sort_keys.health.cmp(&b.sort_keys.health),
            Self::QualityScore => a.quality_score.total_cmp(&b.quality_score),
            Self::Budget => a.estimated_budget.total_cmp(&b.estimated_budget),
            Self::StartDate => a.start_date.cmp(&b.start_date),
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// One of the closed set of `field-direction` sort options.
///
/// Deserializing or parsing an unrecognized value yields the default,
/// `createdAt-desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SortOption {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortOption {
    fn default() -> Self {
        Self::new(SortField::CreatedAt, SortDirection::Desc)
    }
}

impl SortOption {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Every valid option, ascending before descending per field
    pub fn all() -> Vec<Self> {
        SortField::all()
            .into_iter()
            .flat_map(|field| {
                [
                    Self::new(field, SortDirection::Asc),
                    Self::new(field, SortDirection::Desc),
                ]
            })
            .collect()
    }

    /// Wire label, e.g. `qualityScore-desc`
    pub fn label(&self) -> String {
        format!("{}-{}", self.field.as_str(), self.direction.as_str())
    }

    /// Parse a label, falling back to the default for anything unrecognized
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.parse() {
            Ok(option) => option,
            Err(degradation) => {
                tracing::warn!(%degradation, "Falling back to default sort");
                Self::default()
            }
        }
    }

    /// Compare two views under this option
    pub fn compare(&self, a: &ProjectView, b: &ProjectView) -> Ordering {
        match self.direction {
            SortDirection::Asc => self.field.compare(a, b),
            SortDirection::Desc => self.field.compare(b, a),
        }
    }
}

impl FromStr for SortOption {
    type Err = Degradation;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || Degradation::InvalidSortOption {
            value: raw.to_string(),
        };
        let (field, direction) = raw.trim().rsplit_once('-').ok_or_else(invalid)?;
        let field = SortField::all()
            .into_iter()
            .find(|f| f.as_str() == field)
            .ok_or_else(invalid)?;
        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return Err(invalid()),
        };
        Ok(Self::new(field, direction))
    }
}

impl From<String> for SortOption {
    fn from(raw: String) -> Self {
        Self::parse_or_default(&raw)
    }
}

impl From<SortOption> for String {
    fn from(option: SortOption) -> Self {
        option.label()
    }
}

impl std::fmt::Display for SortOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.field.as_str(), self.direction.as_str())
    }
}

/// Stable in-place sort
pub fn sort_views(views: &mut [ProjectView], sort: SortOption) {
    views.sort_by(|a, b| sort.compare(a, b));
}

/// Filter, then sort
pub fn query(views: Vec<ProjectView>, filters: &FilterSpec, sort: SortOption) -> Vec<ProjectView> {
    let mut result = filter_views(views, filters);
    sort_views(&mut result, sort);
    result
}
