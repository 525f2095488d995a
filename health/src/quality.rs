//! Quality score for a project
//!
//! ```text
//! deduction   = Σ weight(issue.type)  over issues with status != resolved
//! final_score = clamp(base_score - deduction, 0, 10)
//! ```
//!
//! Weights come from [`DeductionWeights`]; unknown issue types weigh 0.

use crate::config::{DeductionWeights, QualityConfig};
use crate::labels::IssueType;
use crate::record::IssueRecord;
use serde::Serialize;

/// Lowest possible quality score
pub const MIN_SCORE: f64 = 0.0;
/// Highest possible quality score
pub const MAX_SCORE: f64 = 10.0;

/// Result of scoring one project's issues
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityAssessment {
    /// Clamped score in `[0, 10]`
    pub final_score: f64,
    /// Sum of deductions before clamping
    pub total_deduction: f64,
    /// Unresolved issues of type `quality` or `progress`
    pub quality_or_progress_issue_count: usize,
}

/// Deduction for a single unresolved issue of the given type
pub fn deduction_for(issue_type: &IssueType, weights: &DeductionWeights) -> f64 {
    match issue_type {
        IssueType::Progress => weights.progress,
        IssueType::Quality => weights.quality,
        IssueType::Safety => weights.safety,
        IssueType::Other => weights.other,
        IssueType::Unknown(_) => 0.0,
    }
}

/// Score a project from its base score and issue list.
///
/// `base_score` of `None` falls back to `cfg.default_base_score`.
pub fn assess_quality(
    base_score: Option<f64>,
    issues: &[IssueRecord],
    cfg: &QualityConfig,
) -> QualityAssessment {
    let base = base_score
        .filter(|b| b.is_finite())
        .unwrap_or(cfg.default_base_score);

    let mut total_deduction = 0.0;
    let mut quality_or_progress_issue_count = 0;

    for issue in issues.iter().filter(|i| !i.status.is_resolved()) {
        total_deduction += deduction_for(&issue.issue_type, &cfg.deductions);
        if matches!(issue.issue_type, IssueType::Quality | IssueType::Progress) {
            quality_or_progress_issue_count += 1;
        }
    }

    QualityAssessment {
        final_score: (base - total_deduction).clamp(MIN_SCORE, MAX_SCORE),
        total_deduction,
        quality_or_progress_issue_count,
    }
}
