//! Risk bucket classification
//!
//! Thresholds are evaluated high to low and the first match wins, so a score
//! sitting exactly on a boundary lands in the upper (less risky) bucket.

use crate::config::RiskThresholds;
use crate::labels::RiskLevel;

/// Classify a quality score into a risk bucket
pub fn classify_risk(score: f64, thresholds: &RiskThresholds) -> RiskLevel {
    if score >= thresholds.low {
        RiskLevel::Low
    } else if score >= thresholds.medium {
        RiskLevel::Medium
    } else if score >= thresholds.high {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_boundaries_belong_to_upper_bucket() {
        let t = RiskThresholds::default();
        let cases = [
            (10.0, RiskLevel::Low),
            (8.0, RiskLevel::Low),
            (7.999, RiskLevel::Medium),
            (6.0, RiskLevel::Medium),
            (5.999, RiskLevel::High),
            (4.0, RiskLevel::High),
            (3.999, RiskLevel::Critical),
            (0.0, RiskLevel::Critical),
        ];
        for (score, expected) in cases {
            assert_eq!(classify_risk(score, &t), expected, "score={score}");
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let t = RiskThresholds {
            low: 9.0,
            medium: 7.0,
            high: 5.0,
        };
        assert_eq!(classify_risk(8.5, &t), RiskLevel::Medium);
        assert_eq!(classify_risk(4.5, &t), RiskLevel::Critical);
    }
}
