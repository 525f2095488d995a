//! Label vocabularies and ordinal rank tables
//!
//! Every labeled enum the engine reads from a raw record lives here, together
//! with the one set of rank tables shared by the view builder, the sorter and
//! the aggregator.
//!
//! Parsing is lenient: labels are matched case-insensitively with `_` and
//! spaces treated as `-`. Anything outside the closed set is preserved in an
//! `Unknown` variant and ranks as 0.

use serde::{Deserialize, Serialize};

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// Label outside the known set, kept verbatim
            Unknown(String),
        }

        impl $name {
            /// Every known variant, in declaration order
            pub const KNOWN: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Parse from a label (lenient, never fails)
            pub fn parse(raw: &str) -> Self {
                match normalize_label(raw).as_str() {
                    $( $label $(| $alias)* => Self::$variant, )+
                    _ => Self::Unknown(raw.to_string()),
                }
            }

            /// Canonical label
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $label, )+
                    Self::Unknown(raw) => raw.as_str(),
                }
            }

            /// Whether the label is part of the closed set
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Unknown(_))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::Unknown(String::new())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::parse(&raw)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::parse(raw)
            }
        }

        impl From<$name> for String {
            fn from(label: $name) -> Self {
                label.as_str().to_string()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }
    };
}

fn normalize_label(raw: &str) -> String {
    raw.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

label_enum! {
    /// Lifecycle status of a project
    ProjectStatus {
        Planning => "planning",
        Approved => "approved",
        InProgress => "in-progress" | "inprogress" | "active",
        OnHold => "on-hold" | "onhold",
        Completed => "completed" | "complete",
        Cancelled => "cancelled" | "canceled",
        Archived => "archived",
    }
}

impl ProjectStatus {
    /// Stored statuses that activity recency never overrides
    pub fn is_sticky(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Archived)
    }
}

label_enum! {
    /// Project priority
    Priority {
        Critical => "critical",
        High => "high",
        Medium => "medium",
        Low => "low",
    }
}

label_enum! {
    /// Risk bucket derived from the quality score
    RiskLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

label_enum! {
    /// Manually assessed project health
    HealthLevel {
        Excellent => "excellent",
        Good => "good",
        Fair => "fair",
        Poor => "poor",
        Critical => "critical",
    }
}

label_enum! {
    /// Category of an issue raised against a project
    IssueType {
        Progress => "progress",
        Quality => "quality",
        Safety => "safety",
        Other => "other",
    }
}

label_enum! {
    /// Resolution state of an issue
    IssueStatus {
        Open => "open",
        InProgress => "in-progress" | "inprogress",
        Resolved => "resolved",
    }
}

impl IssueStatus {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

impl Priority {
    /// Ordinal rank: critical=4, high=3, medium=2, low=1, other=0
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Unknown(_) => 0,
        }
    }
}

impl RiskLevel {
    /// Ordinal rank, same scale as [`Priority::rank`]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Critical => 4,
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Unknown(_) => 0,
        }
    }
}

impl HealthLevel {
    /// Ordinal rank: excellent=5, good=4, fair=3, poor=2, critical=1, other=0
    pub fn rank(&self) -> u8 {
        match self {
            Self::Excellent => 5,
            Self::Good => 4,
            Self::Fair => 3,
            Self::Poor => 2,
            Self::Critical => 1,
            Self::Unknown(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lenient_parse() {
        assert_eq!(ProjectStatus::parse("In Progress"), ProjectStatus::InProgress);
        assert_eq!(ProjectStatus::parse("ON_HOLD"), ProjectStatus::OnHold);
        assert_eq!(ProjectStatus::parse("canceled"), ProjectStatus::Cancelled);
        assert_eq!(IssueStatus::parse("in_progress"), IssueStatus::InProgress);
        assert_eq!(Priority::parse(" High "), Priority::High);
    }

    #[test]
    fn test_unknown_is_preserved() {
        let p = Priority::parse("Urgent");
        assert_eq!(p, Priority::Unknown("Urgent".to_string()));
        assert_eq!(p.as_str(), "Urgent");
        assert!(!p.is_known());
        assert_eq!(p.rank(), 0);
    }

    #[test]
    fn test_rank_tables() {
        let priority: Vec<u8> = Priority::KNOWN.iter().map(Priority::rank).collect();
        assert_eq!(priority, vec![4, 3, 2, 1]);

        let risk: Vec<u8> = RiskLevel::KNOWN.iter().map(RiskLevel::rank).collect();
        assert_eq!(risk, vec![1, 2, 3, 4]);

        let health: Vec<u8> = HealthLevel::KNOWN.iter().map(HealthLevel::rank).collect();
        assert_eq!(health, vec![5, 4, 3, 2, 1]);
        assert_eq!(HealthLevel::parse("unknown").rank(), 0);
    }

    #[test]
    fn test_serde_roundtrip_through_strings() {
        let parsed: Vec<IssueType> =
            serde_json::from_str(r#"["safety", "Quality", "weather"]"#).expect("parse");
        assert_eq!(
            parsed,
            vec![
                IssueType::Safety,
                IssueType::Quality,
                IssueType::Unknown("weather".to_string()),
            ]
        );

        let json = serde_json::to_string(&ProjectStatus::OnHold).expect("serialize");
        assert_eq!(json, r#""on-hold""#);
    }
}
