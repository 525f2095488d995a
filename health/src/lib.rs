//! Project health & query engine for buildwatch
//!
//! Turns raw construction-project records (with embedded issues and activity
//! reports) into derived views:
//! - a clamped 0–10 quality score from unresolved issues
//! - a risk bucket derived from that score
//! - an effective lifecycle status driven by progress and report recency
//! - filtered / sorted view lists and fleet-wide aggregates
//!
//! Everything below [`live`] is pure: the same records, filters, sort and
//! reference instant always produce the same [`Snapshot`]. Callers recompute
//! from scratch on every change.

#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod config;
pub mod engine;
pub mod errors;
pub mod labels;
pub mod live;
pub mod quality;
pub mod query;
pub mod record;
pub mod risk;
pub mod stats;
pub mod status;
pub mod timestamp;
pub mod view;

pub use config::HealthConfig;
pub use engine::{HealthEngine, Snapshot, recompute};
pub use errors::{Degradation, ErrorCategory, HealthError, Result};
pub use labels::{HealthLevel, IssueStatus, IssueType, Priority, ProjectStatus, RiskLevel};
pub use live::LiveProjectQuery;
pub use quality::{QualityAssessment, assess_quality};
pub use query::{
    DateRange, FilterSpec, SortDirection, SortField, SortOption, ValueRange, filter_views, query,
    sort_views,
};
pub use record::{ActivityReport, IssueRecord, ProjectRecord, parse_records};
pub use risk::classify_risk;
pub use stats::{AggregateStats, compute_stats};
pub use status::{ActivityState, activity_state, derive_status};
pub use timestamp::{Clock, FixedClock, SystemClock, Timestamp, WrappedTimestamp, normalize};
pub use view::{ProjectView, SortKeys, build_view, build_views};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
