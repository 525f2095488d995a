//! Full recomputation from raw records to query output

use crate::config::HealthConfig;
use crate::query::{FilterSpec, SortOption, query};
use crate::record::ProjectRecord;
use crate::stats::{AggregateStats, compute_stats};
use crate::view::build_views;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Output of one recomputation pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Filtered and sorted views
    pub views: Vec<crate::ProjectView>,
    /// Aggregates over the unfiltered collection
    pub stats: AggregateStats,
    /// Instant the snapshot was computed against
    pub computed_at: DateTime<Utc>,
}

/// Pure reducer: records + filters + sort + now -> snapshot
pub fn recompute(
    records: &[ProjectRecord],
    filters: &FilterSpec,
    sort: SortOption,
    now: DateTime<Utc>,
    cfg: &HealthConfig,
) -> Snapshot {
    let views = build_views(records, now, cfg);
    let stats = compute_stats(records, &views, now, cfg);

    let warning_count: usize = views.iter().map(|v| v.warnings.len()).sum();
    let views = query(views, filters, sort);

    tracing::debug!(
        total = stats.total,
        matched = views.len(),
        warnings = warning_count,
        sort = %sort,
        "Recomputed project snapshot"
    );

    Snapshot {
        views,
        stats,
        computed_at: now,
    }
}

/// Configured entry point for callers that keep a config around
#[derive(Debug, Clone, Default)]
pub struct HealthEngine {
    cfg: HealthConfig,
}

impl HealthEngine {
    /// Create an engine, loading config from the default location
    pub fn new() -> crate::Result<Self> {
        let cfg = HealthConfig::load()?;
        tracing::info!(
            recency_window_hours = cfg.activity.recency_window_hours,
            "Health engine initialized"
        );
        Ok(Self { cfg })
    }

    /// Create an engine with a specific config
    pub fn with_config(cfg: HealthConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &HealthConfig {
        &self.cfg
    }

    pub fn recompute(
        &self,
        records: &[ProjectRecord],
        filters: &FilterSpec,
        sort: SortOption,
        now: DateTime<Utc>,
    ) -> Snapshot {
        recompute(records, filters, sort, now, &self.cfg)
    }
}
