//! Live query wrapper
//!
//! Owns the mutable inputs (latest record collection, filters, sort) and
//! republishes a fresh [`Snapshot`] whenever any of them changes. The engine
//! underneath stays pure; this is the only stateful piece.
//!
//! Snapshots are published on a `tokio::sync::watch` channel, so subscribers
//! only ever see the newest result and a superseded one is simply dropped.

use crate::engine::{HealthEngine, Snapshot};
use crate::query::{FilterSpec, SortOption};
use crate::record::ProjectRecord;
use crate::timestamp::{Clock, SystemClock};
use std::sync::Arc;
use tokio::sync::watch;

pub struct LiveProjectQuery<C: Clock = SystemClock> {
    engine: HealthEngine,
    clock: C,
    records: Vec<ProjectRecord>,
    filters: FilterSpec,
    sort: SortOption,
    generation: u64,
    tx: watch::Sender<Arc<Snapshot>>,
}

impl<C: Clock> LiveProjectQuery<C> {
    /// Start with an empty collection, no filters and the default sort
    pub fn new(engine: HealthEngine, clock: C) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Snapshot::default()));
        let mut live = Self {
            engine,
            clock,
            records: Vec::new(),
            filters: FilterSpec::default(),
            sort: SortOption::default(),
            generation: 0,
            tx,
        };
        live.refresh();
        live
    }

    /// Receiver that observes every subsequent publish
    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> Arc<Snapshot> {
        Arc::clone(&self.tx.borrow())
    }

    /// Number of snapshots published so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn filters(&self) -> &FilterSpec {
        &self.filters
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    /// The backing collection changed
    pub fn replace_records(&mut self, records: Vec<ProjectRecord>) {
        self.records = records;
        self.refresh();
    }

    pub fn set_filters(&mut self, filters: FilterSpec) {
        self.filters = filters;
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.sort = sort;
        self.refresh();
    }

    /// Recompute against the current clock without any input change, e.g.
    /// so recency-based statuses age out
    pub fn refresh(&mut self) {
        let snapshot =
            self.engine
                .recompute(&self.records, &self.filters, self.sort, self.clock.now());
        self.generation += 1;
        tracing::trace!(generation = self.generation, "Publishing project snapshot");
        self.tx.send_replace(Arc::new(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HealthConfig;
    use crate::labels::ProjectStatus;
    use crate::query::{SortDirection, SortField};
    use crate::record::ActivityReport;
    use crate::timestamp::FixedClock;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("valid")
    }

    fn live() -> LiveProjectQuery<FixedClock> {
        LiveProjectQuery::new(
            HealthEngine::with_config(HealthConfig::default()),
            FixedClock(now()),
        )
    }

    #[test]
    fn test_initial_snapshot_is_empty() {
        let live = live();
        assert_eq!(live.generation(), 1);
        assert!(live.latest().views.is_empty());
        assert_eq!(live.latest().computed_at, now());
    }

    #[test]
    fn test_every_change_republishes() {
        let mut live = live();
        let mut rx = live.subscribe();

        live.replace_records(vec![
            ProjectRecord::new("b", "Bravo"),
            ProjectRecord {
                reports: vec![ActivityReport::new("r", now() - Duration::hours(3))],
                ..ProjectRecord::new("a", "Alpha")
            },
        ]);
        assert!(rx.has_changed().expect("sender alive"));
        assert_eq!(rx.borrow_and_update().views.len(), 2);

        live.set_sort(SortOption::new(SortField::Name, SortDirection::Asc));
        let names: Vec<String> = rx
            .borrow_and_update()
            .views
            .iter()
            .map(|v| v.name.clone())
            .collect();
        assert_eq!(names, vec!["Alpha", "Bravo"]);

        live.set_filters(FilterSpec {
            status: Some(ProjectStatus::InProgress),
            ..Default::default()
        });
        let latest = rx.borrow_and_update().clone();
        assert_eq!(latest.views.len(), 1);
        assert_eq!(latest.views[0].id, "a");
        assert_eq!(latest.stats.total, 2);
        assert_eq!(live.generation(), 4);
    }

    #[test]
    fn test_late_subscriber_sees_latest_only() {
        let mut live = live();
        live.replace_records(vec![ProjectRecord::new("x", "X")]);
        live.replace_records(vec![
            ProjectRecord::new("x", "X"),
            ProjectRecord::new("y", "Y"),
        ]);

        let rx = live.subscribe();
        assert_eq!(rx.borrow().stats.total, 2);
    }
}
