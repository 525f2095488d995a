//! `buildwatch` command line
//!
//! Runs the health engine over a JSON export of project records.
//!
//! ## Commands
//!
//! - `buildwatch query` - filtered, sorted project list
//! - `buildwatch stats` - fleet-wide aggregates

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use buildwatch_health::{
    DateRange, FilterSpec, HealthConfig, HealthEngine, HealthLevel, Priority, ProjectRecord,
    ProjectStatus, RiskLevel, SortOption, Timestamp, ValueRange, parse_records,
};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

pub mod render;

/// Project health dashboard over a record export
#[derive(Debug, Parser)]
#[command(name = "buildwatch", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List projects with derived status, risk and quality score
    Query(QueryArgs),
    /// Print fleet-wide aggregate statistics
    Stats(StatsArgs),
}

/// Options shared by every command
#[derive(Debug, Args)]
pub struct CommonArgs {
    /// JSON file holding an array of project records
    #[arg(long, short = 'i', value_name = "FILE")]
    pub input: PathBuf,

    /// Reference instant (RFC 3339); defaults to the current time
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<String>,

    /// Health config TOML; defaults to `BUILDWATCH_HEALTH_CONFIG` or
    /// `~/.config/buildwatch/health.toml`
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output as JSON for automation
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Free-text search; tokens split on whitespace, `,` and `;`
    #[arg(long)]
    pub search: Option<String>,
    /// Effective status (e.g. in-progress, on-hold)
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub project_type: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    /// Effective risk level (low, medium, high, critical)
    #[arg(long)]
    pub risk_level: Option<String>,
    #[arg(long)]
    pub health_level: Option<String>,
    #[arg(long)]
    pub phase: Option<String>,
    #[arg(long)]
    pub manager: Option<String>,
    #[arg(long)]
    pub region: Option<String>,

    /// Earliest start date (inclusive)
    #[arg(long, value_name = "DATE")]
    pub start_from: Option<String>,
    /// Latest start date (inclusive)
    #[arg(long, value_name = "DATE")]
    pub start_to: Option<String>,
    #[arg(long)]
    pub min_progress: Option<f64>,
    #[arg(long)]
    pub max_progress: Option<f64>,
    #[arg(long)]
    pub min_budget: Option<f64>,
    #[arg(long)]
    pub max_budget: Option<f64>,
    #[arg(long)]
    pub min_score: Option<f64>,
    #[arg(long)]
    pub max_score: Option<f64>,

    /// Sort option, e.g. `qualityScore-desc`; unknown values use `createdAt-desc`
    #[arg(long, default_value = "createdAt-desc")]
    pub sort: String,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl Cli {
    /// Execute the command and return what should be printed
    pub fn run(self) -> Result<String> {
        match self.command {
            Command::Query(args) => run_query(args),
            Command::Stats(args) => run_stats(args),
        }
    }
}

fn run_query(args: QueryArgs) -> Result<String> {
    let ctx = Session::load(&args.common)?;
    let filters = args.filter_spec()?;
    let sort = SortOption::parse_or_default(&args.sort);

    let snapshot = ctx.engine.recompute(&ctx.records, &filters, sort, ctx.now);
    if args.common.json {
        return Ok(serde_json::to_string_pretty(&snapshot.views)?);
    }
    Ok(render::views_table(&snapshot.views))
}

fn run_stats(args: StatsArgs) -> Result<String> {
    let ctx = Session::load(&args.common)?;

    let snapshot =
        ctx.engine
            .recompute(&ctx.records, &FilterSpec::default(), SortOption::default(), ctx.now);
    if args.common.json {
        return Ok(serde_json::to_string_pretty(&snapshot.stats)?);
    }
    Ok(render::stats_listing(&snapshot.stats))
}

/// Everything a command needs before it can recompute
struct Session {
    engine: HealthEngine,
    records: Vec<ProjectRecord>,
    now: DateTime<Utc>,
}

impl Session {
    fn load(common: &CommonArgs) -> Result<Self> {
        let cfg = match &common.config {
            Some(path) => HealthConfig::load_from_path(path)?,
            None => HealthConfig::load()?,
        };
        let records = load_records(&common.input)?;
        let now = match &common.now {
            Some(raw) => parse_instant(raw).with_context(|| format!("invalid --now `{raw}`"))?,
            None => Utc::now(),
        };
        tracing::debug!(records = records.len(), %now, "Loaded project export");

        Ok(Self {
            engine: HealthEngine::with_config(cfg),
            records,
            now,
        })
    }
}

fn load_records(path: &Path) -> Result<Vec<ProjectRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_records(&contents).with_context(|| format!("failed to load {}", path.display()))
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    match Timestamp::Iso(raw.to_string()).to_instant() {
        Some(ts) => Ok(ts),
        None => bail!("expected an RFC 3339 timestamp or YYYY-MM-DD date"),
    }
}

// "all" is what the dashboard's dropdowns send for "no filter".
fn label_filter(raw: &Option<String>) -> Option<&str> {
    raw.as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

fn range(min: Option<f64>, max: Option<f64>) -> Option<ValueRange> {
    (min.is_some() || max.is_some()).then(|| ValueRange::new(min, max))
}

impl QueryArgs {
    /// Translate command-line flags into a filter spec
    pub fn filter_spec(&self) -> Result<FilterSpec> {
        let start_from = self
            .start_from
            .as_deref()
            .map(parse_instant)
            .transpose()
            .context("invalid --start-from")?;
        let start_to = self
            .start_to
            .as_deref()
            .map(parse_instant)
            .transpose()
            .context("invalid --start-to")?;

        Ok(FilterSpec {
            search: self.search.clone(),
            status: label_filter(&self.status).map(ProjectStatus::parse),
            project_type: label_filter(&self.project_type).map(str::to_string),
            priority: label_filter(&self.priority).map(Priority::parse),
            risk_level: label_filter(&self.risk_level).map(RiskLevel::parse),
            health_level: label_filter(&self.health_level).map(HealthLevel::parse),
            phase: label_filter(&self.phase).map(str::to_string),
            manager: label_filter(&self.manager).map(str::to_string),
            region: label_filter(&self.region).map(str::to_string),
            start_date: (start_from.is_some() || start_to.is_some())
                .then(|| DateRange::new(start_from, start_to)),
            progress: range(self.min_progress, self.max_progress),
            budget: range(self.min_budget, self.max_budget),
            quality_score: range(self.min_score, self.max_score),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> QueryArgs {
        let mut argv = vec!["buildwatch", "query", "--input", "projects.json"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).expect("args should parse").command {
            Command::Query(args) => args,
            Command::Stats(_) => panic!("expected query"),
        }
    }

    #[test]
    fn test_flags_map_to_filter_spec() {
        let args = parse(&[
            "--status",
            "On Hold",
            "--priority",
            "all",
            "--region",
            "North",
            "--min-score",
            "4",
            "--start-from",
            "2024-01-01",
        ]);
        let filters = args.filter_spec().expect("valid filters");

        assert_eq!(filters.status, Some(ProjectStatus::OnHold));
        assert_eq!(filters.priority, None);
        assert_eq!(filters.region.as_deref(), Some("North"));
        assert_eq!(filters.quality_score, Some(ValueRange::new(Some(4.0), None)));
        assert_eq!(filters.progress, None);
        assert!(filters.start_date.is_some_and(|r| r.to.is_none()));
    }

    #[test]
    fn test_bad_date_is_rejected() {
        let args = parse(&["--start-to", "whenever"]);
        assert!(args.filter_spec().is_err());
    }
}
