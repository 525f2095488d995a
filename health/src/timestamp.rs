//! Timestamp normalization
//!
//! Records arrive from the document store with timestamps in several shapes:
//! RFC 3339 strings, looser ISO-like strings, epoch milliseconds (integer or
//! float), or a `{ seconds, nanoseconds }` wrapper object. [`Timestamp`] captures each shape
//! explicitly and [`normalize`] turns any of them into a `DateTime<Utc>`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Naive (offset-less) formats accepted for [`Timestamp::Iso`], read as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A timestamp as supplied by the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// Already a proper instant (RFC 3339 on the wire)
    Native(DateTime<Utc>),
    /// Any other string; parsed leniently on normalization
    Iso(String),
    /// Milliseconds since the Unix epoch
    EpochMillis(i64),
    /// Milliseconds since the Unix epoch, exported as a JSON float
    FractionalMillis(f64),
    /// Store-specific wrapper object with its own conversion
    Wrapped(WrappedTimestamp),
    /// Shape the engine does not understand
    Unrecognized(serde_json::Value),
}

/// Seconds/nanoseconds wrapper as emitted by document-store SDKs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedTimestamp {
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    #[serde(default, alias = "_nanoseconds")]
    pub nanoseconds: u32,
}

impl WrappedTimestamp {
    /// Convert the wrapper to an instant; `None` when out of range.
    pub fn to_date_time(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

impl Timestamp {
    /// Convert to an instant, or `None` if the value is not a usable date.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Native(ts) => Some(*ts),
            Self::Iso(raw) => parse_iso(raw),
            Self::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
            Self::FractionalMillis(ms) if ms.is_finite() => {
                DateTime::from_timestamp_millis(ms.trunc() as i64)
            }
            Self::FractionalMillis(_) => None,
            Self::Wrapped(wrapped) => wrapped.to_date_time(),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Native(ts)
    }
}

fn parse_iso(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Normalize a timestamp to an instant.
///
/// Unusable values map to the Unix epoch, i.e. they read as "infinitely old"
/// rather than failing the caller.
pub fn normalize(ts: &Timestamp) -> DateTime<Utc> {
    match ts.to_instant() {
        Some(instant) => instant,
        None => {
            tracing::debug!(value = ?ts, "Unrecognized timestamp, using epoch origin");
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

/// Source of the reference "now" instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant (tests, replays, `--now` overrides).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
