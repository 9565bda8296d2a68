//! Calendar arithmetic for entry dates.
//!
//! Entries are stored as UTC instants with millisecond precision, but callers
//! think in local calendar days. Everything here is generic over the time
//! zone so the handlers can use [`chrono::Local`] while tests pin a fixed
//! offset.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound,
    TimeZone, Utc,
};
use thiserror::Error;

/// Closed interval of instants, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant <= self.end
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("invalid date `{0}`: expected an RFC 3339 timestamp, YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD")]
    Unrecognized(String),

    #[error("epoch milliseconds {0} are out of range")]
    OutOfRange(i64),
}

/// 00:00:00.000 through 23:59:59.999 of `day` in `tz`.
pub fn day_range<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateRange {
    let midnight = day.and_time(NaiveTime::MIN);
    let last_milli = midnight + Duration::days(1) - Duration::milliseconds(1);
    DateRange {
        start: earliest_local(tz, midnight),
        end: latest_local(tz, last_milli),
    }
}

/// First day 00:00:00.000 through last day 23:59:59.999 of the month that
/// contains `day`.
pub fn month_range<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateRange {
    let first = day.with_day0(0).unwrap_or(day);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    DateRange {
        start: day_range(first, tz).start,
        end: day_range(last, tz).end,
    }
}

/// Parses the textual forms accepted for an entry's `date` field.
///
/// Timestamps carrying an offset are taken as-is; naive timestamps and bare
/// dates are read as wall-clock time in `tz`, a bare date meaning midnight.
pub fn parse_entry_date<Tz: TimeZone>(text: &str, tz: &Tz) -> Result<DateTime<Utc>, DateError> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Ok(instant.with_timezone(&Utc).trunc_subsecs(3));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(earliest_local(tz, naive).trunc_subsecs(3));
    }
    if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(earliest_local(tz, day.and_time(NaiveTime::MIN)));
    }
    Err(DateError::Unrecognized(text.to_string()))
}

pub fn from_epoch_millis(millis: i64) -> Result<DateTime<Utc>, DateError> {
    DateTime::from_timestamp_millis(millis).ok_or(DateError::OutOfRange(millis))
}

// A wall-clock time skipped by a DST jump resolves to the first instant after
// the gap; an ambiguous one to its earlier reading.
fn earliest_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

fn latest_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .latest()
        .or_else(|| tz.from_local_datetime(&(naive - Duration::hours(1))).latest())
        .map(|local| local.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}
