//! Date parsing and formatting helpers shared by the coercer and converters
//!
//! Native dates are UTC instants held as `NaiveDateTime`. A [`DateZone`]
//! decides which wall clock a tree string is read in and written back in.

use chrono::{FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Primary date format used when a model does not override it
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Fallback for bare time-of-day strings
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Date given to values that only carry a time of day
pub fn default_time_only_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
}

/// Zone whose wall clock date strings are written in
///
/// In JSON options this is `"utc"`, `"local"` or `{"offset": seconds}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateZone {
    #[default]
    Utc,
    /// The host's current zone
    Local,
    /// Seconds east of UTC
    Offset(i32),
}

impl DateZone {
    pub fn fixed(offset: FixedOffset) -> Self {
        DateZone::Offset(offset.local_minus_utc())
    }

    /// Whole hours east of UTC
    pub fn hours(hours: i32) -> Self {
        DateZone::Offset(hours * 3600)
    }

    /// UTC instant of a wall-clock time in this zone
    ///
    /// `None` for an out-of-range offset or a wall time skipped by the zone.
    /// An ambiguous local time resolves to its earlier instant.
    pub fn to_utc(self, wall: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            DateZone::Utc => Some(wall),
            DateZone::Local => Local
                .from_local_datetime(&wall)
                .earliest()
                .map(|instant| instant.naive_utc()),
            DateZone::Offset(seconds) => FixedOffset::east_opt(seconds)?
                .from_local_datetime(&wall)
                .single()
                .map(|instant| instant.naive_utc()),
        }
    }

    /// Wall-clock time of a UTC instant in this zone
    pub fn to_wall(self, instant: &NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            DateZone::Utc => Some(*instant),
            DateZone::Local => Some(Local.from_utc_datetime(instant).naive_local()),
            DateZone::Offset(seconds) => {
                FixedOffset::east_opt(seconds).map(|offset| offset.from_utc_datetime(instant).naive_local())
            }
        }
    }
}

/// Parse `raw` with `format` as a wall time in `zone`
///
/// Formats carrying only a time (`%H:%M`) resolve on `time_only_date`, formats
/// carrying only a date resolve at midnight.
pub fn parse(raw: &str, format: &str, time_only_date: NaiveDate, zone: DateZone) -> Option<NaiveDateTime> {
    parse_wall(raw, format, time_only_date).and_then(|wall| zone.to_utc(wall))
}

fn parse_wall(raw: &str, format: &str, time_only_date: NaiveDate) -> Option<NaiveDateTime> {
    if let Ok(date_time) = NaiveDateTime::parse_from_str(raw, format) {
        return Some(date_time);
    }
    if let Ok(time) = NaiveTime::parse_from_str(raw, format) {
        return Some(time_only_date.and_time(time));
    }
    NaiveDate::parse_from_str(raw, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Render `date` in `zone` with `format`
///
/// `None` when the format string is invalid or the zone offset is out of range.
pub fn format(date: &NaiveDateTime, format: &str, zone: DateZone) -> Option<String> {
    let wall = zone.to_wall(date)?;
    let mut rendered = String::new();
    write!(rendered, "{}", wall.format(format)).ok()?;
    Some(rendered)
}
