//! Parsing of the schedule's human-written day and time ranges.
//!
//! The page lists a weekday name ("Saturday") and a range such as
//! "10:00 a.m. &ndash; 10:45 a.m.", "noon – 12:30 p.m." or "2 p.m. – 3 p.m.".
//! Times are wall-clock values in the conference timezone and are converted
//! to UTC here.

use std::collections::BTreeMap;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::warn;

use crate::error::{ScheduleError, ScheduleResult};
use crate::normalize::collapse_whitespace;

/// `year month day hour:minute meridiem`
const TIME_FORMAT: &str = "%Y %m %d %I:%M %p";

/// The entity survives in raw markup, html5ever decodes it to U+2013.
const RANGE_SEPARATORS: &[&str] = &["&ndash;", "\u{2013}"];

/// Weekday name to conference date.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DayMap(BTreeMap<String, NaiveDate>);

impl Default for DayMap {
    /// PyCon 2014 main conference days
    fn default() -> Self {
        DayMap::new([
            ("Friday", ymd(2014, 4, 11)),
            ("Saturday", ymd(2014, 4, 12)),
            ("Sunday", ymd(2014, 4, 13)),
        ])
    }
}

impl DayMap {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, NaiveDate)>,
        S: Into<String>,
    {
        DayMap(
            entries
                .into_iter()
                .map(|(name, date)| (name.into(), date))
                .collect(),
        )
    }

    pub fn date_for(&self, day: &str) -> ScheduleResult<NaiveDate> {
        self.0
            .get(day.trim())
            .copied()
            .ok_or_else(|| ScheduleError::UnknownDay(day.trim().to_string()))
    }

    pub fn days(&self) -> impl Iterator<Item = (&str, NaiveDate)> {
        self.0.iter().map(|(name, date)| (name.as_str(), *date))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Rewrite an informal time into `h:mm AM|PM`.
///
/// "10:00 a.m." becomes "10:00 AM", "noon" and "12 noon" become "12:00 PM",
/// and "2 PM" becomes "2:00 PM".
pub fn normalize_time(raw: &str) -> String {
    let mut time = collapse_whitespace(raw)
        .replace("a.m.", "AM")
        .replace("p.m.", "PM")
        .replace("12 noon", "noon")
        .replace("noon", "12:00 PM");

    if !time.contains(':') {
        if let Some(pos) = time.rfind(' ') {
            time.insert_str(pos, ":00");
        }
    }

    time
}

/// Parse one time on `day` as wall-clock time in `zone`, returned in UTC.
pub fn parse_time(day: NaiveDate, raw: &str, zone: Tz) -> ScheduleResult<DateTime<Utc>> {
    let normalized = normalize_time(raw);
    let combined = format!("{} {}", day.format("%Y %m %d"), normalized);

    let local = NaiveDateTime::parse_from_str(&combined, TIME_FORMAT).map_err(|_| {
        ScheduleError::TimeParse {
            raw: raw.trim().to_string(),
            normalized: normalized.clone(),
        }
    })?;

    local_to_utc(local, zone)
}

/// Split "start &ndash; end" into its two trimmed halves.
pub fn split_range(raw: &str) -> ScheduleResult<(&str, &str)> {
    for separator in RANGE_SEPARATORS {
        let parts: Vec<&str> = raw.split(separator).collect();
        match parts.as_slice() {
            [_] => continue,
            [start, end] => return Ok((start.trim(), end.trim())),
            _ => break,
        }
    }

    Err(ScheduleError::MalformedRange(raw.trim().to_string()))
}

/// Parse a full time range on `day`. Fails if the range does not move forward.
pub fn parse_range(
    day: NaiveDate,
    raw_range: &str,
    zone: Tz,
) -> ScheduleResult<(DateTime<Utc>, DateTime<Utc>)> {
    let (start_raw, end_raw) = split_range(raw_range)?;
    let start = parse_time(day, start_raw, zone)?;
    let end = parse_time(day, end_raw, zone)?;

    if start >= end {
        return Err(ScheduleError::InvertedRange(raw_range.trim().to_string()));
    }

    Ok((start, end))
}

fn local_to_utc(local: NaiveDateTime, zone: Tz) -> ScheduleResult<DateTime<Utc>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => {
            warn!(%local, zone = zone.name(), "Ambiguous local time, using the earlier instant");
            Ok(earliest.with_timezone(&Utc))
        }
        LocalResult::None => Err(ScheduleError::NonexistentLocalTime {
            local: local.to_string(),
            zone: zone.name().to_string(),
        }),
    }
}
