//! Configuration for one conference schedule export.
//!
//! The defaults describe PyCon 2014 in Montréal. Everything event-specific
//! (URL, day table, timezone rules, UID prefix) lives here so the pipeline
//! itself stays free of hardcoded data.

use std::path::PathBuf;

use chrono::{NaiveDateTime, Weekday};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{ScheduleError, ScheduleResult};
use crate::time::{DayMap, ymd};

static DEFAULT_SOURCE_URL: &str = "https://us.pycon.org/2014/schedule/talks/list/";
static DEFAULT_OUTPUT_PATH: &str = "pycon2014.ics";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Page listing every talk; also the base for resolving talk links
    pub source_url: String,

    /// Where the calendar is written (overwritten on every run)
    pub output_path: PathBuf,

    /// X-WR-CALNAME
    pub calendar_name: String,

    /// PRODID
    pub product_id: String,

    /// UIDs are `<uid_prefix>.<talk id>`
    pub uid_prefix: String,

    /// CSS selector matching one talk block
    pub block_selector: String,

    /// Index of the talk id among the non-empty path segments of the talk URL
    pub id_segment: usize,

    pub days: DayMap,

    pub timezone: TimezoneDefinition,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            calendar_name: "Pycon 2014 Schedule".to_string(),
            product_id: "-//pycon-ical//pycon2014//NONSGML v1.0//EN".to_string(),
            uid_prefix: "pycon-2014-2".to_string(),
            block_selector: "div[class='span8 presentation well']".to_string(),
            id_segment: 3,
            days: DayMap::default(),
            timezone: TimezoneDefinition::default(),
        }
    }
}

impl ScheduleConfig {
    /// Load a configuration from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> ScheduleResult<Self> {
        let config: ScheduleConfig = toml::from_str(contents)
            .map_err(|e| ScheduleError::Config(format!("Failed to parse config: {}", e)))?;

        if config.days.is_empty() {
            return Err(ScheduleError::Config("No conference days configured".into()));
        }

        Ok(config)
    }
}

/// A fixed VTIMEZONE: one standard and one daylight rule, repeating yearly.
///
/// `tzid` is what the calendar advertises; `zone` is the IANA zone used to
/// convert between UTC and wall-clock time. The two are expected to agree
/// for the dates in the schedule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimezoneDefinition {
    pub tzid: String,
    pub zone: Tz,
    pub standard: TransitionRule,
    pub daylight: TransitionRule,
}

impl Default for TimezoneDefinition {
    /// US Eastern, under the Windows id Outlook expects
    fn default() -> Self {
        TimezoneDefinition {
            tzid: "Eastern Standard Time".to_string(),
            zone: chrono_tz::America::New_York,
            standard: TransitionRule {
                dtstart: ymd(1601, 11, 4).and_hms_opt(2, 0, 0).expect("valid time"),
                month: 11,
                week: 1,
                weekday: Weekday::Sun,
                offset_from: -4 * 60,
                offset_to: -5 * 60,
            },
            daylight: TransitionRule {
                dtstart: ymd(1601, 3, 11).and_hms_opt(2, 0, 0).expect("valid time"),
                month: 3,
                week: 2,
                weekday: Weekday::Sun,
                offset_from: -5 * 60,
                offset_to: -4 * 60,
            },
        }
    }
}

/// One yearly transition, e.g. "second Sunday of March at 02:00, -0500 to -0400".
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransitionRule {
    pub dtstart: NaiveDateTime,
    pub month: u32,
    /// Which occurrence of `weekday` in the month (1-5)
    pub week: u8,
    pub weekday: Weekday,
    /// Minutes east of UTC before the transition
    pub offset_from: i32,
    /// Minutes east of UTC after the transition
    pub offset_to: i32,
}

impl TransitionRule {
    pub fn rrule(&self) -> String {
        format!(
            "FREQ=YEARLY;BYDAY={}{};BYMONTH={}",
            self.week,
            weekday_code(self.weekday),
            self.month
        )
    }

    pub fn tz_offset_from(&self) -> String {
        format_offset(self.offset_from)
    }

    pub fn tz_offset_to(&self) -> String {
        format_offset(self.offset_to)
    }
}

fn weekday_code(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
        Weekday::Sun => "SU",
    }
}

/// Minutes east of UTC as `±HHMM`
fn format_offset(minutes: i32) -> String {
    let sign = if minutes < 0 { '-' } else { '+' };
    let minutes = minutes.abs();
    format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
}
