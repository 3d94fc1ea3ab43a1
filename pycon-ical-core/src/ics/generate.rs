//! ICS file generation.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::config::{ScheduleConfig, TimezoneDefinition, TransitionRule};
use crate::talk::Talk;
use crate::time::ymd;

const LINE_END: &str = "\r\n";

const HTML_DOCTYPE: &str = r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 3.2//EN">"#;

/// Calendar-level properties written in the header.
#[derive(Debug, Clone)]
pub struct CalendarMeta {
    pub name: String,
    pub product_id: String,
    pub uid_prefix: String,
}

impl CalendarMeta {
    pub fn from_config(config: &ScheduleConfig) -> Self {
        CalendarMeta {
            name: config.calendar_name.clone(),
            product_id: config.product_id.clone(),
            uid_prefix: config.uid_prefix.clone(),
        }
    }
}

/// A timestamp to be written into the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcalTime {
    /// Written as UTC with a `Z` suffix
    Utc(DateTime<Utc>),
    /// Written as wall-clock time in the calendar's zone, for use with TZID
    Zoned(DateTime<Utc>),
}

impl IcalTime {
    /// Compact `YYYYMMDDTHHMMSS[Z]` form. Values before 1700-01-01 are
    /// written as 1700-01-01.
    pub fn format(&self, zone: Tz) -> String {
        match *self {
            IcalTime::Utc(instant) => {
                format!("{}Z", floor(instant.naive_utc()).format("%Y%m%dT%H%M%S"))
            }
            IcalTime::Zoned(instant) => floor(instant.with_timezone(&zone).naive_local())
                .format("%Y%m%dT%H%M%S")
                .to_string(),
        }
    }
}

fn floor(datetime: NaiveDateTime) -> NaiveDateTime {
    let min = ymd(1700, 1, 1).and_hms_opt(0, 0, 0).expect("valid time");
    datetime.max(min)
}

/// Escape commas for TEXT values.
pub fn escape_commas(text: &str) -> String {
    text.replace(',', "\\,")
}

/// Renders talks plus a fixed VTIMEZONE into a calendar document.
pub struct CalendarWriter<'a> {
    timezone: &'a TimezoneDefinition,
    meta: CalendarMeta,
}

impl<'a> CalendarWriter<'a> {
    pub fn new(timezone: &'a TimezoneDefinition, meta: CalendarMeta) -> Self {
        CalendarWriter { timezone, meta }
    }

    pub fn from_config(config: &'a ScheduleConfig) -> Self {
        CalendarWriter::new(&config.timezone, CalendarMeta::from_config(config))
    }

    /// Render with the current time as DTSTAMP/CREATED/LAST-MODIFIED.
    pub fn render(&self, talks: &[Talk]) -> String {
        self.render_at(talks, Utc::now())
    }

    /// Render with an explicit generation time.
    pub fn render_at(&self, talks: &[Talk], generated_at: DateTime<Utc>) -> String {
        let mut lines = self.header_lines();
        for talk in talks {
            lines.extend(self.event_lines(talk, generated_at));
        }
        lines.push("END:VCALENDAR".to_string());

        let mut output = String::with_capacity(lines.iter().map(|l| l.len() + 2).sum());
        for line in &lines {
            output.push_str(line);
            output.push_str(LINE_END);
        }
        output
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            format!("PRODID:{}", self.meta.product_id),
            "VERSION:2.0".to_string(),
            "CALSCALE:GREGORIAN".to_string(),
            format!("X-WR-CALNAME:{}", self.meta.name),
            format!("X-WR-TIMEZONE:{}", self.timezone.tzid),
        ];

        lines.push("BEGIN:VTIMEZONE".to_string());
        lines.push(format!("TZID:{}", self.timezone.tzid));
        lines.extend(rule_lines("STANDARD", &self.timezone.standard));
        lines.extend(rule_lines("DAYLIGHT", &self.timezone.daylight));
        lines.push("END:VTIMEZONE".to_string());

        lines
    }

    fn event_lines(&self, talk: &Talk, generated_at: DateTime<Utc>) -> Vec<String> {
        let zone = self.timezone.zone;
        let tzid = &self.timezone.tzid;
        let stamp = IcalTime::Utc(generated_at).format(zone);
        let description = escape_commas(&talk.description);

        vec![
            "BEGIN:VEVENT".to_string(),
            format!("DTSTART;TZID=\"{}\":{}", tzid, IcalTime::Zoned(talk.start).format(zone)),
            format!("DTEND;TZID=\"{}\":{}", tzid, IcalTime::Zoned(talk.end).format(zone)),
            format!("DTSTAMP:{}", stamp),
            format!("UID:{}", talk.uid(&self.meta.uid_prefix)),
            format!("CREATED:{}", stamp),
            format!("DESCRIPTION:{}\\n\\n{}", description, talk.url),
            format!("LOCATION:{}", talk.location),
            format!(
                "X-ALT-DESC;FMTTYPE=text/html:{}<HTML><BODY>{}<br><a href='{}'>{}</a></BODY></HTML>",
                HTML_DOCTYPE, description, talk.url, talk.url
            ),
            format!("LAST-MODIFIED:{}", stamp),
            format!("URL:{}", talk.url),
            format!("SUMMARY:{}", talk.title),
            "SEQUENCE:1".to_string(),
            "STATUS:CONFIRMED".to_string(),
            "X-MICROSOFT-CDO-BUSYSTATUS:FREE".to_string(),
            "TRANSP:TRANSPARENT".to_string(),
            "END:VEVENT".to_string(),
        ]
    }
}

/// STANDARD or DAYLIGHT sub-component of the VTIMEZONE
fn rule_lines(kind: &str, rule: &TransitionRule) -> Vec<String> {
    vec![
        format!("BEGIN:{}", kind),
        format!("DTSTART:{}", rule.dtstart.format("%Y%m%dT%H%M%S")),
        format!("RRULE:{}", rule.rrule()),
        format!("TZOFFSETFROM:{}", rule.tz_offset_from()),
        format!("TZOFFSETTO:{}", rule.tz_offset_to()),
        format!("END:{}", kind),
    ]
}
