//! End-to-end pipeline from page markup to calendar text.

use chrono::{DateTime, Utc};
use scraper::Html;
use tracing::info;

use crate::config::ScheduleConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::extract::{ExtractContext, extract_all};
use crate::ics::{CalendarWriter, read_events};
use crate::talk::Talk;

/// Talks found on the page and the calendar rendered from them.
#[derive(Debug)]
pub struct BuiltCalendar {
    pub talks: Vec<Talk>,
    pub content: String,
}

impl BuiltCalendar {
    pub fn talk_count(&self) -> usize {
        self.talks.len()
    }
}

/// Extract all talks from `html` and render them.
///
/// The rendered calendar is parsed again before returning; the number of
/// events read back must match the number of talks extracted.
pub fn build_calendar(
    html: &str,
    config: &ScheduleConfig,
    generated_at: DateTime<Utc>,
) -> ScheduleResult<BuiltCalendar> {
    let ctx = ExtractContext::from_config(config)?;
    let document = Html::parse_document(html);

    let talks = extract_all(&document, &ctx)?;
    info!(count = talks.len(), "Extracted talks");

    let content = CalendarWriter::from_config(config).render_at(&talks, generated_at);

    let events = read_events(&content, config.timezone.zone)?;
    if events.len() != talks.len() {
        return Err(ScheduleError::IcsParse(format!(
            "Rendered {} talks but read back {} events",
            talks.len(),
            events.len()
        )));
    }

    Ok(BuiltCalendar { talks, content })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Talks | PyCon 2014</title></head>
<body>
<div class="container">
  <div class="span8 presentation well">
    <h3><a href="/2014/schedule/presentation/101/">Rust for Pythonistas</a></h3>
    <h4>Jane Doe</h4>
    <div class="abstract">Memory safety, without the garbage collector.</div>
    <p>
      Friday
      1:40 p.m. &ndash; 2:25 p.m.
      in
      Room 517D
    </p>
  </div>
  <div class="span8 presentation well">
    <h3><a href="/2014/schedule/presentation/102/">Lunchtime Lightning</a></h3>
    <h4>Many Speakers</h4>
    <div class="abstract">Five minutes each.</div>
    <p>
      Sunday
      noon &ndash; 1 p.m.
      in
      Room 710A
    </p>
  </div>
</div>
</body>
</html>"#;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2014-04-01T12:00:00Z").unwrap().into()
    }

    #[test]
    fn builds_calendar_for_each_talk() {
        let built = build_calendar(PAGE, &ScheduleConfig::default(), now()).unwrap();

        assert_eq!(built.talk_count(), 2);
        assert_eq!(built.content.matches("BEGIN:VEVENT").count(), 2);
        assert!(built.content.contains("UID:pycon-2014-2.101\r\n"));
        assert!(built.content.contains("UID:pycon-2014-2.102\r\n"));
        assert!(built.content.contains(
            "DTSTART;TZID=\"Eastern Standard Time\":20140413T120000\r\n"
        ));
        assert!(built.content.contains("DTEND;TZID=\"Eastern Standard Time\":20140413T130000\r\n"));
        assert!(built.content.contains("DESCRIPTION:Memory safety\\, without"));
    }

    #[test]
    fn page_without_talks_yields_empty_calendar() {
        let html = "<html><body><p>Schedule coming soon</p></body></html>";
        let built = build_calendar(html, &ScheduleConfig::default(), now()).unwrap();

        assert_eq!(built.talk_count(), 0);
        assert!(built.content.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(built.content.ends_with("END:VTIMEZONE\r\nEND:VCALENDAR\r\n"));
        assert!(!built.content.contains("VEVENT"));
    }

    #[test]
    fn broken_talk_fails_the_whole_run() {
        let html = PAGE.replace("Sunday", "Someday");
        let err = build_calendar(&html, &ScheduleConfig::default(), now()).unwrap_err();
        assert_eq!(err.to_string(), "Talk 'Lunchtime Lightning': Unknown day 'Someday'");
    }

    #[test]
    fn invalid_source_url_is_rejected() {
        let config = ScheduleConfig {
            source_url: "not a url".to_string(),
            ..ScheduleConfig::default()
        };
        let err = build_calendar(PAGE, &config, now()).unwrap_err();
        assert!(matches!(err, ScheduleError::Url { .. }));
    }
}
