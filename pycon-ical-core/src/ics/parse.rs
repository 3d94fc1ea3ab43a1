//! Reading events back out of a generated calendar, using the icalendar
//! crate's parser.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use icalendar::parser::{Component, read_calendar, unfold};

use crate::error::{ScheduleError, ScheduleResult};

/// The parts of a VEVENT needed to check a generated calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEvent {
    pub uid: String,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Parse every VEVENT in `content`. Times without a `Z` suffix are read as
/// wall-clock time in `zone`.
pub fn read_events(content: &str, zone: Tz) -> ScheduleResult<Vec<ParsedEvent>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| ScheduleError::IcsParse(e.to_string()))?;

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(|vevent| parse_event(vevent, zone))
        .collect()
}

fn parse_event(vevent: &Component<'_>, zone: Tz) -> ScheduleResult<ParsedEvent> {
    let prop = |name: &str| {
        vevent
            .find_prop(name)
            .map(|p| p.val.as_ref().to_string())
            .ok_or_else(|| ScheduleError::IcsParse(format!("VEVENT without {}", name)))
    };

    Ok(ParsedEvent {
        uid: prop("UID")?,
        summary: prop("SUMMARY")?,
        start: parse_instant(&prop("DTSTART")?, zone)?,
        end: parse_instant(&prop("DTEND")?, zone)?,
    })
}

fn parse_instant(value: &str, zone: Tz) -> ScheduleResult<DateTime<Utc>> {
    let invalid = || ScheduleError::IcsParse(format!("Invalid date-time '{}'", value));

    match value.strip_suffix('Z') {
        Some(utc) => NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S")
            .map(|dt| dt.and_utc())
            .map_err(|_| invalid()),
        None => {
            let local =
                NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S").map_err(|_| invalid())?;
            zone.from_local_datetime(&local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(invalid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleConfig;
    use crate::ics::CalendarWriter;
    use crate::talk::Talk;
    use chrono_tz::America::New_York;
    use url::Url;

    fn talk(id: u32, start: DateTime<Utc>, end: DateTime<Utc>) -> Talk {
        Talk {
            id,
            title: format!("Talk {}", id),
            subtitle: String::new(),
            description: "A talk, with commas, in it".to_string(),
            location: "Room 710".to_string(),
            url: Url::parse(&format!("https://us.pycon.org/2014/schedule/presentation/{}/", id))
                .unwrap(),
            start,
            end,
        }
    }

    #[test]
    fn round_trip_recovers_utc_instants() {
        let config = ScheduleConfig::default();
        let talks = vec![
            talk(
                1,
                Utc.with_ymd_and_hms(2014, 4, 11, 14, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2014, 4, 11, 14, 30, 0).unwrap(),
            ),
            talk(
                2,
                Utc.with_ymd_and_hms(2014, 4, 13, 20, 10, 0).unwrap(),
                Utc.with_ymd_and_hms(2014, 4, 13, 20, 40, 0).unwrap(),
            ),
        ];

        let ics = CalendarWriter::from_config(&config).render(&talks);
        let events = read_events(&ics, config.timezone.zone).unwrap();

        assert_eq!(events.len(), 2);
        for (event, talk) in events.iter().zip(&talks) {
            assert_eq!(event.uid, talk.uid(&config.uid_prefix));
            assert_eq!(event.summary, talk.title);
            assert_eq!(event.start, talk.start);
            assert_eq!(event.end, talk.end);
        }
    }

    #[test]
    fn utc_values_are_taken_as_is() {
        let instant = parse_instant("20140412T140000Z", New_York).unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2014, 4, 12, 14, 0, 0).unwrap());

        let local = parse_instant("20140412T100000", New_York).unwrap();
        assert_eq!(local, instant);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_instant("tomorrow", New_York).is_err());
        assert!(parse_instant("20140412T1000Z", New_York).is_err());
    }
}
