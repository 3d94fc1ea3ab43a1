//! Talk extraction from the schedule page.
//!
//! Each talk block looks roughly like:
//!
//! ```html
//! <div class="span8 presentation well">
//!   <h3><a href="/2014/schedule/presentation/123/">Title</a></h3>
//!   <h4>Speaker</h4>
//!   <div>Description ...</div>
//!   <p>
//!     Saturday
//!     10:00 a.m. &ndash; 10:45 a.m.
//!     in
//!     Room A
//!   </p>
//! </div>
//! ```
//!
//! Fields are found by position, so any layout change on the page surfaces
//! as a [`ScheduleError`] naming the talk and the missing piece.

use std::collections::HashMap;

use chrono_tz::Tz;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::config::ScheduleConfig;
use crate::error::{ScheduleError, ScheduleResult};
use crate::markup::{self, Piece};
use crate::normalize::{collapse_whitespace, normalize};
use crate::talk::Talk;
use crate::time::{DayMap, parse_range};

/// Everything extraction needs, resolved once from the config.
#[derive(Debug)]
pub struct ExtractContext {
    pub root_url: Url,
    pub days: DayMap,
    pub zone: Tz,
    pub id_segment: usize,
    pub block_selector: Selector,
}

impl ExtractContext {
    pub fn from_config(config: &ScheduleConfig) -> ScheduleResult<Self> {
        let root_url = Url::parse(&config.source_url).map_err(|source| ScheduleError::Url {
            href: config.source_url.clone(),
            source,
        })?;

        Ok(ExtractContext {
            root_url,
            days: config.days.clone(),
            zone: config.timezone.zone,
            id_segment: config.id_segment,
            block_selector: parse_selector(&config.block_selector)?,
        })
    }
}

/// Day, time range and location lines of a talk's schedule block.
struct Slot<'a> {
    day: &'a str,
    range: &'a str,
    location: &'a str,
}

/// Extract every talk block in document order. Stops at the first failure.
pub fn extract_all(document: &Html, ctx: &ExtractContext) -> ScheduleResult<Vec<Talk>> {
    let mut talks = Vec::new();
    let mut seen: HashMap<u32, String> = HashMap::new();

    for block in document.select(&ctx.block_selector) {
        let talk = extract_talk(block, ctx)?;

        if let Some(first) = seen.insert(talk.id, talk.title.clone()) {
            return Err(ScheduleError::DuplicateId {
                id: talk.id,
                first,
                second: talk.title,
            });
        }

        debug!(id = talk.id, title = %talk.title, start = %talk.start, "Extracted talk");
        talks.push(talk);
    }

    Ok(talks)
}

/// Extract a single talk from its block element.
pub fn extract_talk(block: ElementRef<'_>, ctx: &ExtractContext) -> ScheduleResult<Talk> {
    let pieces = markup::pieces(block);

    let (heading_at, heading) =
        markup::find_child(&pieces, "h3").ok_or_else(|| ScheduleError::MissingField {
            talk: collapse_whitespace(&block.text().collect::<String>()),
            field: "title heading",
        })?;
    let title = clean(&heading.text().collect::<String>());

    let link_selector = parse_selector("a[href]")?;
    let href = heading
        .select(&link_selector)
        .next()
        .and_then(|link| link.value().attr("href"))
        .ok_or_else(|| missing(&title, "link"))?;

    let subtitle_at = markup::next_meaningful(&pieces, heading_at)
        .ok_or_else(|| missing(&title, "subtitle"))?;
    let description_at = markup::next_meaningful(&pieces, subtitle_at)
        .ok_or_else(|| missing(&title, "description"))?;
    let schedule_at = markup::next_meaningful(&pieces, description_at)
        .ok_or_else(|| missing(&title, "location and time"))?;

    let schedule_text = markup::text_of(&pieces[schedule_at]);
    let slot = split_schedule(&schedule_text, &title)?;

    build_talk(&pieces, subtitle_at, description_at, &slot, href, &title, ctx)
        .map_err(|err| err.for_talk(&title))
}

fn build_talk(
    pieces: &[Piece<'_>],
    subtitle_at: usize,
    description_at: usize,
    slot: &Slot<'_>,
    href: &str,
    title: &str,
    ctx: &ExtractContext,
) -> ScheduleResult<Talk> {
    let day = ctx.days.date_for(slot.day)?;
    let (start, end) = parse_range(day, slot.range, ctx.zone)?;

    let url = ctx.root_url.join(href).map_err(|source| ScheduleError::Url {
        href: href.to_string(),
        source,
    })?;
    let id = talk_id(&url, ctx.id_segment)?;

    Ok(Talk {
        id,
        title: title.to_string(),
        subtitle: clean(&markup::text_of(&pieces[subtitle_at])),
        description: clean(&markup::text_of(&pieces[description_at])),
        location: clean(slot.location),
        url,
        start,
        end,
    })
}

/// Split the schedule text into trimmed non-empty lines.
///
/// Line 0 is the day, line 1 the time range, line 3 the location. Line 2
/// sits between range and room and is not used.
fn split_schedule<'a>(text: &'a str, talk: &str) -> ScheduleResult<Slot<'a>> {
    let segments: Vec<&str> = text
        .split('\n')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();

    match segments[..] {
        [day, range, unused, location, ..] => {
            debug!(talk, segment = unused, "Ignoring schedule segment 2");
            Ok(Slot {
                day,
                range,
                location,
            })
        }
        _ => Err(ScheduleError::MalformedSchedule {
            talk: talk.to_string(),
            found: segments.len(),
            text: collapse_whitespace(text),
        }),
    }
}

/// Id from the `segment`-th non-empty path segment, e.g. 123 for
/// `/2014/schedule/presentation/123/` with segment 3.
fn talk_id(url: &Url, segment: usize) -> ScheduleResult<u32> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).nth(segment))
        .and_then(|s| s.trim_end_matches('/').parse::<u32>().ok())
        .ok_or_else(|| ScheduleError::InvalidId(url.to_string()))
}

fn clean(text: &str) -> String {
    normalize(&collapse_whitespace(text))
}

fn missing(talk: &str, field: &'static str) -> ScheduleError {
    ScheduleError::MissingField {
        talk: talk.to_string(),
        field,
    }
}

fn parse_selector(selector: &str) -> ScheduleResult<Selector> {
    Selector::parse(selector).map_err(|e| ScheduleError::Selector {
        selector: selector.to_string(),
        message: format!("{:?}", e),
    })
}
