//! ICS generation and parsing.
//!
//! The writer emits one unfolded line per property so the output matches
//! what Outlook and Google Calendar import without complaint.

mod generate;
mod parse;

pub use generate::{CalendarMeta, CalendarWriter, IcalTime, escape_commas};
pub use parse::{ParsedEvent, read_events};
