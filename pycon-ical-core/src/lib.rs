//! Core pipeline for turning the PyCon talk list into an ICS calendar.
//!
//! - `normalize` cleans up text pulled out of the markup
//! - `time` turns "Saturday" + "10:00 a.m. – 10:45 a.m." into UTC instants
//! - `markup` and `extract` walk a talk block and build a [`Talk`]
//! - `ics` renders talks to iCalendar text and reads it back
//! - `schedule` wires the steps together for the binary

pub mod config;
pub mod error;
pub mod extract;
pub mod ics;
pub mod markup;
pub mod normalize;
pub mod schedule;
pub mod talk;
pub mod time;

pub use config::{ScheduleConfig, TimezoneDefinition, TransitionRule};
pub use error::{ScheduleError, ScheduleResult};
pub use talk::Talk;
