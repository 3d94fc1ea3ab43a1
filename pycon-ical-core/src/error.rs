//! Error types for the schedule pipeline.

use thiserror::Error;

/// Errors that can occur while extracting talks or generating the calendar.
///
/// Every variant is fatal to the run: a calendar missing talks is worse than
/// no calendar at all.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Talk '{talk}': missing {field}")]
    MissingField { talk: String, field: &'static str },

    #[error("Talk '{talk}': schedule block has {found} segments, expected at least 4: {text:?}")]
    MalformedSchedule {
        talk: String,
        found: usize,
        text: String,
    },

    #[error("Unknown day '{0}'")]
    UnknownDay(String),

    #[error("Time range '{0}' is not of the form '<start> – <end>'")]
    MalformedRange(String),

    #[error("Unparseable time '{raw}' (normalized to '{normalized}')")]
    TimeParse { raw: String, normalized: String },

    #[error("Local time {local} does not exist in {zone}")]
    NonexistentLocalTime { local: String, zone: String },

    #[error("Time range '{0}' ends before it starts")]
    InvertedRange(String),

    #[error("Invalid talk URL '{href}': {source}")]
    Url {
        href: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Cannot derive talk id from '{0}'")]
    InvalidId(String),

    #[error("Duplicate talk id {id} ('{first}' and '{second}')")]
    DuplicateId {
        id: u32,
        first: String,
        second: String,
    },

    #[error("Talk '{talk}': {source}")]
    Talk {
        talk: String,
        #[source]
        source: Box<ScheduleError>,
    },

    #[error("ICS parse error: {0}")]
    IcsParse(String),
}

impl ScheduleError {
    /// Attach the talk title to an error raised while building that talk.
    pub fn for_talk(self, talk: &str) -> Self {
        match self {
            // Already carries the title
            err @ (ScheduleError::MissingField { .. }
            | ScheduleError::MalformedSchedule { .. }
            | ScheduleError::Talk { .. }) => err,
            other => ScheduleError::Talk {
                talk: talk.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// Result type alias for schedule operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;
