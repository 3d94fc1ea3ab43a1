//! The talk record produced by extraction and consumed by the ICS writer.

use chrono::{DateTime, Utc};
use url::Url;

/// One talk from the schedule page.
#[derive(Debug, Clone, PartialEq)]
pub struct Talk {
    /// Numeric id taken from the detail URL, stable across runs
    pub id: u32,
    pub title: String,
    pub subtitle: String,
    /// Whitespace-collapsed abstract
    pub description: String,
    pub location: String,
    /// Absolute URL of the talk's detail page
    pub url: Url,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Talk {
    /// Event UID, e.g. `pycon-2014-2.123`
    pub fn uid(&self, prefix: &str) -> String {
        format!("{}.{}", prefix, self.id)
    }
}
