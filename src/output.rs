//! Writing the calendar file.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

/// Replace whatever is at `path` with `content`.
///
/// An existing file is removed first. A failure part-way through the write
/// leaves a truncated file behind.
pub fn write_calendar(path: &Path, content: &str) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed previous calendar"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e)
                .with_context(|| format!("Failed to remove existing file at {}", path.display()));
        }
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create calendar file at {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    writer
        .write_all(content.as_bytes())
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write calendar file at {}", path.display()))?;

    info!(path = %path.display(), bytes = content.len(), "Wrote calendar");

    Ok(())
}
