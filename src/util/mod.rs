//! Shared utilities: atomic file writes and time display helpers.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

use crate::error::{Result, ShelfError};

/// Write a file atomically via a temp file and rename.
///
/// The temp file is created in the target's directory so the rename stays
/// on one filesystem. Readers never observe a partially written file.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = path.parent().ok_or_else(|| ShelfError::IoError {
        context: format!("Cannot determine parent directory for: {}", path.display()),
        source: io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
    })?;

    if !parent.exists() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ShelfError::io(
                format!("Failed to create directory: {}", parent.display()),
                e,
            )
        })?;
    }

    // Temp file in the same directory ensures same filesystem for the rename.
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        ShelfError::io(
            format!("Failed to create temporary file in: {}", parent.display()),
            e,
        )
    })?;

    temp_file.write_all(content).map_err(|e| {
        ShelfError::io(
            format!("Failed to write to temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.flush().map_err(|e| {
        ShelfError::io(
            format!("Failed to flush temporary file for: {}", path.display()),
            e,
        )
    })?;

    temp_file.persist(path).map_err(|e| {
        ShelfError::io(
            format!("Failed to persist file: {}", path.display()),
            e.error,
        )
    })?;

    Ok(())
}

/// Human-readable "how long ago" label for a timestamp.
///
/// Truncates to the largest whole unit ("2h ago", "3days ago"); sub-minute
/// ages and future timestamps (backend clock skew) render as "just now".
#[must_use]
pub fn ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let Ok(age) = (now - then).to_std() else {
        return "just now".to_string();
    };
    if age < Duration::from_secs(60) {
        return "just now".to_string();
    }

    // humantime spells out every unit; keep only the leading one.
    let full = humantime::format_duration(truncate_duration(age)).to_string();
    let head = full.split_whitespace().next().unwrap_or(&full);
    format!("{head} ago")
}

/// Drop everything below the largest unit so the label stays short.
fn truncate_duration(age: Duration) -> Duration {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    let secs = age.as_secs();
    let unit = if secs >= DAY {
        DAY
    } else if secs >= HOUR {
        HOUR
    } else {
        MINUTE
    };
    Duration::from_secs((secs / unit) * unit)
}
