//! Small helpers: string shortening for logs and display, and the startup
//! precondition checks run before any work begins.

use crate::error::PipelineError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with an ellipsis and a byte
/// count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}…(+{} bytes)", &s[..cut], s.len() - cut),
    }
}

/// Shorten text for display: newlines become spaces, and text longer than
/// `max_len` characters is cut to `max_len - 1` characters plus `…`.
pub fn shorten(text: &str, max_len: usize) -> String {
    let text = text.trim().replace('\n', " ");
    if text.chars().count() <= max_len {
        return text;
    }
    let kept: String = text.chars().take(max_len.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Fail with [`PipelineError::MissingResource`] unless `path` is a file.
pub fn require_file(path: &Path, what: &'static str) -> Result<(), PipelineError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::MissingResource {
            what,
            path: path.to_path_buf(),
        })
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and removes a
/// probe file in it.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), PipelineError> {
    let io_err = |source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(path).await.map_err(io_err)?;
    let probe_path: PathBuf = path.join("..__probe_write__");
    fs::write(&probe_path, b"").await.map_err(io_err)?;
    let _ = fs::remove_file(&probe_path).await;
    info!("Output directory is writable");
    Ok(())
}
