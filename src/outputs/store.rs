//! The article store: one pretty-printed JSON array of [`ArticleRecord`]s.
//!
//! # Resume
//!
//! [`ArticleStore::load`] returns an empty list when the file does not exist
//! yet. New records are appended to whatever was loaded and the whole list is
//! written back once, at the end of a run. Interrupting a run loses only the
//! records scraped since the last persist.
//!
//! # Atomicity
//!
//! [`ArticleStore::persist`] writes to a temporary file in the store's
//! directory and renames it over the store. A reader never sees a half
//! written file.
//!
//! The store itself never de-duplicates. [`apply_dedup`] applies the
//! configured [`DedupPolicy`] before persisting.

use crate::config::DedupPolicy;
use crate::error::StoreError;
use crate::models::ArticleRecord;
use std::collections::HashMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct ArticleStore {
    path: PathBuf,
}

impl ArticleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the store file lives in. `"."` for a bare file name.
    pub fn dir(&self) -> PathBuf {
        parent_dir(&self.path)
    }

    /// Load all records, or an empty list if the store does not exist.
    ///
    /// # Errors
    ///
    /// A store that exists but does not parse is an error. Overwriting it
    /// with only the newly scraped records would lose data.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        if !self.path.exists() {
            info!("No existing store; starting empty");
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records: Vec<ArticleRecord> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: self.path.clone(),
                source,
            })?;

        info!(count = records.len(), "Loaded existing articles");
        Ok(records)
    }

    /// Atomically replace the store with `records`.
    #[instrument(level = "info", skip_all, fields(path = %self.path.display(), count = records.len()))]
    pub fn persist(&self, records: &[ArticleRecord]) -> Result<(), StoreError> {
        write_atomic(&self.path, |writer| {
            serde_json::to_writer_pretty(&mut *writer, records)
                .map_err(std::io::Error::from)?;
            writer.write_all(b"\n")
        })?;
        info!("Persisted article store");
        Ok(())
    }
}

/// Append `new` to `existing`, skipping records without a URL.
pub fn append(existing: &mut Vec<ArticleRecord>, new: Vec<ArticleRecord>) {
    for record in new {
        if record.url.trim().is_empty() {
            warn!(title = %record.title, "Dropping record without url");
            continue;
        }
        existing.push(record);
    }
}

/// Apply a de-duplication policy to an accumulated record list.
///
/// With [`DedupPolicy::LastWriteWins`] each URL keeps the position of its
/// first occurrence and the values of its last.
pub fn apply_dedup(records: Vec<ArticleRecord>, policy: DedupPolicy) -> Vec<ArticleRecord> {
    match policy {
        DedupPolicy::AppendAll => records,
        DedupPolicy::LastWriteWins => {
            let before = records.len();
            let mut slots: HashMap<String, usize> = HashMap::new();
            let mut out: Vec<ArticleRecord> = Vec::with_capacity(records.len());
            for record in records {
                match slots.get(&record.url) {
                    Some(&i) => out[i] = record,
                    None => {
                        slots.insert(record.url.clone(), out.len());
                        out.push(record);
                    }
                }
            }
            let dropped = before - out.len();
            if dropped > 0 {
                info!(dropped, "Collapsed duplicate URLs (last write wins)");
            }
            out
        }
    }
}

pub(crate) fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Write a file via temp-file-then-rename in the target's directory.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> std::io::Result<()>,
{
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut temp = NamedTempFile::new_in(parent_dir(path)).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(&mut temp);
        write(&mut writer).map_err(io_err)?;
        writer.flush().map_err(io_err)?;
    }
    temp.as_file().sync_all().map_err(io_err)?;
    temp.persist(path).map_err(|source| StoreError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
