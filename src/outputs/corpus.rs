//! Corpus emission for the external indexer.
//!
//! # Output
//!
//! ```text
//! corpus.jsonl                one {"id","contents"} object per line
//! corpus.jsonl.manifest.json  format version, normalization mode, counts
//! ```
//!
//! Every `id` is the `url` of exactly one store record. When the store holds
//! several records for one URL, the last one is used.

use crate::config::DedupPolicy;
use crate::error::StoreError;
use crate::models::{ArticleRecord, CorpusDocument, CorpusManifest};
use crate::outputs::store::{apply_dedup, write_atomic};
use crate::text::TextPipeline;
use crate::utils::truncate_for_log;
use chrono::{SecondsFormat, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// Bumped whenever the meaning of `contents` changes.
pub const CORPUS_FORMAT_VERSION: u32 = 1;

/// Derive corpus documents from store records.
///
/// Returns the documents and the number of records skipped because their
/// normalized text came out empty.
pub fn build_documents(
    records: &[ArticleRecord],
    pipeline: &TextPipeline,
) -> (Vec<CorpusDocument>, usize) {
    let unique = apply_dedup(records.to_vec(), DedupPolicy::LastWriteWins);
    let total = unique.len();
    let mut skipped_empty = 0usize;

    let documents = unique
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| {
            if record.url.trim().is_empty() {
                warn!(title = %record.title, "Record without url; not emitted");
                return None;
            }
            debug!(index = i + 1, total, title = %truncate_for_log(&record.title, 30), "Normalizing article");
            let contents = pipeline.document_text(&record.title, &record.content);
            if contents.is_empty() {
                warn!(url = %record.url, "Normalized text is empty; not emitted");
                skipped_empty += 1;
                return None;
            }
            Some(CorpusDocument {
                id: record.url,
                contents,
            })
        })
        .collect();

    (documents, skipped_empty)
}

/// Path of the manifest written next to `corpus_path`.
pub fn manifest_path(corpus_path: &Path) -> PathBuf {
    let mut name = corpus_path.as_os_str().to_owned();
    name.push(".manifest.json");
    PathBuf::from(name)
}

/// Normalize `records` and write the corpus file and its manifest.
#[instrument(level = "info", skip_all, fields(path = %corpus_path.display(), records = records.len()))]
pub fn emit_corpus(
    records: &[ArticleRecord],
    pipeline: &TextPipeline,
    corpus_path: &Path,
) -> Result<CorpusManifest, StoreError> {
    let (documents, skipped_empty) = build_documents(records, pipeline);

    write_atomic(corpus_path, |writer| {
        for doc in &documents {
            serde_json::to_writer(&mut *writer, doc).map_err(std::io::Error::from)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    })?;

    let manifest = CorpusManifest {
        format_version: CORPUS_FORMAT_VERSION,
        normalization: pipeline.mode().as_str().to_string(),
        document_count: documents.len(),
        skipped_empty,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    };
    let manifest_file = manifest_path(corpus_path);
    write_atomic(&manifest_file, |writer| {
        serde_json::to_writer_pretty(&mut *writer, &manifest).map_err(std::io::Error::from)
    })?;

    info!(
        documents = manifest.document_count,
        skipped_empty,
        manifest = %manifest_file.display(),
        "Wrote corpus"
    );
    Ok(manifest)
}
