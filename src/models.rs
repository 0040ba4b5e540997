//! Data models shared across the pipeline.
//!
//! - [`ArticleRecord`]: one scraped article, as persisted in the store file
//! - [`CorpusDocument`]: one line of the corpus handed to the external indexer
//! - [`CorpusManifest`]: describes how a corpus file was produced
//! - [`SearchHit`]: one result returned by the external retrieval engine
//!
//! Field names are part of external file formats and must not be renamed.

use serde::{Deserialize, Serialize};

/// Value stored for a field the extractor could not locate.
pub const MISSING_FIELD: &str = "N/A";

/// A scraped article. Identity is [`ArticleRecord::url`].
///
/// Records are created by the field extractor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub date: String,
    pub author: String,
    pub category: String,
    pub content: String,
}

/// One document of the corpus emission file.
///
/// `id` is always the `url` of the record it was derived from, which is how
/// search results are joined back to full article metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CorpusDocument {
    pub id: String,
    pub contents: String,
}

/// Written next to the corpus file so a consumer can tell which
/// normalization produced it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CorpusManifest {
    pub format_version: u32,
    pub normalization: String,
    pub document_count: usize,
    /// Records left out because their normalized text was empty.
    pub skipped_empty: usize,
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
}

/// A ranked result from the external retrieval engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SearchHit {
    pub doc_id: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_record_field_names() {
        let record = ArticleRecord {
            url: "https://sport.detik.com/sepakbola/d-1/a".into(),
            title: "Judul".into(),
            date: "Senin, 01 Jan 2024".into(),
            author: "Tim".into(),
            category: "Sepakbola".into(),
            content: "Isi".into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["author", "category", "content", "date", "title", "url"]
        );
    }

    #[test]
    fn test_corpus_document_is_single_line() {
        let doc = CorpusDocument {
            id: "https://example.com/a".into(),
            contents: "baris satu\nbaris dua".into(),
        };
        let line = serde_json::to_string(&doc).unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(
            line,
            r#"{"id":"https://example.com/a","contents":"baris satu\nbaris dua"}"#
        );
    }
}
