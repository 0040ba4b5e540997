//! The boundary with the external retrieval engine.
//!
//! Ranking happens outside this crate. What lives here is the contract on
//! our side of it:
//!
//! - queries are normalized by the same [`TextPipeline`] as documents
//! - hits (`doc_id`, `score`) are joined back to store records by URL
//!
//! [`Retriever`] is implemented by whatever client talks to the engine.
//! [`HitFile`] reads hits the engine exported as JSON lines.

use crate::error::StoreError;
use crate::models::{ArticleRecord, SearchHit};
use crate::text::TextPipeline;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

/// A ranked full-text search over the emitted corpus.
pub trait Retriever {
    async fn search(&self, query_text: &str, k: usize) -> Result<Vec<SearchHit>, StoreError>;
}

/// Hits previously exported by the engine, one `{"doc_id","score"}` per line.
#[derive(Debug, Clone)]
pub struct HitFile {
    path: PathBuf,
}

impl HitFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Vec<SearchHit>, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        raw.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|source| StoreError::Json {
                    path: self.path.clone(),
                    source,
                })
            })
            .collect()
    }
}

impl Retriever for HitFile {
    /// The query was already run by the engine; only the ranking order and
    /// the `k` cut-off are applied here.
    async fn search(&self, _query_text: &str, k: usize) -> Result<Vec<SearchHit>, StoreError> {
        let mut hits = self.read()?;
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }
}

/// A hit with its article, when the article is known.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedHit<'a> {
    pub rank: usize,
    pub hit: SearchHit,
    pub article: Option<&'a ArticleRecord>,
}

/// Index store records by URL. With duplicate URLs the last record wins,
/// matching what the corpus was built from.
pub fn index_by_url(records: &[ArticleRecord]) -> HashMap<&str, &ArticleRecord> {
    records.iter().map(|r| (r.url.as_str(), r)).collect()
}

/// Attach articles to hits. Unknown `doc_id`s are kept with no article.
pub fn resolve_hits<'a>(
    hits: Vec<SearchHit>,
    index: &HashMap<&str, &'a ArticleRecord>,
) -> Vec<ResolvedHit<'a>> {
    hits.into_iter()
        .enumerate()
        .map(|(i, hit)| {
            let article = index.get(hit.doc_id.as_str()).copied();
            if article.is_none() {
                warn!(doc_id = %hit.doc_id, "Hit has no matching article in store");
            }
            ResolvedHit {
                rank: i + 1,
                hit,
                article,
            }
        })
        .collect()
}

/// Normalize `query` and run it against `retriever`.
pub async fn search<R: Retriever>(
    retriever: &R,
    pipeline: &TextPipeline,
    query: &str,
    k: usize,
) -> Result<(String, Vec<SearchHit>), StoreError> {
    let processed = pipeline.query_text(query);
    info!(%query, %processed, k, "Running search");
    let hits = retriever.search(&processed, k).await?;
    Ok((processed, hits))
}
