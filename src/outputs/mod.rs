//! Files written by the pipeline.
//!
//! # Submodules
//!
//! - [`store`]: the resumable article store (pretty JSON array)
//! - [`corpus`]: the line-delimited corpus for the external indexer
//!
//! # Output Structure
//!
//! ```text
//! data/
//! ├── detik_sport_articles_combined.json   # ArticleRecord[]
//! ├── corpus.jsonl                         # {"id","contents"} per line
//! └── corpus.jsonl.manifest.json           # how corpus.jsonl was produced
//! ```
//!
//! Both writers go through a temp file in the target directory followed by
//! a rename.

pub mod corpus;
pub mod store;
