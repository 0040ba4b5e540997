//! Command-line interface definitions.
//!
//! Every path can also be given through an environment variable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the corpus pipeline.
///
/// # Examples
///
/// ```sh
/// # Scrape all configured categories into the store (resumes if present)
/// detik_corpus crawl --store data/detik_sport_articles_combined.json
///
/// # Turn the store into a corpus for the indexer
/// detik_corpus preprocess --store data/detik_sport_articles_combined.json --corpus data/corpus.jsonl
///
/// # Show how a query will be normalized before it is sent to the engine
/// detik_corpus query "Persib menang"
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, global = true, env = "DETIK_CORPUS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape configured categories and append new articles to the store
    Crawl {
        /// Article store (JSON array); created if absent
        #[arg(short, long, env = "DETIK_CORPUS_STORE", default_value = "detik_sport_articles_combined.json")]
        store: PathBuf,
    },

    /// Normalize the store into a line-delimited corpus
    Preprocess {
        /// Article store to read; must exist
        #[arg(short, long, env = "DETIK_CORPUS_STORE", default_value = "detik_sport_articles_combined.json")]
        store: PathBuf,

        /// Corpus file to write
        #[arg(short = 'o', long, env = "DETIK_CORPUS_OUTPUT", default_value = "pyserini_corpus_stemmed.jsonl")]
        corpus: PathBuf,
    },

    /// Normalize a query exactly like corpus documents
    Query {
        /// Free-text query
        text: String,

        /// Hits exported by the retrieval engine, one {"doc_id","score"} per line
        #[arg(long, requires = "store")]
        hits: Option<PathBuf>,

        /// Article store used to resolve hits
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Number of results to show
        #[arg(short, long, default_value_t = 10)]
        k: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crawl_parsing() {
        let cli = Cli::parse_from([
            "detik_corpus",
            "crawl",
            "--store",
            "./data/articles.json",
        ]);
        assert!(cli.config.is_none());
        match cli.command {
            Command::Crawl { store } => assert_eq!(store, PathBuf::from("./data/articles.json")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_preprocess_short_flags_and_global_config() {
        let cli = Cli::parse_from([
            "detik_corpus",
            "preprocess",
            "-s",
            "/tmp/a.json",
            "-o",
            "/tmp/c.jsonl",
            "-c",
            "/tmp/config.yaml",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.yaml")));
        match cli.command {
            Command::Preprocess { store, corpus } => {
                assert_eq!(store, PathBuf::from("/tmp/a.json"));
                assert_eq!(corpus, PathBuf::from("/tmp/c.jsonl"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_query_defaults() {
        let cli = Cli::parse_from(["detik_corpus", "query", "liga 1"]);
        match cli.command {
            Command::Query { text, hits, store, k } => {
                assert_eq!(text, "liga 1");
                assert!(hits.is_none());
                assert!(store.is_none());
                assert_eq!(k, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_query_hits_require_store() {
        let res = Cli::try_parse_from(["detik_corpus", "query", "x", "--hits", "h.jsonl"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
