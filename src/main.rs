//! # Detik Corpus
//!
//! Scrapes news articles from a category-organized site, keeps them in a
//! resumable JSON store, and turns them into a line-delimited corpus for an
//! external BM25 retrieval engine.
//!
//! ## Usage
//!
//! ```sh
//! detik_corpus crawl --store data/articles.json
//! detik_corpus preprocess --store data/articles.json --corpus data/corpus.jsonl
//! detik_corpus query "timnas menang" --hits hits.jsonl --store data/articles.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Discovery**: walk category pages and collect article links
//! 2. **Scraping**: fetch articles one at a time, politely, and extract fields
//! 3. **Persistence**: merge with the existing store and write it atomically
//! 4. **Preprocessing**: clean, fold, drop stop-words and stem into the corpus
//!
//! Ranking and index storage belong to the retrieval engine. Queries sent to
//! it must be normalized with the `query` subcommand's chain.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod context;
mod error;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod search;
mod text;
mod utils;

use cli::{Cli, Command};
use config::Config;
use context::PipelineContext;
use outputs::store::ArticleStore;
use search::{HitFile, index_by_url, resolve_hits};
use utils::{ensure_writable_dir, require_file, shorten};

const SNIPPET_LEN: usize = 400;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("detik_corpus starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = Config::load(args.config.as_deref())?;
    let ctx = PipelineContext::new(config)?;

    let result = match args.command {
        Command::Crawl { store } => crawl(&ctx, &store).await,
        Command::Preprocess { store, corpus } => preprocess(&ctx, &store, &corpus),
        Command::Query {
            text,
            hits,
            store,
            k,
        } => query(&ctx, &text, hits.as_deref(), store.as_deref(), k).await,
    };

    if let Err(e) = &result {
        error!(error = %e, "Run failed");
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    result
}

#[instrument(level = "info", skip(ctx))]
async fn crawl(ctx: &PipelineContext, store_path: &Path) -> Result<(), Box<dyn Error>> {
    let store = ArticleStore::new(store_path);
    ensure_writable_dir(&store.dir()).await?;

    let fetcher = fetch::build_fetcher(&ctx.config)?;
    let report = scrapers::run_crawl(ctx, &fetcher, &store).await?;

    info!(
        scraped = report.articles_scraped,
        failed = report.articles_failed,
        skipped_known = report.skipped_known,
        total = report.total_records,
        path = %store_path.display(),
        "Scraping complete; data saved"
    );
    Ok(())
}

#[instrument(level = "info", skip(ctx))]
fn preprocess(ctx: &PipelineContext, store_path: &Path, corpus_path: &Path) -> Result<(), Box<dyn Error>> {
    require_file(store_path, "article store")?;
    let records = ArticleStore::new(store_path).load()?;

    let manifest = outputs::corpus::emit_corpus(&records, &ctx.text, corpus_path)?;
    info!(
        documents = manifest.document_count,
        skipped_empty = manifest.skipped_empty,
        normalization = %manifest.normalization,
        "Preprocessing complete"
    );
    Ok(())
}

#[instrument(level = "info", skip(ctx))]
async fn query(
    ctx: &PipelineContext,
    text: &str,
    hits_path: Option<&Path>,
    store_path: Option<&Path>,
    k: usize,
) -> Result<(), Box<dyn Error>> {
    let (Some(hits_path), Some(store_path)) = (hits_path, store_path) else {
        println!("{}", ctx.text.query_text(text));
        return Ok(());
    };

    require_file(hits_path, "hits file")?;
    require_file(store_path, "article store")?;
    let records = ArticleStore::new(store_path).load()?;
    let index = index_by_url(&records);

    let retriever = HitFile::new(hits_path);
    let (processed, hits) = search::search(&retriever, &ctx.text, text, k).await?;

    println!("Query: \u{201c}{text}\u{201d}");
    println!("Normalized: \u{201c}{processed}\u{201d}");
    println!("Results: {} documents", hits.len());
    for resolved in resolve_hits(hits, &index) {
        println!();
        println!("#{} - BM25 score: {:.4}", resolved.rank, resolved.hit.score);
        match resolved.article {
            Some(article) => {
                println!("{}", article.title);
                println!("{} • {}", article.date, article.url);
                let snippet = shorten(&article.content, SNIPPET_LEN);
                if !snippet.is_empty() {
                    println!("{snippet}");
                }
            }
            None => println!("(article details not found for doc_id: {})", resolved.hit.doc_id),
        }
    }
    Ok(())
}
