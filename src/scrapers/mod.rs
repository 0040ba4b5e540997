//! Category crawling and article scraping.
//!
//! A crawl runs in two phases per category, strictly one request at a time:
//!
//! 1. **Discovery**: fetch the category page and collect article links
//!    ([`frontier`])
//! 2. **Scraping**: fetch each new article and extract a record
//!    ([`extractor`])
//!
//! Failures are scoped. A category page that cannot be fetched skips that
//! category; an article that cannot be fetched skips that article. Nothing
//! short of a store error ends the run early.

pub mod extractor;
pub mod frontier;

use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::fetch::Fetch;
use crate::models::ArticleRecord;
use crate::outputs::store::{self, ArticleStore};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};

/// Counters for one crawl run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub categories_failed: usize,
    pub categories_empty: usize,
    pub links_discovered: usize,
    pub skipped_known: usize,
    pub articles_scraped: usize,
    pub articles_failed: usize,
    /// Records in the store after this run.
    pub total_records: usize,
}

/// Walk every configured category and scrape articles not in `known`.
///
/// URLs seen earlier in the same run are not fetched twice, even when they
/// are listed under several categories.
#[instrument(level = "info", skip_all, fields(categories = ctx.config.categories.len()))]
pub async fn crawl_categories<F: Fetch>(
    ctx: &PipelineContext,
    fetcher: &F,
    known: &HashSet<String>,
) -> (Vec<ArticleRecord>, CrawlReport) {
    let mut report = CrawlReport::default();
    let mut seen: HashSet<String> = HashSet::new();
    let mut scraped = Vec::new();

    for category_url in &ctx.config.categories {
        info!(category = %category_url, "Scraping category");

        let links = match ctx.frontier.discover_article_links(fetcher, category_url).await {
            Ok(links) => links,
            Err(e) => {
                warn!(category = %category_url, error = %e, "Failed to fetch category; skipping");
                report.categories_failed += 1;
                continue;
            }
        };

        if links.is_empty() {
            info!(category = %category_url, "No article links found with the current selectors");
            report.categories_empty += 1;
            continue;
        }
        report.links_discovered += links.len();

        let mut pending = Vec::new();
        for url in links.into_iter().sorted() {
            if !seen.insert(url.clone()) {
                continue;
            }
            if known.contains(&url) && !ctx.config.refetch_known {
                debug!(%url, "Already stored; not refetching");
                report.skipped_known += 1;
                continue;
            }
            pending.push(url);
        }
        info!(category = %category_url, count = pending.len(), "Article links to scrape");

        let attempted = pending.len();
        let records = fetch_articles(ctx, fetcher, category_url, pending).await;
        report.articles_failed += attempted - records.len();
        report.articles_scraped += records.len();
        scraped.extend(records);
    }

    info!(
        scraped = report.articles_scraped,
        failed = report.articles_failed,
        skipped_known = report.skipped_known,
        categories_failed = report.categories_failed,
        categories_empty = report.categories_empty,
        "Crawl finished"
    );
    (scraped, report)
}

/// Fetch and extract `urls` one after the other. Failed fetches are logged
/// and left out.
async fn fetch_articles<F: Fetch>(
    ctx: &PipelineContext,
    fetcher: &F,
    category_url: &str,
    urls: Vec<String>,
) -> Vec<ArticleRecord> {
    stream::iter(urls)
        .then(|url: String| async move {
            match fetcher.fetch(&url).await {
                Ok(markup) => {
                    let record = ctx.extractor.extract(&url, &markup);
                    info!(%url, title = %record.title, "Scraped article");
                    Some(record)
                }
                Err(e) => {
                    warn!(url = %e.url(), category = %category_url, error = %e, "Failed to fetch article; skipping");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await
}

/// Full crawl: load the store, scrape, merge, persist once.
///
/// The store is only written after every category has been walked, so an
/// interrupted run leaves the previous store untouched.
#[instrument(level = "info", skip_all, fields(store = %store.path().display()))]
pub async fn run_crawl<F: Fetch>(
    ctx: &PipelineContext,
    fetcher: &F,
    store: &ArticleStore,
) -> Result<CrawlReport, PipelineError> {
    let mut all = store.load()?;
    let known: HashSet<String> = all.iter().map(|r| r.url.clone()).collect();

    let (scraped, mut report) = crawl_categories(ctx, fetcher, &known).await;

    store::append(&mut all, scraped);
    let all = store::apply_dedup(all, ctx.config.dedup);
    store.persist(&all)?;

    report.total_records = all.len();
    info!(total = all.len(), "Scraping complete");
    Ok(report)
}
