//! Category page link discovery.
//!
//! Every configured link selector is applied to the category page and the
//! matches of *all* selectors are unioned. A broad selector such as
//! `article a` still contributes when a narrower one also matched. Links are
//! resolved against the category URL, filtered to the site prefix and
//! de-duplicated.

use crate::error::{FetchError, PipelineError};
use crate::fetch::Fetch;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument};
use url::Url;

/// One link discovery strategy: every `href` of elements matching a selector.
#[derive(Debug, Clone)]
pub struct LinkRule {
    source: String,
    selector: Selector,
}

impl LinkRule {
    pub fn parse(selector: &str) -> Result<Self, PipelineError> {
        let parsed = Selector::parse(selector).map_err(|e| PipelineError::InvalidSelector {
            rule: "link discovery".to_string(),
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: selector.to_string(),
            selector: parsed,
        })
    }

    /// Raw `href` values of all matching elements, in document order.
    pub fn candidates<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = &'a str> + 'a {
        document
            .select(&self.selector)
            .filter_map(|element| element.value().attr("href"))
    }
}

/// Walks category pages and yields article URLs.
#[derive(Debug, Clone)]
pub struct Frontier {
    site_prefix: String,
    rules: Vec<LinkRule>,
}

impl Frontier {
    pub fn new(site_prefix: &str, selectors: &[String]) -> Result<Self, PipelineError> {
        let rules = selectors
            .iter()
            .map(|s| LinkRule::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            site_prefix: site_prefix.to_string(),
            rules,
        })
    }

    /// Fetch `category_url` and return the unique article links on it.
    ///
    /// A page with no matching link is not an error: the result is empty.
    #[instrument(level = "info", skip(self, fetcher))]
    pub async fn discover_article_links<F: Fetch>(
        &self,
        fetcher: &F,
        category_url: &str,
    ) -> Result<HashSet<String>, FetchError> {
        let markup = fetcher.fetch(category_url).await?;
        let links = self.collect_links(category_url, &markup);
        info!(count = links.len(), "Discovered article links");
        Ok(links)
    }

    /// Union of all rules' candidates, resolved, filtered and de-duplicated.
    pub fn collect_links(&self, category_url: &str, markup: &str) -> HashSet<String> {
        let document = Html::parse_document(markup);
        let base = Url::parse(category_url).ok();

        let mut links = HashSet::new();
        for rule in &self.rules {
            let before = links.len();
            for href in rule.candidates(&document) {
                if let Some(link) = self.resolve(base.as_ref(), href) {
                    links.insert(link);
                }
            }
            debug!(
                selector = %rule.source,
                added = links.len() - before,
                "Applied link selector"
            );
        }
        links
    }

    fn resolve(&self, base: Option<&Url>, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let absolute = match base {
            Some(base) => base.join(href).ok()?.to_string(),
            None => href.to_string(),
        };
        absolute
            .starts_with(&self.site_prefix)
            .then_some(absolute)
    }
}
