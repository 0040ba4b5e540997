//! Runtime configuration.
//!
//! Configuration is read from an optional YAML file. Every field has a
//! default matching the sport.detik.com layout, so a file only needs to name
//! the values it overrides:
//!
//! ```yaml
//! politeness_delay_ms: 2000
//! categories:
//!   - https://sport.detik.com/sepakbola
//! normalization: basic
//! ```

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

/// How raw article text is turned into corpus text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationMode {
    /// Phrase and marker stripping, domain stop-words, stemming.
    Basic,
    /// Basic plus case folding, punctuation/digit removal and generic
    /// stop-word removal. This is the canonical corpus format.
    #[default]
    Enhanced,
}

impl NormalizationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationMode::Basic => "basic",
            NormalizationMode::Enhanced => "enhanced",
        }
    }
}

/// What to do with several records sharing one URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Keep every record, duplicates included.
    AppendAll,
    /// Keep one record per URL holding the most recently scraped values.
    #[default]
    LastWriteWins,
}

/// Ordered selector lists for each article field. The first selector that
/// yields non-empty text wins.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub title: Vec<String>,
    pub date: Vec<String>,
    pub author: Vec<String>,
    pub category: Vec<String>,
    pub body: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            title: vec!["h1".into()],
            date: vec!["div.detail__date".into(), "time".into()],
            author: vec![
                "div.detail__author".into(),
                ".author, .meta__author, span[itemprop='author']".into(),
            ],
            category: vec![
                "div.detail__label".into(),
                ".breadcrumb a, .kategori".into(),
            ],
            body: vec![
                "div.detail__body".into(),
                ".detail__body, .detail__content, .article__body".into(),
            ],
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Only links starting with this prefix are treated as articles.
    pub site_prefix: String,
    /// Category listing pages, walked in order.
    pub categories: Vec<String>,
    /// Link selectors applied to every category page. Matches from all
    /// selectors are unioned.
    pub link_selectors: Vec<String>,
    pub extraction: ExtractionConfig,
    pub request_timeout_secs: u64,
    /// Minimum pause between two consecutive requests.
    pub politeness_delay_ms: u64,
    pub max_retries: usize,
    pub retry_base_delay_ms: u64,
    pub user_agent: String,
    /// Removed verbatim (case-sensitive) from article content.
    pub unwanted_phrases: Vec<String>,
    /// Tokens dropped before generic stop-word removal. Matched exactly.
    pub domain_stopwords: Vec<String>,
    pub normalization: NormalizationMode,
    pub dedup: DedupPolicy,
    /// Fetch articles again even when their URL is already in the store.
    pub refetch_known: bool,
}

impl Default for Config {
    fn default() -> Self {
        let categories = [
            "sepakbola",
            "sport-lain",
            "raket",
            "moto-gp",
            "f1",
            "basket",
            "sepakbola/liga-inggris",
            "sepakbola/liga-italia",
            "sepakbola/liga-spanyol",
            "sepakbola/liga-jerman",
            "sepakbola/liga-indonesia",
            "sepakbola/uefa",
            "sepakbola/bola-dunia",
        ]
        .iter()
        .map(|path| format!("https://sport.detik.com/{path}"))
        .collect();

        Self {
            site_prefix: "https://sport.detik.com".into(),
            categories,
            link_selectors: vec![
                "article a.media__link".into(),
                "article a".into(),
                ".list-content__item a.media__link".into(),
                ".list-content__item a".into(),
            ],
            extraction: ExtractionConfig::default(),
            request_timeout_secs: 10,
            politeness_delay_ms: 1000,
            max_retries: 2,
            retry_base_delay_ms: 500,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into(),
            unwanted_phrases: vec![
                "SCROLL TO CONTINUE WITH CONTENT".into(),
                "ADVERTISEMENT".into(),
            ],
            domain_stopwords: [
                "detik",
                "detikcom",
                "detiksport",
                "baca",
                "scroll",
                "continue",
                "with",
                "content",
                "advertisement",
                "gambas",
                "video",
                "foto",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            normalization: NormalizationMode::default(),
            dedup: DedupPolicy::default(),
            refetch_known: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or the defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::MissingResource`] when a path is given but absent,
    /// [`PipelineError::Config`] when the YAML does not parse.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, PipelineError> {
        let Some(path) = path else {
            info!("No config file given; using built-in defaults");
            return Ok(Self::default());
        };

        if !path.is_file() {
            return Err(PipelineError::MissingResource {
                what: "config file",
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| PipelineError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            categories = config.categories.len(),
            normalization = config.normalization.as_str(),
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not to a struct.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}
