//! Process-wide pipeline state.
//!
//! A [`PipelineContext`] is built once in `main` from the loaded
//! configuration and handed by reference to every stage. Selectors are
//! compiled here, so an invalid configuration fails before any request.

use crate::config::Config;
use crate::error::PipelineError;
use crate::scrapers::extractor::FieldExtractor;
use crate::scrapers::frontier::Frontier;
use crate::text::TextPipeline;
use tracing::{info, instrument};

#[derive(Debug)]
pub struct PipelineContext {
    pub config: Config,
    pub frontier: Frontier,
    pub extractor: FieldExtractor,
    pub text: TextPipeline,
}

impl PipelineContext {
    #[instrument(level = "info", skip_all)]
    pub fn new(config: Config) -> Result<Self, PipelineError> {
        let frontier = Frontier::new(&config.site_prefix, &config.link_selectors)?;
        let extractor = FieldExtractor::from_config(&config.extraction)?;
        let text = TextPipeline::from_config(&config);
        info!(
            site_prefix = %config.site_prefix,
            link_selectors = config.link_selectors.len(),
            normalization = text.mode().as_str(),
            "Pipeline context ready"
        );
        Ok(Self {
            config,
            frontier,
            extractor,
            text,
        })
    }
}
