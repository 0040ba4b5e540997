//! Text normalization chain shared by corpus generation and querying.
//!
//! # Submodules
//!
//! - [`normalizer`]: phrase/marker stripping and case folding
//! - [`reducer`]: domain stop-words, generic stop-words, stemming
//! - [`stemmer`]: the Indonesian stemmer
//! - [`stopwords`]: the generic Indonesian stop-word list
//!
//! Documents and queries must go through the same [`TextPipeline`]. A query
//! normalized differently from the corpus silently loses recall.

pub mod normalizer;
pub mod reducer;
pub mod stemmer;
pub mod stopwords;

use crate::config::{Config, NormalizationMode};
use normalizer::Normalizer;
use reducer::Reducer;
use stemmer::IndonesianStemmer;

#[derive(Debug, Clone)]
pub struct TextPipeline {
    normalizer: Normalizer,
    reducer: Reducer<IndonesianStemmer>,
}

impl TextPipeline {
    pub fn from_config(config: &Config) -> Self {
        Self {
            normalizer: Normalizer::new(config.unwanted_phrases.clone(), config.normalization),
            reducer: Reducer::new(
                config.domain_stopwords.iter().cloned(),
                config.normalization,
                IndonesianStemmer,
            ),
        }
    }

    pub fn mode(&self) -> NormalizationMode {
        self.normalizer.mode()
    }

    /// Corpus text for one article.
    pub fn document_text(&self, title: &str, content: &str) -> String {
        self.reducer.reduce(&self.normalizer.clean(title, content))
    }

    /// Query text, normalized exactly like document bodies.
    pub fn query_text(&self, query: &str) -> String {
        let stripped = self.normalizer.strip_artifacts(query);
        self.reducer.reduce(&self.normalizer.fold(&stripped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_text_enhanced() {
        let pipeline = TextPipeline::from_config(&Config::default());
        let out = pipeline.document_text(
            "Persib Menang!",
            "Pertandingan dimainkan di Bandung. SCROLL TO CONTINUE WITH CONTENT Skor 2-1 (abc/def)",
        );
        assert_eq!(out, "persib menang tanding main bandung skor");
    }

    #[test]
    fn test_query_matches_document_terms() {
        let pipeline = TextPipeline::from_config(&Config::default());
        let doc = pipeline.document_text("Jadwal", "Pertandingan Persib");
        let query = pipeline.query_text("pertandingan PERSIB");
        for term in query.split_whitespace() {
            assert!(doc.split_whitespace().any(|t| t == term), "{term} not in {doc}");
        }
    }

    #[test]
    fn test_basic_mode_document_text() {
        let config = Config {
            normalization: NormalizationMode::Basic,
            ..Config::default()
        };
        let pipeline = TextPipeline::from_config(&config);
        assert_eq!(pipeline.mode(), NormalizationMode::Basic);
        let out = pipeline.document_text(
            "Match Report",
            "Hello world. SCROLL TO CONTINUE WITH CONTENT Score 2-1 (abc/def)",
        );
        assert_eq!(out, "match report hello world score 2-1");
    }
}
