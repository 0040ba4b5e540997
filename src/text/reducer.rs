//! Stop-word removal and stemming.
//!
//! The order of operations is fixed and changes the output if altered:
//!
//! 1. drop tokens exactly matching the domain stop-word set
//! 2. in enhanced mode, drop generic Indonesian stop-words
//! 3. stem what remains
//!
//! Domain stop-words go first because stemming could otherwise rewrite a
//! listed token into a form that no longer matches.

use crate::config::NormalizationMode;
use crate::text::stemmer::Stemmer;
use crate::text::stopwords;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Reducer<S> {
    domain_stopwords: HashSet<String>,
    mode: NormalizationMode,
    stemmer: S,
}

impl<S: Stemmer> Reducer<S> {
    pub fn new<I>(domain_stopwords: I, mode: NormalizationMode, stemmer: S) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            domain_stopwords: domain_stopwords.into_iter().collect(),
            mode,
            stemmer,
        }
    }

    pub fn reduce(&self, text: &str) -> String {
        let kept = self.remove_domain_stopwords(text);
        let kept = match self.mode {
            NormalizationMode::Basic => kept,
            NormalizationMode::Enhanced => stopwords::remove_stopwords(&kept),
        };
        let stemmed = self.stemmer.stem_text(&kept);
        // The stemmer may map a token onto a domain stop-word.
        self.remove_domain_stopwords(&stemmed)
    }

    pub fn remove_domain_stopwords(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|token| !self.domain_stopwords.contains(*token))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
