//! Text cleanup applied to scraped articles before reduction.
//!
//! `clean(title, content)` runs, in order:
//!
//! 1. trim title and content
//! 2. remove every configured unwanted phrase from content (exact, case-sensitive)
//! 3. remove `[Gambas:Video ...]` markers and a trailing `(word/word)` byline
//! 4. join as `"{title}. {content}"`
//! 5. in enhanced mode, lowercase and replace every non-letter, non-whitespace
//!    character with a space
//!
//! The order matters: phrases are removed before the byline pattern, so a
//! byline that was followed by an unwanted phrase is still anchored at the end.

use crate::config::NormalizationMode;
use once_cell::sync::Lazy;
use regex::Regex;

static VIDEO_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[Gambas:Video.*?\]").expect("valid video marker regex"));
static TRAILING_BYLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\w+/\w+\)$").expect("valid byline regex"));

/// Deterministic article text cleaner.
#[derive(Debug, Clone)]
pub struct Normalizer {
    unwanted_phrases: Vec<String>,
    mode: NormalizationMode,
}

impl Normalizer {
    pub fn new(unwanted_phrases: Vec<String>, mode: NormalizationMode) -> Self {
        // An empty phrase would match everywhere and remove nothing useful.
        let unwanted_phrases = unwanted_phrases
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            unwanted_phrases,
            mode,
        }
    }

    pub fn mode(&self) -> NormalizationMode {
        self.mode
    }

    /// Clean an article into a single string ready for reduction.
    pub fn clean(&self, title: &str, content: &str) -> String {
        let combined = format!("{}. {}", title.trim(), self.strip_artifacts(content));
        self.fold(&combined)
    }

    /// Steps 1 to 3 on content alone. The result is trimmed.
    pub fn strip_artifacts(&self, content: &str) -> String {
        let mut content = content.trim().to_string();
        for phrase in &self.unwanted_phrases {
            if content.contains(phrase.as_str()) {
                content = content.replace(phrase.as_str(), "");
            }
        }
        let content = VIDEO_MARKER.replace_all(&content, "");
        let content = TRAILING_BYLINE.replace(&content, "");
        content.trim().to_string()
    }

    /// Step 5. Identity in basic mode.
    pub fn fold(&self, text: &str) -> String {
        match self.mode {
            NormalizationMode::Basic => text.to_string(),
            NormalizationMode::Enhanced => case_fold(text),
        }
    }
}

/// Lowercase, then map every character that is neither a lowercase letter
/// nor whitespace to a single space. Runs of spaces are left as they are.
pub fn case_fold(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_whitespace() || (c.is_alphabetic() && c.is_lowercase()) {
                c
            } else {
                ' '
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic() -> Normalizer {
        Normalizer::new(
            vec![
                "SCROLL TO CONTINUE WITH CONTENT".into(),
                "ADVERTISEMENT".into(),
            ],
            NormalizationMode::Basic,
        )
    }

    fn enhanced() -> Normalizer {
        Normalizer::new(
            vec!["SCROLL TO CONTINUE WITH CONTENT".into()],
            NormalizationMode::Enhanced,
        )
    }

    #[test]
    fn test_match_report_scenario() {
        let out = basic().clean(
            "Match Report",
            "Hello world. SCROLL TO CONTINUE WITH CONTENT Score 2-1 (abc/def)",
        );
        assert_eq!(out, "Match Report. Hello world.  Score 2-1");
    }

    #[test]
    fn test_trims_title_and_content() {
        let out = basic().clean("  Judul  ", "\n  Isi berita.  \n");
        assert_eq!(out, "Judul. Isi berita.");
    }

    #[test]
    fn test_removes_all_phrase_occurrences() {
        let out = basic().strip_artifacts("a ADVERTISEMENT b ADVERTISEMENT c");
        assert_eq!(out, "a  b  c");
    }

    #[test]
    fn test_phrase_match_is_case_sensitive() {
        let out = basic().strip_artifacts("an advertisement here");
        assert_eq!(out, "an advertisement here");
    }

    #[test]
    fn test_removes_video_markers_non_greedy() {
        let out = basic().strip_artifacts(
            "Gol indah. [Gambas:Video 20detik] Lanjut [Gambas:Video 20detik] selesai",
        );
        assert_eq!(out, "Gol indah.  Lanjut  selesai");
    }

    #[test]
    fn test_byline_only_removed_at_end() {
        let n = basic();
        assert_eq!(n.strip_artifacts("kata (yna/aff) lanjut"), "kata (yna/aff) lanjut");
        assert_eq!(n.strip_artifacts("kata lanjut (yna/aff)"), "kata lanjut");
        assert_eq!(n.strip_artifacts("kata lanjut (yna aff)"), "kata lanjut (yna aff)");
    }

    #[test]
    fn test_video_marker_then_byline() {
        let out = basic().strip_artifacts("Persib menang (rin/ran)[Gambas:Video 20detik]");
        assert_eq!(out, "Persib menang");
    }

    #[test]
    fn test_enhanced_folds_case_and_strips_punctuation() {
        let out = enhanced().clean("Match Report", "Score 2-1, great!");
        assert_eq!(out, "match report  score      great ");
    }

    #[test]
    fn test_enhanced_keeps_whitespace_runs() {
        assert_eq!(case_fold("A\tB\nC"), "a\tb\nc");
        assert_eq!(case_fold("1.5"), "   ");
    }

    #[test]
    fn test_clean_is_idempotent_on_content() {
        let n = basic();
        let inputs = [
            "Hello world. SCROLL TO CONTINUE WITH CONTENT Score 2-1 (abc/def)",
            "  Lead. [Gambas:Video 20detik] tail  ",
            "plain text",
            "",
        ];
        for input in inputs {
            let once = n.strip_artifacts(input);
            let twice = n.strip_artifacts(&once);
            assert_eq!(once, twice, "input: {input:?}");
            assert_eq!(n.clean("T", input), n.clean("T", &once));
        }
    }

    #[test]
    fn test_enhanced_fold_is_idempotent() {
        let n = enhanced();
        let once = n.fold("Liga 1: Persib vs Persija!");
        assert_eq!(n.fold(&once), once);
    }

    #[test]
    fn test_empty_phrases_ignored() {
        let n = Normalizer::new(vec![String::new()], NormalizationMode::Basic);
        assert_eq!(n.strip_artifacts("abc"), "abc");
    }
}
