//! Article field extraction.
//!
//! Each field has an ordered list of [`FieldRule`]s. Rules are tried in
//! order and the first one producing non-empty text wins. A field with no
//! successful rule gets [`MISSING_FIELD`], so extraction never fails a
//! record: partial records are kept.

use crate::config::ExtractionConfig;
use crate::error::PipelineError;
use crate::models::{ArticleRecord, MISSING_FIELD};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Elements whose text is never article content.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// How matched element text is flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// All descendant text, trimmed pieces joined by a single space.
    Inline,
    /// Like `Inline`, skipping script/style content.
    Body,
}

/// One lookup rule: "text of the first element matching `selector`".
#[derive(Debug, Clone)]
pub struct FieldRule {
    source: String,
    selector: Selector,
    mode: TextMode,
}

impl FieldRule {
    pub fn parse(field: &str, selector: &str, mode: TextMode) -> Result<Self, PipelineError> {
        let parsed = Selector::parse(selector).map_err(|e| PipelineError::InvalidSelector {
            rule: format!("{field} extraction"),
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            source: selector.to_string(),
            selector: parsed,
            mode,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Text of the first matching element, or `None` if nothing matched
    /// or the match holds only whitespace.
    pub fn apply(&self, document: &Html) -> Option<String> {
        let element = document.select(&self.selector).next()?;
        let text = match self.mode {
            TextMode::Inline => inline_text(element),
            TextMode::Body => body_text(element),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Ordered rules for one field.
#[derive(Debug, Clone)]
pub struct FieldRules {
    field: &'static str,
    rules: Vec<FieldRule>,
}

impl FieldRules {
    fn parse(field: &'static str, selectors: &[String], mode: TextMode) -> Result<Self, PipelineError> {
        let rules = selectors
            .iter()
            .map(|s| FieldRule::parse(field, s, mode))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { field, rules })
    }

    /// First successful rule's text, or `None` when every rule failed.
    pub fn first_match(&self, document: &Html) -> Option<String> {
        self.rules.iter().enumerate().find_map(|(i, rule)| {
            let found = rule.apply(document);
            if found.is_some() {
                debug!(field = self.field, rule = i, selector = rule.source(), "Field matched");
            }
            found
        })
    }
}

/// Extracts [`ArticleRecord`]s from article pages.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    title: FieldRules,
    date: FieldRules,
    author: FieldRules,
    category: FieldRules,
    body: FieldRules,
}

impl FieldExtractor {
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, PipelineError> {
        Ok(Self {
            title: FieldRules::parse("title", &config.title, TextMode::Inline)?,
            date: FieldRules::parse("date", &config.date, TextMode::Inline)?,
            author: FieldRules::parse("author", &config.author, TextMode::Inline)?,
            category: FieldRules::parse("category", &config.category, TextMode::Inline)?,
            body: FieldRules::parse("body", &config.body, TextMode::Body)?,
        })
    }

    /// Build a record for `url` from its page markup.
    pub fn extract(&self, url: &str, markup: &str) -> ArticleRecord {
        let document = Html::parse_document(markup);
        let field = |rules: &FieldRules| {
            rules.first_match(&document).unwrap_or_else(|| {
                warn!(%url, field = rules.field, "Extraction gap; storing sentinel");
                MISSING_FIELD.to_string()
            })
        };

        ArticleRecord {
            url: url.to_string(),
            title: field(&self.title),
            date: field(&self.date),
            author: field(&self.author),
            category: field(&self.category),
            content: field(&self.body),
        }
    }
}

fn inline_text(element: ElementRef<'_>) -> String {
    join_pieces(element.text())
}

fn body_text(element: ElementRef<'_>) -> String {
    let pieces = element.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_CONTENT_TAGS.contains(&el.name()))
        });
        (!hidden).then_some(&**text)
    });
    join_pieces(pieces)
}

/// Trim every piece, drop empty ones, and join with single spaces.
/// Whitespace inside a piece is collapsed too.
fn join_pieces<'a>(pieces: impl Iterator<Item = &'a str>) -> String {
    pieces
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://sport.detik.com/sepakbola/d-123/persib-menang";

    fn extractor() -> FieldExtractor {
        FieldExtractor::from_config(&ExtractionConfig::default()).unwrap()
    }

    const FULL_PAGE: &str = r#"
        <html><body>
          <h1 class="detail__title">  Persib Menang <em>Dramatis</em> </h1>
          <div class="detail__author">Rifqi Ardita</div>
          <div class="detail__date">Minggu, 14 Jan 2024 19:30 WIB</div>
          <div class="detail__label">Liga Indonesia</div>
          <div class="detail__body">
            <p>Persib menang <b>2-1</b> atas Persija &amp; naik ke puncak.</p>
            <script>var ads = "<div>";</script>
            <style>.x { color: red; }</style>
            <p>Gol penentu   dicetak di menit akhir.</p>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extracts_primary_rules() {
        let record = extractor().extract(URL, FULL_PAGE);
        assert_eq!(record.url, URL);
        assert_eq!(record.title, "Persib Menang Dramatis");
        assert_eq!(record.author, "Rifqi Ardita");
        assert_eq!(record.date, "Minggu, 14 Jan 2024 19:30 WIB");
        assert_eq!(record.category, "Liga Indonesia");
        assert_eq!(
            record.content,
            "Persib menang 2-1 atas Persija & naik ke puncak. Gol penentu dicetak di menit akhir."
        );
    }

    #[test]
    fn test_body_has_no_markup() {
        let record = extractor().extract(URL, FULL_PAGE);
        assert!(!record.content.contains('<'));
        assert!(!record.content.contains('>'));
        assert!(!record.content.contains("&amp;"));
        assert!(!record.content.contains("color"));
    }

    #[test]
    fn test_falls_back_to_secondary_rules() {
        let page = r#"
            <h1>Judul</h1>
            <time datetime="2024-01-14">14 Jan 2024</time>
            <span itemprop="author">Tim detikSport</span>
            <nav class="breadcrumb"><a href="/">Sepakbola</a><a href="/x">Liga</a></nav>
            <article class="article__body"><p>Isi</p></article>
        "#;
        let record = extractor().extract(URL, page);
        assert_eq!(record.date, "14 Jan 2024");
        assert_eq!(record.author, "Tim detikSport");
        assert_eq!(record.category, "Sepakbola");
        assert_eq!(record.content, "Isi");
    }

    #[test]
    fn test_empty_primary_match_falls_through() {
        let page = r#"
            <h1>Judul</h1>
            <div class="detail__date">   </div>
            <time>Senin</time>
        "#;
        let record = extractor().extract(URL, page);
        assert_eq!(record.date, "Senin");
    }

    #[test]
    fn test_missing_fields_become_sentinel() {
        let record = extractor().extract(URL, "<html><body><p>nothing here</p></body></html>");
        assert_eq!(record.url, URL);
        assert_eq!(record.title, MISSING_FIELD);
        assert_eq!(record.date, MISSING_FIELD);
        assert_eq!(record.author, MISSING_FIELD);
        assert_eq!(record.category, MISSING_FIELD);
        assert_eq!(record.content, MISSING_FIELD);
    }

    #[test]
    fn test_garbage_markup_does_not_panic() {
        let record = extractor().extract(URL, "<<<>>> </div> <h1");
        assert_eq!(record.author, MISSING_FIELD);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let config = ExtractionConfig {
            title: vec!["h1[".into()],
            ..ExtractionConfig::default()
        };
        let err = FieldExtractor::from_config(&config).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidSelector { .. }));
    }

    #[test]
    fn test_rule_order_is_respected() {
        let config = ExtractionConfig {
            title: vec!["h2".into(), "h1".into()],
            ..ExtractionConfig::default()
        };
        let extractor = FieldExtractor::from_config(&config).unwrap();
        let record = extractor.extract(URL, "<h1>satu</h1><h2>dua</h2>");
        assert_eq!(record.title, "dua");
    }
}
