pub mod lines;
pub mod sections;
pub mod snippets;

use crate::scoring::KeywordSet;
use crate::settings::{PipelineConfig, SnippetStrategy};
use crate::source::ExtractedText;
use sections::{SegmentOptions, Section};
use snippets::Snippet;

#[derive(Debug, Default)]
pub struct DocumentResult {
    pub sections: Vec<Section>,
    pub snippets: Vec<Snippet>,
}

/// Text stream → scored lines → sections (+ snippets per the configured strategy).
pub fn process_document(
    document: &str,
    text: &ExtractedText,
    keywords: &KeywordSet,
    cfg: &PipelineConfig,
) -> DocumentResult {
    let lines = lines::classify_lines(text, keywords, cfg.heading_rule);
    let opts = SegmentOptions {
        heading_threshold: cfg.heading_threshold,
        body_max_tokens: cfg.body_max_tokens,
        require_body: cfg.require_body,
    };
    let sections = sections::segment(document, &lines, &opts);
    let snippets = match cfg.snippet_strategy {
        SnippetStrategy::Buffered => snippets::buffered(document, &lines),
        SnippetStrategy::SectionBody => snippets::from_sections(&sections),
        SnippetStrategy::Line => snippets::from_lines(document, &lines),
        SnippetStrategy::Title => snippets::from_titles(&sections),
    };

    DocumentResult { sections, snippets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{HeadingRule, KeywordPreset};

    fn fixture(name: &str) -> ExtractedText {
        let raw = std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap();
        let pages: Vec<&str> = raw.split('\x0C').collect();
        ExtractedText::from_pages(&pages)
    }

    fn run(name: &str, strategy: SnippetStrategy) -> DocumentResult {
        let cfg = PipelineConfig {
            snippet_strategy: strategy,
            ..Default::default()
        };
        let kw = cfg.keyword_set().unwrap();
        process_document(name, &fixture(name), &kw, &cfg)
    }

    #[test]
    fn fill_and_sign_fixture() {
        let result = run("fill_and_sign", SnippetStrategy::SectionBody);
        let titles: Vec<&str> = result.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Fill and Sign PDF Forms",
                "Create Interactive Form Fields",
                "Request Signatures To Share Documents",
            ]
        );
        assert_eq!(result.sections[0].page, 1);
        assert_eq!(result.sections[2].page, 3);
        assert_eq!(result.snippets.len(), result.sections.len());
        for (section, snippet) in result.sections.iter().zip(&result.snippets) {
            assert_eq!(section.body, snippet.text);
            assert_eq!(section.score, snippet.score);
        }
    }

    #[test]
    fn fill_and_sign_buffered() {
        let result = run("fill_and_sign", SnippetStrategy::Buffered);
        assert_eq!(result.sections.len(), 3);
        assert!(!result.snippets.is_empty());
        for s in &result.snippets {
            assert!(s.text.chars().count() > snippets::BUFFER_MIN_CHARS);
            assert!(s.score >= 5);
        }
    }

    #[test]
    fn fill_and_sign_lines() {
        let result = run("fill_and_sign", SnippetStrategy::Line);
        assert!(!result.snippets.is_empty());
        for s in &result.snippets {
            assert!(s.text.chars().count() > snippets::LINE_MIN_CHARS);
            assert!(s.score >= 2);
        }
    }

    #[test]
    fn unrelated_fixture_yields_nothing() {
        let result = run("unrelated", SnippetStrategy::SectionBody);
        assert!(result.sections.is_empty());
        assert!(result.snippets.is_empty());
    }

    #[test]
    fn empty_text_yields_nothing() {
        let cfg = PipelineConfig::default();
        let kw = cfg.keyword_set().unwrap();
        let empty = ExtractedText::from_pages(&[""]);
        for strategy in [
            SnippetStrategy::Buffered,
            SnippetStrategy::SectionBody,
            SnippetStrategy::Line,
            SnippetStrategy::Title,
        ] {
            let cfg = PipelineConfig {
                snippet_strategy: strategy,
                ..Default::default()
            };
            let result = process_document("empty.pdf", &empty, &kw, &cfg);
            assert!(result.sections.is_empty());
            assert!(result.snippets.is_empty());
        }
    }

    #[test]
    fn numbered_headings_report_titles() {
        let cfg = PipelineConfig {
            heading_rule: HeadingRule::Numbered,
            heading_threshold: 1,
            require_body: false,
            snippet_strategy: SnippetStrategy::Title,
            keyword_preset: KeywordPreset::Travel,
            ..Default::default()
        };
        let kw = cfg.keyword_set().unwrap();
        let text = ExtractedText::from_pages(&[
            "1. Hotel\nA short note on the coast\nnothing to see here at all today",
            "Pack light for the trip, friends.",
        ]);

        let result = process_document("guide.pdf", &text, &kw, &cfg);
        let sections: Vec<(&str, usize, u32)> = result
            .sections
            .iter()
            .map(|s| (s.title.as_str(), s.page, s.score))
            .collect();
        assert_eq!(
            sections,
            vec![
                ("1. Hotel", 1, 1),
                ("A short note on the coast", 1, 1),
                ("Pack light for the trip, friends.", 2, 2),
            ]
        );
        let texts: Vec<&str> = result.snippets.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["1. Hotel", "A short note on the coast", "Pack light for the trip, friends."]
        );
    }
}
