use tracing::debug;

use super::lines::TextLine;

/// A closed section's joined body must be longer than this to be kept.
pub const BODY_MIN_CHARS: usize = 50;
/// Body lines must be longer than this.
const BODY_LINE_MIN_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub document: String,
    pub title: String,
    pub page: usize,
    /// Score of the heading line alone.
    pub score: u32,
    /// 0 until the corpus-wide ranking pass.
    pub rank: usize,
    pub body: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SegmentOptions {
    pub heading_threshold: u32,
    pub body_max_tokens: Option<usize>,
    /// Apply the `BODY_MIN_CHARS` gate when a section closes.
    pub require_body: bool,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            heading_threshold: 2,
            body_max_tokens: None,
            require_body: true,
        }
    }
}

struct OpenSection<'a> {
    heading: &'a TextLine,
    body: Vec<&'a str>,
}

impl OpenSection<'_> {
    /// `None` when a body is required and the joined body is too short.
    fn close(self, document: &str, require_body: bool) -> Option<Section> {
        let body = self.body.join(" ");
        if require_body && body.chars().count() <= BODY_MIN_CHARS {
            return None;
        }
        Some(Section {
            document: document.to_string(),
            title: self.heading.text.clone(),
            page: self.heading.page,
            score: self.heading.score,
            rank: 0,
            body,
        })
    }
}

/// Walk the lines once, opening a section at every heading candidate that
/// clears the score threshold and collecting relevant lines beneath it.
pub fn segment(document: &str, lines: &[TextLine], opts: &SegmentOptions) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut open: Option<OpenSection> = None;

    for line in lines {
        if line.is_empty() {
            continue;
        }

        if line.heading && line.score >= opts.heading_threshold {
            if let Some(prev) = open.take() {
                sections.extend(prev.close(document, opts.require_body));
            }
            debug!("{}: heading at line {}: {}", document, line.index, line.text);
            open = Some(OpenSection {
                heading: line,
                body: Vec::new(),
            });
            continue;
        }

        if let Some(current) = open.as_mut() {
            if is_body_line(line, opts) {
                current.body.push(&line.text);
            }
        }
    }

    if let Some(last) = open {
        sections.extend(last.close(document, opts.require_body));
    }

    sections
}

fn is_body_line(line: &TextLine, opts: &SegmentOptions) -> bool {
    line.chars > BODY_LINE_MIN_CHARS
        && line.score >= 1
        && opts.body_max_tokens.map_or(true, |max| line.tokens < max)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::classify_lines;
    use crate::scoring::{KeywordSet, FORMS_KEYWORDS};
    use crate::settings::HeadingRule;
    use crate::source::ExtractedText;

    fn run(text: &str, pages: usize, opts: SegmentOptions) -> Vec<Section> {
        let kw = KeywordSet::new(FORMS_KEYWORDS, &[]).unwrap();
        let doc = ExtractedText {
            total_pages: pages,
            text: text.to_string(),
        };
        segment("doc.pdf", &classify_lines(&doc, &kw, HeadingRule::Titled), &opts)
    }

    #[test]
    fn signature_form_scenario() {
        let text = "Create Signature Form\nPlease fill the attached form and sign the document before submission. This interactive form supports digital signature workflow.";
        let sections = run(text, 1, SegmentOptions::default());
        assert_eq!(sections.len(), 1);
        let s = &sections[0];
        assert_eq!(s.document, "doc.pdf");
        assert_eq!(s.title, "Create Signature Form");
        assert_eq!(s.page, 1);
        assert_eq!(s.score, 3);
        assert_eq!(s.rank, 0);
        assert!(s.body.chars().count() > BODY_MIN_CHARS);
    }

    #[test]
    fn empty_document() {
        assert!(run("", 1, SegmentOptions::default()).is_empty());
    }

    #[test]
    fn short_body_discarded() {
        let text = "Create Signature Form\nwe then fill the form.\nExport Forms To PDF Files\nPlease fill the attached form and sign the document before submission today.";
        let sections = run(text, 1, SegmentOptions::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Export Forms To PDF Files");
    }

    #[test]
    fn bare_headings_kept_without_body_gate() {
        let text = "Create Signature Form\nwe then fill the form.\nExport Forms To PDF Files";
        assert!(run(text, 1, SegmentOptions::default()).is_empty());

        let opts = SegmentOptions {
            require_body: false,
            ..Default::default()
        };
        let sections = run(text, 2, opts);
        let got: Vec<(&str, &str, usize)> = sections
            .iter()
            .map(|s| (s.title.as_str(), s.body.as_str(), s.page))
            .collect();
        assert_eq!(
            got,
            vec![
                ("Create Signature Form", "we then fill the form.", 1),
                ("Export Forms To PDF Files", "", 2),
            ]
        );
    }

    #[test]
    fn heading_below_threshold_is_body() {
        // "Share the document" is an action-verb line scoring 2; with T=3 it is body text
        let text = "Create Signature Form\nShare the document with every reviewer\nthe signature request goes out by email to the team";
        let opts = SegmentOptions {
            heading_threshold: 3,
            ..Default::default()
        };
        let sections = run(text, 1, opts);
        assert_eq!(sections.len(), 1);
        assert!(sections[0].body.starts_with("Share the document"));
        assert!(sections[0].body.ends_with("to the team"));
    }

    #[test]
    fn irrelevant_and_short_lines_dropped() {
        let text = "Create Signature Form\nnothing relevant is said on this line at all\ntiny form\nthe signature field sits at the bottom of every page.\nanother sign in the signature block.";
        let sections = run(text, 1, SegmentOptions::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].body,
            "the signature field sits at the bottom of every page. another sign in the signature block."
        );
    }

    #[test]
    fn body_max_tokens_limits_lines() {
        let text = "Create Signature Form\nthe signature field sits at the bottom of every page in the form";
        let opts = SegmentOptions {
            body_max_tokens: Some(5),
            ..Default::default()
        };
        assert!(run(text, 1, opts).is_empty());
    }

    #[test]
    fn sections_never_exceed_qualifying_headings() {
        let text = "Create Signature Form\nExport Forms To PDF\nConvert Documents To PDF\nthe signature field sits at the bottom of every page in the form";
        let sections = run(text, 4, SegmentOptions::default());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Convert Documents To PDF");
        assert_eq!(sections[0].page, 3);
    }

    #[test]
    fn lines_before_first_heading_ignored() {
        let text = "the signature field sits at the bottom of every page in the form\nno headings anywhere, just a long form and a signature line";
        assert!(run(text, 1, SegmentOptions::default()).is_empty());
    }
}
