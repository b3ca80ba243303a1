use std::sync::LazyLock;

use regex::Regex;

use super::lines::TextLine;
use super::sections::Section;

static FORM_VERB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(form|fill|interactive|signature|prepare|sign|submit|enable|acrobat|tools|pdf)")
        .unwrap()
});

// Buffered capture: per-line bounds and per-run gates.
const BUFFER_LINE_MIN_CHARS: usize = 40;
const BUFFER_LINE_MAX_CHARS: usize = 300;
pub const BUFFER_MIN_CHARS: usize = 150;
const BUFFER_MIN_SCORE: u32 = 5;

// Line capture.
pub const LINE_MIN_CHARS: usize = 50;
const LINE_MAX_TOKENS: usize = 100;
const LINE_MIN_SCORE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub document: String,
    pub text: String,
    pub page: usize,
    pub score: u32,
}

/// Each closed section's body doubles as a snippet.
pub fn from_sections(sections: &[Section]) -> Vec<Snippet> {
    sections
        .iter()
        .map(|s| Snippet {
            document: s.document.clone(),
            text: s.body.clone(),
            page: s.page,
            score: s.score,
        })
        .collect()
}

pub fn from_titles(sections: &[Section]) -> Vec<Snippet> {
    sections
        .iter()
        .map(|s| Snippet {
            document: s.document.clone(),
            text: s.title.clone(),
            page: s.page,
            score: s.score,
        })
        .collect()
}

/// Every long enough, relevant line is a snippet on its own.
pub fn from_lines(document: &str, lines: &[TextLine]) -> Vec<Snippet> {
    lines
        .iter()
        .filter(|l| l.chars > LINE_MIN_CHARS && l.tokens < LINE_MAX_TOKENS && l.score >= LINE_MIN_SCORE)
        .map(|l| Snippet {
            document: document.to_string(),
            text: l.text.clone(),
            page: l.page,
            score: l.score,
        })
        .collect()
}

#[derive(Default)]
struct Buffer<'a> {
    lines: Vec<&'a str>,
    page: usize,
    score: u32,
}

impl<'a> Buffer<'a> {
    fn push(&mut self, line: &'a TextLine) {
        if self.lines.is_empty() {
            self.page = line.page;
        }
        self.lines.push(&line.text);
        self.score += line.score;
    }

    fn flush(&mut self, document: &str, out: &mut Vec<Snippet>) {
        let buf = std::mem::take(self);
        if buf.lines.is_empty() {
            return;
        }
        let text = buf.lines.join(" ");
        if text.chars().count() > BUFFER_MIN_CHARS && buf.score >= BUFFER_MIN_SCORE {
            out.push(Snippet {
                document: document.to_string(),
                text,
                page: buf.page,
                score: buf.score,
            });
        }
    }
}

/// Contiguous runs of form-related lines. Any line that does not qualify
/// (blank lines included) ends the current run.
pub fn buffered(document: &str, lines: &[TextLine]) -> Vec<Snippet> {
    let mut out = Vec::new();
    let mut buffer = Buffer::default();

    for line in lines {
        if joins_buffer(line) {
            buffer.push(line);
        } else {
            buffer.flush(document, &mut out);
        }
    }
    buffer.flush(document, &mut out);

    out
}

fn joins_buffer(line: &TextLine) -> bool {
    !line.is_empty()
        && line.score >= 1
        && (BUFFER_LINE_MIN_CHARS..=BUFFER_LINE_MAX_CHARS).contains(&line.chars)
        && FORM_VERB_RE.is_match(&line.text)
}

// ── Tests ──
