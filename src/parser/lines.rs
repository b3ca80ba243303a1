use std::sync::LazyLock;

use regex::Regex;

use crate::scoring::KeywordSet;
use crate::settings::HeadingRule;
use crate::source::ExtractedText;

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(Create|Convert|Fill|Sign|Send|Change|Export|Share|Request|Prepare|Enable|Add|Edit|Use|Open|Select)",
    )
    .unwrap()
});

static NUMBERED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.").unwrap());

const TITLE_MIN_CHARS: usize = 10;
const TITLE_MAX_CHARS: usize = 100;
const TITLE_MAX_TOKENS: usize = 10;
const NUMBERED_MIN_CHARS: usize = 15;
const NUMBERED_MAX_CHARS: usize = 120;

/// One line of a document's text stream, already trimmed and scored.
#[derive(Debug, Clone)]
pub struct TextLine {
    /// Zero-based position in the full line sequence, blank lines included.
    pub index: usize,
    pub text: String,
    pub chars: usize,
    pub tokens: usize,
    pub score: u32,
    pub heading: bool,
    pub page: usize,
}

impl TextLine {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

pub fn classify_lines(doc: &ExtractedText, keywords: &KeywordSet, rule: HeadingRule) -> Vec<TextLine> {
    let raw: Vec<&str> = doc.text.split('\n').collect();
    let total = raw.len();

    raw.iter()
        .enumerate()
        .map(|(index, line)| {
            let text = line.trim().to_string();
            let chars = text.chars().count();
            let tokens = text.split_whitespace().count();
            let (score, heading) = if text.is_empty() {
                (0, false)
            } else {
                let heading = match rule {
                    HeadingRule::Titled => is_heading_candidate(&text, chars, tokens),
                    HeadingRule::Numbered => is_numbered_heading(&text, chars),
                };
                (keywords.score(&text), heading)
            };
            TextLine {
                index,
                page: estimate_page(index, total, doc.total_pages),
                text,
                chars,
                tokens,
                score,
                heading,
            }
        })
        .collect()
}

/// Short punctuation-free title, or a line opening with an action verb.
pub fn is_heading_candidate(text: &str, chars: usize, tokens: usize) -> bool {
    let short_title = chars > TITLE_MIN_CHARS
        && chars < TITLE_MAX_CHARS
        && !text.contains('.')
        && !text.contains(',')
        && tokens <= TITLE_MAX_TOKENS;
    short_title || ACTION_RE.is_match(text)
}

/// `3.`-style numbering, or any line strictly between 15 and 120 chars.
pub fn is_numbered_heading(text: &str, chars: usize) -> bool {
    NUMBERED_RE.is_match(text) || (chars > NUMBERED_MIN_CHARS && chars < NUMBERED_MAX_CHARS)
}

/// `floor(index / total_lines * total_pages) + 1`, never below 1.
pub fn estimate_page(index: usize, total_lines: usize, total_pages: usize) -> usize {
    if total_lines == 0 {
        return 1;
    }
    (index * total_pages / total_lines + 1).max(1)
}
