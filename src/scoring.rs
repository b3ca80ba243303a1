use std::collections::HashSet;

use regex::Regex;

pub const DEFAULT_WEIGHT: u32 = 1;
pub const BOOST_WEIGHT: u32 = 2;

/// Form-filling and e-signature vocabulary.
pub const FORMS_KEYWORDS: &[&str] = &[
    "form", "forms", "fillable", "interactive", "field", "fields", "onboarding",
    "compliance", "sign", "signature", "signatures", "fill", "create", "convert",
    "document", "documents", "PDF", "Acrobat", "manage", "tools", "prepare",
    "export", "share", "e-signature", "workflow", "process", "template", "enable", "submit",
];

/// Trip-planning vocabulary, used in front of the forms list by the `travel` preset.
pub const TRAVEL_KEYWORDS: &[&str] = &[
    "travel", "trip", "group", "friends", "hotel", "restaurant", "food",
    "nightlife", "activity", "things to do", "packing", "coast", "fun", "adventure",
];

#[derive(Debug, Clone)]
pub struct Keyword {
    pub term: String,
    pub weight: u32,
    re: Regex,
}

/// Ordered, weighted keyword list. Built once per run and never mutated.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    /// Terms are lower-cased and deduplicated (first occurrence wins). Any term
    /// listed in `boost` gets `BOOST_WEIGHT`, everything else `DEFAULT_WEIGHT`.
    pub fn new<S: AsRef<str>>(terms: &[S], boost: &[S]) -> Result<Self, regex::Error> {
        let boost: HashSet<String> = boost
            .iter()
            .map(|b| b.as_ref().trim().to_lowercase())
            .collect();
        let mut seen = HashSet::new();
        let mut keywords = Vec::with_capacity(terms.len());

        for term in terms {
            let term = term.as_ref().trim().to_lowercase();
            if term.is_empty() || !seen.insert(term.clone()) {
                continue;
            }
            let re = Regex::new(&format!(r"\b{}\b", regex::escape(&term)))?;
            let weight = if boost.contains(&term) {
                BOOST_WEIGHT
            } else {
                DEFAULT_WEIGHT
            };
            keywords.push(Keyword { term, weight, re });
        }

        Ok(Self { keywords })
    }

    pub fn keywords(&self) -> &[Keyword] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Sum of weighted whole-word occurrences of every keyword in `text`.
    pub fn score(&self, text: &str) -> u32 {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .map(|kw| kw.re.find_iter(&lower).count() as u32 * kw.weight)
            .sum()
    }
}
