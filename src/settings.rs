use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RankError, Result};
use crate::scoring::{KeywordSet, FORMS_KEYWORDS, TRAVEL_KEYWORDS};

const ENV_PREFIX: &str = "RANKER";

// ── Input config (the batch description) ──

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub documents: Vec<DocumentRef>,
    pub persona: Persona,
    pub job_to_be_done: JobToBeDone,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRef {
    pub filename: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Persona {
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobToBeDone {
    pub task: String,
}

impl InputConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| RankError::config(path, e))?;
        serde_json::from_str(&raw).map_err(|e| RankError::config(path, e))
    }

    pub fn filenames(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }
}

// ── Pipeline config (the scoring/segmenting policy) ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SnippetStrategy {
    /// Contiguous runs of form-related lines, buffered across lines
    Buffered,
    /// Each closed section's body is reported as a snippet
    #[default]
    SectionBody,
    /// Every long, relevant line is its own snippet
    Line,
    /// Each closed section's title line is reported as the snippet
    Title,
}

/// Which lines may open a section (before the score threshold applies).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingRule {
    /// Short punctuation-free titles and action-verb lines
    #[default]
    Titled,
    /// Numbered lines (`3.`) and any line of moderate length
    Numbered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum KeywordPreset {
    #[default]
    Forms,
    Travel,
}

impl KeywordPreset {
    pub fn terms(self) -> Vec<&'static str> {
        match self {
            KeywordPreset::Forms => FORMS_KEYWORDS.to_vec(),
            KeywordPreset::Travel => TRAVEL_KEYWORDS
                .iter()
                .chain(FORMS_KEYWORDS)
                .copied()
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum heading-line score that opens a section.
    pub heading_threshold: u32,
    pub heading_rule: HeadingRule,
    /// Drop sections whose body is too short; off keeps bare headings.
    pub require_body: bool,
    pub keyword_preset: KeywordPreset,
    /// Replaces the preset when set.
    pub keywords: Option<Vec<String>>,
    pub boost_terms: Vec<String>,
    pub snippet_strategy: SnippetStrategy,
    /// Body lines with this many tokens or more are dropped.
    pub body_max_tokens: Option<usize>,
    pub top_n: usize,
    pub parallel: bool,
    pub fail_on_parse_error: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            heading_threshold: 2,
            heading_rule: HeadingRule::default(),
            require_body: true,
            keyword_preset: KeywordPreset::default(),
            keywords: None,
            boost_terms: Vec::new(),
            snippet_strategy: SnippetStrategy::default(),
            body_max_tokens: None,
            top_n: 5,
            parallel: true,
            fail_on_parse_error: false,
        }
    }
}

impl PipelineConfig {
    /// Defaults, then `file` (format from its extension), then `RANKER_*`
    /// environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(file, ENV_PREFIX)
    }

    fn load_with_prefix(file: Option<&Path>, env_prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            if !path.exists() {
                return Err(RankError::config(path, "file not found"));
            }
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(env_prefix)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("keywords")
                .with_list_parse_key("boost_terms"),
        );

        let origin = file.unwrap_or_else(|| Path::new("<env>"));
        builder
            .build()
            .and_then(|settings| settings.try_deserialize::<PipelineConfig>())
            .map_err(|e| RankError::config(origin, e))
    }

    pub fn keyword_set(&self) -> Result<KeywordSet> {
        let terms: Vec<String> = match &self.keywords {
            Some(list) => list.clone(),
            None => self
                .keyword_preset
                .terms()
                .into_iter()
                .map(String::from)
                .collect(),
        };
        let set = KeywordSet::new(&terms, &self.boost_terms)
            .map_err(|e| RankError::config("<keywords>", e))?;
        if set.is_empty() {
            return Err(RankError::config("<keywords>", "keyword list is empty"));
        }
        Ok(set)
    }
}
