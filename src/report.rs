use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{RankError, Result};
use crate::rank::Ranked;
use crate::settings::InputConfig;

#[derive(Debug, Serialize)]
pub struct RunOutput {
    pub metadata: Metadata,
    pub extracted_sections: Vec<ExtractedSection>,
    pub subsection_analysis: Vec<SubsectionAnalysis>,
}

#[derive(Debug, Serialize)]
pub struct Metadata {
    pub input_documents: Vec<String>,
    pub persona: String,
    pub job_to_be_done: String,
    pub processing_timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct ExtractedSection {
    pub document: String,
    pub section_title: String,
    pub importance_rank: usize,
    pub page_number: usize,
}

#[derive(Debug, Serialize)]
pub struct SubsectionAnalysis {
    pub document: String,
    pub refined_text: String,
    pub page_number: usize,
}

impl RunOutput {
    /// Project ranked results into the output shape; scores stay internal.
    pub fn build(input: &InputConfig, ranked: &Ranked, now: DateTime<Utc>) -> Self {
        RunOutput {
            metadata: Metadata {
                input_documents: input.filenames(),
                persona: input.persona.role.clone(),
                job_to_be_done: input.job_to_be_done.task.clone(),
                processing_timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            },
            extracted_sections: ranked
                .sections
                .iter()
                .map(|s| ExtractedSection {
                    document: s.document.clone(),
                    section_title: s.title.clone(),
                    importance_rank: s.rank,
                    page_number: s.page,
                })
                .collect(),
            subsection_analysis: ranked
                .snippets
                .iter()
                .map(|s| SubsectionAnalysis {
                    document: s.document.clone(),
                    refined_text: s.text.clone(),
                    page_number: s.page,
                })
                .collect(),
        }
    }

    /// Pretty-printed JSON; parent directories are created as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        let write_err = |source: std::io::Error| RankError::OutputWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(e.into()))?;
        std::fs::write(path, json).map_err(write_err)
    }
}
