use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{info, warn};

use crate::error::{RankError, Result};
use crate::parser::sections::Section;
use crate::parser::snippets::Snippet;
use crate::parser::{self, DocumentResult};
use crate::scoring::KeywordSet;
use crate::settings::{DocumentRef, InputConfig, PipelineConfig};
use crate::source::TextSource;

/// Ranked, truncated corpus results plus bookkeeping for the summary line.
#[derive(Debug, Default)]
pub struct Ranked {
    pub sections: Vec<Section>,
    pub snippets: Vec<Snippet>,
    pub processed: usize,
    pub skipped: Vec<String>,
    /// Totals before truncation.
    pub total_sections: usize,
    pub total_snippets: usize,
}

/// Stable sort by descending score, then dense 1-based ranks.
pub fn rank_sections(sections: &mut [Section]) {
    sections.sort_by(|a, b| b.score.cmp(&a.score));
    for (i, s) in sections.iter_mut().enumerate() {
        s.rank = i + 1;
    }
}

pub fn sort_snippets(snippets: &mut [Snippet]) {
    snippets.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Run every listed document through `source` and the segmenter, then rank
/// the merged results. Missing files are skipped with a warning, and so are
/// parse failures unless `fail_on_parse_error` is set.
pub fn aggregate(
    input: &InputConfig,
    pdf_dir: &Path,
    cfg: &PipelineConfig,
    keywords: &KeywordSet,
    source: &dyn TextSource,
) -> Result<Ranked> {
    let pb = progress_bar(input.documents.len());

    let run_one = |doc: &DocumentRef| {
        let result = extract_one(doc, pdf_dir, cfg, keywords, source);
        pb.inc(1);
        result
    };
    // Collected in document order either way; ranking below is single-threaded.
    let results: Vec<Result<DocumentResult>> = if cfg.parallel {
        input.documents.par_iter().map(run_one).collect()
    } else {
        input.documents.iter().map(run_one).collect()
    };
    pb.finish_and_clear();

    let mut ranked = Ranked::default();
    let mut sections = Vec::new();
    let mut snippets = Vec::new();

    for (doc, result) in input.documents.iter().zip(results) {
        match result {
            Ok(data) => {
                ranked.processed += 1;
                sections.extend(data.sections);
                snippets.extend(data.snippets);
            }
            Err(RankError::MissingDocument(path)) => {
                warn!("Missing file: {}", path.display());
                ranked.skipped.push(doc.filename.clone());
            }
            Err(e @ RankError::Parse { .. }) if !cfg.fail_on_parse_error => {
                warn!("Skipping {}: {}", doc.filename, e);
                ranked.skipped.push(doc.filename.clone());
            }
            Err(e) => return Err(e),
        }
    }

    ranked.total_sections = sections.len();
    ranked.total_snippets = snippets.len();

    rank_sections(&mut sections);
    sort_snippets(&mut snippets);
    sections.truncate(cfg.top_n);
    snippets.truncate(cfg.top_n);

    ranked.sections = sections;
    ranked.snippets = snippets;
    Ok(ranked)
}

fn extract_one(
    doc: &DocumentRef,
    pdf_dir: &Path,
    cfg: &PipelineConfig,
    keywords: &KeywordSet,
    source: &dyn TextSource,
) -> Result<DocumentResult> {
    let path = pdf_dir.join(&doc.filename);
    if !path.is_file() {
        return Err(RankError::MissingDocument(path));
    }

    info!(title = doc.title.as_deref(), "Processing: {}", doc.filename);
    let text = source.extract(&path)?;
    let name = document_name(&doc.filename);
    let data = parser::process_document(&name, &text, keywords, cfg);
    info!(
        "{}: {} sections, {} snippets",
        name,
        data.sections.len(),
        data.snippets.len()
    );
    Ok(data)
}

/// Base name of a listed filename.
fn document_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}

// ── Tests ──
