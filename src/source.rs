//! Text sources: turn a document on disk into a page count plus a single
//! `\n`-delimited text stream in reading order.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{RankError, Result};

const PAGE_BREAK: char = '\x0C';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub total_pages: usize,
    pub text: String,
}

impl ExtractedText {
    /// Pages become consecutive runs of lines; page count is at least 1.
    pub fn from_pages<S: AsRef<str>>(pages: &[S]) -> Self {
        let text = pages
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        Self {
            total_pages: pages.len().max(1),
            text,
        }
    }
}

pub trait TextSource: Sync {
    fn extract(&self, path: &Path) -> Result<ExtractedText>;
}

/// PDF extraction via `pdf-extract`, page by page.
pub struct PdfSource;

impl TextSource for PdfSource {
    fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let bytes = std::fs::read(path).map_err(|e| RankError::parse(path, e))?;
        // pdf-extract panics on some malformed files instead of returning Err.
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }))
        .map_err(|_| {
            warn!("{}: pdf extractor panicked", path.display());
            RankError::parse(path, "extractor panicked")
        })?
        .map_err(|e| RankError::parse(path, e))?;
        debug!("{}: {} pages", path.display(), pages.len());
        Ok(ExtractedText::from_pages(&pages))
    }
}

/// UTF-8 text where form feeds separate pages.
pub struct PlainTextSource;

impl TextSource for PlainTextSource {
    fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let raw = std::fs::read_to_string(path).map_err(|e| RankError::parse(path, e))?;
        let pages: Vec<&str> = raw.split(PAGE_BREAK).collect();
        Ok(ExtractedText::from_pages(&pages))
    }
}

/// Picks the source by extension: `.pdf` (any case) goes through the PDF
/// extractor, everything else is read as plain text.
pub struct AutoSource;

impl TextSource for AutoSource {
    fn extract(&self, path: &Path) -> Result<ExtractedText> {
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            PdfSource.extract(path)
        } else {
            PlainTextSource.extract(path)
        }
    }
}

/// One-page PDF showing `text` in Helvetica. The page's `/F1` resource
/// points at `font_object`; object 5 is the only font actually written.
#[cfg(test)]
pub(crate) fn sample_pdf(text: &str, font_object: u32) -> Vec<u8> {
    let content = format!("BT /F1 24 Tf 72 700 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 {font_object} 0 R >> >> /Contents 4 0 R >>"
        ),
        format!("<< /Length {} >>\nstream\n{content}\nendstream", content.len()),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{body}\nendobj\n", i + 1));
    }
    let xref = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_pages_split_on_form_feed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "page one\nmore\x0Cpage two\x0Cpage three").unwrap();

        let out = AutoSource.extract(&path).unwrap();
        assert_eq!(out.total_pages, 3);
        assert_eq!(out.text, "page one\nmore\npage two\npage three");
    }

    #[test]
    fn empty_file_has_one_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "").unwrap();

        let out = AutoSource.extract(&path).unwrap();
        assert_eq!(out.total_pages, 1);
        assert!(out.text.is_empty());
    }

    #[test]
    fn corrupt_pdf_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.PDF");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = AutoSource.extract(&path).unwrap_err();
        assert!(matches!(err, RankError::Parse { .. }));
    }

    #[test]
    fn pdf_pages_are_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.pdf");
        std::fs::write(&path, sample_pdf("Create Signature Form", 5)).unwrap();

        let out = AutoSource.extract(&path).unwrap();
        assert_eq!(out.total_pages, 1);
        assert!(out.text.contains("Create Signature Form"));
    }

    #[test]
    fn extractor_panic_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dangling_font.pdf");
        // font resource points at an object that does not exist
        std::fs::write(&path, sample_pdf("Create Signature Form", 9)).unwrap();

        let err = PdfSource.extract(&path).unwrap_err();
        match err {
            RankError::Parse { message, .. } => assert_eq!(message, "extractor panicked"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
