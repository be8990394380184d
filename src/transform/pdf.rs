//! PDF transformer
//!
//! Plain sequential text extraction, one page after another. No layout,
//! table or column reconstruction. Pages whose text cannot be decoded
//! (scanned images, exotic fonts) come out empty rather than failing.

use super::types::{TransformJob, TransformOutput, Transformer};
use crate::contract::FileFormat;
use crate::error::{Error, Result};
use lopdf::Document;
use serde_json::json;

/// Terminates every page in the extracted text
pub const PAGE_BREAK: char = '\u{c}';

/// Characters of page text echoed in the sample
const EXCERPT_CHARS: usize = 200;

/// Transformer for PDF documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTransformer;

impl Transformer for PdfTransformer {
    fn format(&self) -> FileFormat {
        FileFormat::Pdf
    }

    fn transform(&self, job: &TransformJob<'_>) -> Result<TransformOutput> {
        let doc = Document::load(job.source_path)
            .map_err(|e| Error::malformed(job.source_path, format!("not a readable PDF: {e}")))?;

        if doc.is_encrypted() {
            return Err(Error::malformed(job.source_path, "document is encrypted"));
        }

        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        let pages: Vec<String> = page_numbers
            .iter()
            .map(|&number| {
                if !job.rules.extract_text {
                    return String::new();
                }
                match doc.extract_text(&[number]) {
                    Ok(text) => text.trim_end().to_string(),
                    Err(e) => {
                        tracing::warn!(
                            source = %job.source_path.display(),
                            page = number,
                            error = %e,
                            "No text extracted from page"
                        );
                        String::new()
                    }
                }
            })
            .collect();

        let text = join_pages(&pages);
        let page_count = pages.len();

        let summary = if job.rules.create_summary {
            json!({
                "page_count": page_count,
                "word_count": text.split_whitespace().count(),
                "char_count": text.chars().filter(|&c| c != PAGE_BREAK).count(),
                "line_count": text.lines().count(),
            })
        } else {
            json!({ "page_count": page_count })
        };

        let sample_rows = pages
            .iter()
            .zip(&page_numbers)
            .take(job.sample_size)
            .map(|(text, number)| {
                json!({
                    "page": number,
                    "excerpt": text.chars().take(EXCERPT_CHARS).collect::<String>(),
                })
            })
            .collect();

        Ok(TransformOutput {
            content: text.into_bytes(),
            record_count: page_count,
            sample_rows,
            summary: Some(summary),
        })
    }
}

/// Concatenate page texts, ending each page with a form feed
pub fn join_pages(pages: &[String]) -> String {
    let mut out = String::new();
    for page in pages {
        out.push_str(page);
        if !page.is_empty() {
            out.push('\n');
        }
        out.push(PAGE_BREAK);
    }
    out
}

/// Pages in text produced by `join_pages`
pub fn count_pages(text: &str) -> usize {
    text.chars().filter(|&c| c == PAGE_BREAK).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_breaks_survive_round_trip() {
        let pages = vec!["first".to_string(), String::new(), "third".to_string()];
        let text = join_pages(&pages);
        assert_eq!(text, "first\n\u{c}\u{c}third\n\u{c}");
        assert_eq!(count_pages(&text), 3);
        assert_eq!(count_pages(""), 0);
    }
}
