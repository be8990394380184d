//! TXT transformer
//!
//! Three output shapes, chosen by rules in this order:
//! - `convert_to_json`: one document with counts and the ordered lines
//! - `parse_lines`: one structured entry per line
//! - neither: the source lines under a short summary header

use super::types::{TransformJob, TransformOutput, Transformer};
use crate::contract::FileFormat;
use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{json, Value};

/// Line separating the report header from the body
pub const REPORT_SEPARATOR: &str = "---";

/// Counts computed over a text file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub line_count: usize,
    pub word_count: usize,
    pub character_count: usize,
}

impl TextStats {
    /// Count lines, whitespace-delimited words and characters
    pub fn of(content: &str) -> Self {
        Self {
            line_count: content.lines().count(),
            word_count: content.split_whitespace().count(),
            character_count: content.chars().count(),
        }
    }
}

/// Transformer for plain text sources
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTransformer;

impl Transformer for TextTransformer {
    fn format(&self) -> FileFormat {
        FileFormat::Txt
    }

    fn transform(&self, job: &TransformJob<'_>) -> Result<TransformOutput> {
        let bytes = std::fs::read(job.source_path)?;
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::malformed(job.source_path, format!("not valid UTF-8: {e}")))?;

        let lines: Vec<&str> = content.lines().collect();
        let stats = TextStats::of(&content);
        let source_file = job.source_file_name();

        let output = if job.rules.convert_to_json {
            let mut doc = json!({
                "source_file": source_file,
                "processed_at": job.processed_at,
                "line_count": stats.line_count,
                "word_count": stats.word_count,
                "character_count": stats.character_count,
                "lines": lines,
            });
            if job.rules.add_summary {
                doc["summary"] = json!({
                    "line_count": stats.line_count,
                    "word_count": stats.word_count,
                    "char_count": stats.character_count,
                });
            }
            serde_json::to_vec_pretty(&doc)?
        } else if job.rules.parse_lines {
            let parsed: Vec<Value> = lines
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    let line = line.trim();
                    json!({
                        "line_number": i + 1,
                        "content": line,
                        "length": line.chars().count(),
                    })
                })
                .collect();
            serde_json::to_vec_pretty(&json!({
                "parsed_lines": parsed,
                "metadata": {
                    "total_lines": stats.line_count,
                    "source_file": source_file,
                    "processed_at": job.processed_at,
                },
            }))?
        } else {
            render_report(&source_file, &job.processed_at, &stats, &lines).into_bytes()
        };

        let sample_rows = lines
            .iter()
            .take(job.sample_size)
            .enumerate()
            .map(|(i, line)| json!({ "line_number": i + 1, "content": line }))
            .collect();

        Ok(TransformOutput {
            content: output,
            record_count: stats.line_count,
            sample_rows,
            summary: Some(serde_json::to_value(stats)?),
        })
    }
}

/// Plain text report: summary header, separator, source lines
fn render_report(source_file: &str, processed_at: &str, stats: &TextStats, lines: &[&str]) -> String {
    let mut out = format!(
        "# source_file: {source_file}\n# processed_at: {processed_at}\n# lines: {} | words: {} | characters: {}\n{REPORT_SEPARATOR}\n",
        stats.line_count, stats.word_count, stats.character_count
    );
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Number of body lines in a report written by this transformer
pub fn report_body_lines(report: &str) -> Option<usize> {
    let mut lines = report.lines();
    lines.position(|l| l == REPORT_SEPARATOR)?;
    Some(lines.count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats() {
        let stats = TextStats::of("one two three\nfour five\n\nsix");
        assert_eq!(stats.line_count, 4);
        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.character_count, 28);
    }

    #[test]
    fn test_empty_text() {
        let stats = TextStats::of("");
        assert_eq!(stats.line_count, 0);
        assert_eq!(stats.word_count, 0);
    }

    #[test]
    fn test_report_body_lines() {
        let stats = TextStats::of("a\nb");
        let report = render_report("in.txt", "now", &stats, &["a", "b"]);
        assert!(report.starts_with("# source_file: in.txt\n"));
        assert_eq!(report_body_lines(&report), Some(2));
        assert_eq!(report_body_lines("no header here"), None);
    }
}
