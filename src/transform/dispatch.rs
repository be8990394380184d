//! Format transform dispatcher
//!
//! Pure routing from a format to its transformer. Rules and paths pass
//! through untouched; the dispatcher only owns writing the target.

use super::delimited::CsvTransformer;
use super::pdf::PdfTransformer;
use super::spreadsheet::ExcelTransformer;
use super::text::TextTransformer;
use super::types::{kilobytes, TransformJob, TransformResult, Transformer};
use crate::contract::FileFormat;
use crate::error::Result;
use crate::store;

static CSV: CsvTransformer = CsvTransformer;
static TXT: TextTransformer = TextTransformer;
static PDF: PdfTransformer = PdfTransformer;
static EXCEL: ExcelTransformer = ExcelTransformer;

/// The transformer registered for a format
pub fn transformer_for(format: FileFormat) -> &'static dyn Transformer {
    match format {
        FileFormat::Csv => &CSV,
        FileFormat::Txt => &TXT,
        FileFormat::Pdf => &PDF,
        FileFormat::Excel => &EXCEL,
    }
}

/// Route a raw format tag. Unknown tags fail before any transformer runs.
pub fn dispatch_tag(tag: &str, job: &TransformJob<'_>) -> Result<TransformResult> {
    let format: FileFormat = tag.parse()?;
    dispatch(format, job)
}

/// Run the transformer for `format` and write its output to the target
pub fn dispatch(format: FileFormat, job: &TransformJob<'_>) -> Result<TransformResult> {
    let transformer = transformer_for(format);
    tracing::debug!(
        format = %transformer.format(),
        source = %job.source_path.display(),
        "Dispatching transform"
    );

    let mut output = transformer.transform(job)?;

    let output_path = job.target_path();
    let bytes = store::write_atomic(&output_path, &output.content)?;
    output.sample_rows.truncate(job.sample_size);

    Ok(TransformResult {
        record_count: output.record_count,
        sample_rows: output.sample_rows,
        output_path,
        format,
        size_in_kilobytes: kilobytes(bytes),
        summary: output.summary,
    })
}
