use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::{
    Capabilities, Column, ColumnSchema, DeducibleError, RowOutcome, RulePolicy, RunSummary,
    evaluate_row,
};

use super::reader::{SheetData, read_sheet};
use super::style::Palette;
use super::writer::write_validated;

/// Suffix added to the input file stem.
pub const OUTPUT_SUFFIX: &str = "_validado";

/// Result of validating one workbook.
#[derive(Debug, Clone)]
pub struct ProcessedFile {
    pub output: PathBuf,
    pub summary: RunSummary,
    pub capabilities: Capabilities,
    /// Required columns that had to be created.
    pub created_columns: Vec<Column>,
}

/// `<dir>/<stem>_validado.xlsx` for an input path.
pub fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}.xlsx"))
}

/// Resolve the schema of `sheet` and evaluate all of its rows.
pub fn evaluate_sheet(
    sheet: &SheetData,
    policy: &RulePolicy,
) -> (ColumnSchema, Vec<RowOutcome>, RunSummary) {
    let schema = ColumnSchema::resolve(&sheet.headers);
    let caps = schema.capabilities();
    let outcomes: Vec<RowOutcome> = (0..sheet.rows.len())
        .map(|i| evaluate_row(&schema.extract_row(&sheet.cells(i)), &caps, policy))
        .collect();
    let summary: RunSummary = outcomes.iter().collect();
    (schema, outcomes, summary)
}

/// Read `input`, evaluate every row and write the validated copy next to it.
///
/// Any read or write failure aborts the whole run; no partial output is
/// reported as success.
pub fn process_file(
    input: &Path,
    policy: &RulePolicy,
    palette: &Palette,
) -> Result<ProcessedFile, DeducibleError> {
    let sheet = read_sheet(input)?;
    let (schema, outcomes, summary) = evaluate_sheet(&sheet, policy);
    info!(
        rows = summary.total_rows,
        deductible = summary.deductible,
        not_deductible = summary.not_deductible,
        "rows evaluated"
    );

    let output = output_path(input);
    write_validated(&sheet, &schema, &outcomes, palette, &output)?;

    Ok(ProcessedFile {
        output,
        summary,
        capabilities: schema.capabilities(),
        created_columns: schema.missing().to_vec(),
    })
}
