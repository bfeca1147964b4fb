use std::path::Path;

use calamine::Data;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::utility::column_number_to_name;
use rust_xlsxwriter::{Color, Format, FormatAlign, Formula, Workbook, Worksheet, XlsxError};
use tracing::info;

use crate::core::{Amount, Column, ColumnSchema, DeducibleError, RowOutcome};

use super::reader::{SheetData, to_cell};
use super::style::{Palette, row_fills};
use super::{DERIVED_COLUMN_WIDTH, Derived};

const MONEY_FORMAT: &str = "0.00";
const DATE_FORMAT: &str = "yyyy-mm-dd hh:mm";

impl From<XlsxError> for DeducibleError {
    fn from(e: XlsxError) -> Self {
        DeducibleError::Write(e.to_string())
    }
}

/// Write the validated copy of `sheet` to `path`.
///
/// `outcomes` must hold one entry per data row, in row order.
pub fn write_validated(
    sheet: &SheetData,
    schema: &ColumnSchema,
    outcomes: &[RowOutcome],
    palette: &Palette,
    path: &Path,
) -> Result<(), DeducibleError> {
    if outcomes.len() != sheet.rows.len() {
        return Err(DeducibleError::Mismatch(format!(
            "{} outcomes for {} data rows",
            outcomes.len(),
            sheet.rows.len()
        )));
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&sheet.name)?;

    write_headers(worksheet, sheet, schema, palette)?;
    for (i, (data, outcome)) in sheet.rows.iter().zip(outcomes).enumerate() {
        write_row(worksheet, row_num(i + 1)?, data, schema, outcome, palette)?;
    }

    workbook
        .save(path)
        .map_err(|e| DeducibleError::Write(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), rows = outcomes.len(), "validated workbook saved");
    Ok(())
}

fn row_num(idx: usize) -> Result<u32, DeducibleError> {
    u32::try_from(idx).map_err(|_| DeducibleError::Write(format!("row {idx} out of range")))
}

fn col_num(idx: usize) -> Result<u16, DeducibleError> {
    u16::try_from(idx).map_err(|_| DeducibleError::Write(format!("column {idx} out of range")))
}

fn header_format(palette: &Palette) -> Format {
    Format::new()
        .set_background_color(palette.accent)
        .set_align(FormatAlign::Center)
}

fn fill_format(fill: Option<Color>) -> Format {
    match fill {
        Some(color) => Format::new().set_background_color(color),
        None => Format::new(),
    }
}

fn write_headers(
    ws: &mut Worksheet,
    sheet: &SheetData,
    schema: &ColumnSchema,
    palette: &Palette,
) -> Result<(), DeducibleError> {
    for (col, header) in sheet.headers.iter().enumerate() {
        if !header.is_empty() {
            ws.write_string(0, col_num(col)?, header)?;
        }
    }

    let created = header_format(palette);
    for &column in schema.missing() {
        ws.write_string_with_format(0, col_num(schema.index(column))?, column.header(), &created)?;
    }

    for derived in Derived::ALL {
        let col = col_num(schema.width() + derived as usize)?;
        ws.write_string_with_format(0, col, derived.header(), &created)?;
        ws.set_column_width(col, DERIVED_COLUMN_WIDTH)?;
    }
    Ok(())
}

fn write_row(
    ws: &mut Worksheet,
    row: u32,
    data: &[Data],
    schema: &ColumnSchema,
    outcome: &RowOutcome,
    palette: &Palette,
) -> Result<(), DeducibleError> {
    let fills = row_fills(schema, outcome);
    let fill_of = |col: usize| fills.get(&col).map(|f| palette.color(*f));

    for col in 0..schema.width() {
        let value = data.get(col).unwrap_or(&Data::Empty);
        write_data(ws, row, col_num(col)?, value, &fill_format(fill_of(col)))?;
    }

    for column in Column::ALL.into_iter().filter(|c| c.is_zero_filled()) {
        let col = schema.index(column);
        if matches!(data.get(col), None | Some(Data::Empty)) {
            let format = fill_format(fill_of(col)).set_num_format(MONEY_FORMAT);
            ws.write_number_with_format(row, col_num(col)?, 0.0, &format)?;
        }
    }

    if outcome.excise.substituted_from.is_some() {
        let col = schema.index(Column::VatZeroRate);
        let format = fill_format(fill_of(col)).set_num_format(MONEY_FORMAT);
        write_amount(ws, row, col_num(col)?, &outcome.excise.zero_rate, &format)?;
    }

    write_derived(ws, row, schema, outcome, &fill_of)
}

fn write_derived(
    ws: &mut Worksheet,
    row: u32,
    schema: &ColumnSchema,
    outcome: &RowOutcome,
    fill_of: &dyn Fn(usize) -> Option<Color>,
) -> Result<(), DeducibleError> {
    let base = schema.width();
    let r = row + 1;
    let at = |d: Derived| base + d as usize;
    let letter = |idx: usize| col_num(idx).map(column_number_to_name);

    let subtotal = letter(schema.index(Column::Subtotal))?;
    let discount = letter(schema.index(Column::Discount))?;
    let zero = letter(schema.index(Column::VatZeroRate))?;
    let vat16 = letter(schema.index(Column::Vat16))?;
    let total = letter(schema.index(Column::Total))?;
    let sub1 = letter(at(Derived::BaseAfterDiscount))?;
    let sub0 = letter(at(Derived::ZeroRate))?;
    let sub2 = letter(at(Derived::BaseAt16))?;
    let acred = letter(at(Derived::ExpectedVat16))?;
    let t2 = letter(at(Derived::RecomputedTotal))?;

    let b = &outcome.bases;
    let formulas: [(Derived, String, Decimal); 7] = [
        (
            Derived::BaseAfterDiscount,
            format!("=({subtotal}{r}-{discount}{r})"),
            b.base_after_discount,
        ),
        (Derived::ZeroRate, format!("={zero}{r}"), b.zero_rate),
        (Derived::BaseAt16, format!("={sub1}{r}-{sub0}{r}"), b.base_at_16),
        (
            Derived::ExpectedVat16,
            format!("=ROUND({sub2}{r}*0.16,2)"),
            b.expected_vat_16,
        ),
        (
            Derived::VatDifference,
            format!("={acred}{r}-{vat16}{r}"),
            b.vat_difference,
        ),
        (
            Derived::RecomputedTotal,
            format!("={sub2}{r}+{sub0}{r}+{vat16}{r}"),
            b.recomputed_total,
        ),
        (
            Derived::TotalDifference,
            format!("={total}{r}-{t2}{r}"),
            b.total_difference,
        ),
    ];

    for (derived, formula, cached) in formulas {
        let col = at(derived);
        let format = fill_format(fill_of(col))
            .set_bold()
            .set_num_format(MONEY_FORMAT);
        let formula = Formula::new(formula).set_result(cached.to_string());
        ws.write_formula_with_format(row, col_num(col)?, formula, &format)?;
    }

    let col = at(Derived::Deductible);
    let verdict = if outcome.verdict.is_deductible { "SI" } else { "NO" };
    let format = fill_format(fill_of(col))
        .set_bold()
        .set_font_color(Color::White)
        .set_align(FormatAlign::Center);
    ws.write_string_with_format(row, col_num(col)?, verdict, &format)?;

    let reasons = outcome.verdict.display_reasons().join("; ");
    ws.write_string(row, col_num(at(Derived::Reasons))?, reasons)?;
    Ok(())
}

fn write_data(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Data,
    format: &Format,
) -> Result<(), DeducibleError> {
    match value {
        Data::Empty => {
            ws.write_blank(row, col, format)?;
        }
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
            ws.write_string_with_format(row, col, s, format)?;
        }
        Data::Float(v) => {
            ws.write_number_with_format(row, col, *v, format)?;
        }
        Data::Int(v) => {
            ws.write_number_with_format(row, col, *v as f64, format)?;
        }
        Data::Bool(b) => {
            ws.write_boolean_with_format(row, col, *b, format)?;
        }
        Data::DateTime(dt) => {
            let format = format.clone().set_num_format(DATE_FORMAT);
            ws.write_number_with_format(row, col, dt.as_f64(), &format)?;
        }
        other => {
            let text = to_cell(other).as_text().unwrap_or_default();
            ws.write_string_with_format(row, col, text, format)?;
        }
    }
    Ok(())
}

fn write_amount(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    amount: &Amount,
    format: &Format,
) -> Result<(), DeducibleError> {
    match amount {
        Amount::Value(d) => {
            ws.write_number_with_format(row, col, d.to_f64().unwrap_or_default(), format)?;
        }
        Amount::Invalid(text) => {
            ws.write_string_with_format(row, col, text, format)?;
        }
        Amount::Blank => {
            ws.write_number_with_format(row, col, 0.0, format)?;
        }
    }
    Ok(())
}
