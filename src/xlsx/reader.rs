use std::path::Path;
use std::str::FromStr;

use calamine::{Data, Reader, open_workbook_auto};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::{Cell, DeducibleError};

/// The first worksheet of a workbook, with absolute cell positions.
///
/// Raw calamine values are kept so the writer can copy them back as they
/// were; [`SheetData::cells`] gives the evaluator's view of a row.
#[derive(Debug, Clone)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl SheetData {
    /// Cells of data row `idx` (zero-based, header excluded).
    pub fn cells(&self, idx: usize) -> Vec<Cell> {
        self.rows
            .get(idx)
            .map(|r| r.iter().map(to_cell).collect())
            .unwrap_or_default()
    }

    /// Number of columns in the widest row or the header.
    pub fn width(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Read the first worksheet of `path`. Row 1 is the header row.
pub fn read_sheet(path: &Path) -> Result<SheetData, DeducibleError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| DeducibleError::Read(format!("{}: {e}", path.display())))?;

    let name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| DeducibleError::Read(format!("{}: workbook has no worksheets", path.display())))?;

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| DeducibleError::Read(format!("{}: sheet '{name}': {e}", path.display())))?;

    // Ranges start at the first used cell; shift back to A1.
    let (row0, col0) = range.start().unwrap_or((0, 0));
    let mut grid: Vec<Vec<Data>> = vec![Vec::new(); row0 as usize];
    for row in range.rows() {
        let mut cells = vec![Data::Empty; col0 as usize];
        cells.extend(row.iter().cloned());
        grid.push(cells);
    }

    let mut grid = grid.into_iter();
    let mut headers: Vec<String> = grid
        .next()
        .ok_or_else(|| DeducibleError::Schema(format!("{}: sheet '{name}' has no header row", path.display())))?
        .iter()
        .map(|c| to_cell(c).as_text().unwrap_or_default())
        .collect();
    let rows: Vec<Vec<Data>> = grid.collect();

    // Data past the last header still belongs to the sheet.
    let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
    if widest > headers.len() {
        headers.resize(widest, String::new());
    }

    info!(sheet = %name, columns = headers.len(), rows = rows.len(), "sheet loaded");
    Ok(SheetData {
        name,
        headers,
        rows,
    })
}

/// Convert a calamine value to the evaluator's cell model.
pub fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Float(v) => float_cell(*v),
        Data::Int(v) => Cell::Number(Decimal::from(*v)),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => float_cell(dt.as_f64()),
        other => {
            warn!(value = ?other, "unexpected cell value kept as text");
            Cell::Text(format!("{other:?}"))
        }
    }
}

// Shortest round-trip text of the float, so 0.1 stays 0.1.
fn float_cell(v: f64) -> Cell {
    match Decimal::from_str(&v.to_string()) {
        Ok(d) => Cell::Number(d),
        Err(_) => Cell::Text(v.to_string()),
    }
}
