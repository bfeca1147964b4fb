//! Spreadsheet front end: read an invoice export, write the validated copy.
//!
//! Reading uses calamine (xlsx, xls, ods); writing uses rust_xlsxwriter.
//! The original cells are copied over, missing required columns are added,
//! and nine derived columns are appended after the last column.
//!
//! # Example
//!
//! ```ignore
//! use deducible::core::RulePolicy;
//! use deducible::xlsx::*;
//!
//! let run = process_file("GASTOS_DIC.xlsx".as_ref(), &RulePolicy::default(), &Palette::default())?;
//! println!("{} rows -> {}", run.summary.total_rows, run.output.display());
//! ```

mod process;
mod reader;
mod style;
mod writer;

pub use process::{OUTPUT_SUFFIX, ProcessedFile, evaluate_sheet, output_path, process_file};
pub use reader::{SheetData, read_sheet, to_cell};
pub use style::{Fill, Palette, row_fills};
pub use writer::write_validated;

/// Columns appended to the validated sheet, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Derived {
    BaseAfterDiscount,
    ZeroRate,
    BaseAt16,
    ExpectedVat16,
    VatDifference,
    RecomputedTotal,
    TotalDifference,
    Deductible,
    Reasons,
}

impl Derived {
    pub const ALL: [Derived; 9] = [
        Derived::BaseAfterDiscount,
        Derived::ZeroRate,
        Derived::BaseAt16,
        Derived::ExpectedVat16,
        Derived::VatDifference,
        Derived::RecomputedTotal,
        Derived::TotalDifference,
        Derived::Deductible,
        Derived::Reasons,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Derived::BaseAfterDiscount => "SUB1-16%",
            Derived::ZeroRate => "SUB0%",
            Derived::BaseAt16 => "SUB2-16%",
            Derived::ExpectedVat16 => "IVA ACREDITABLE 16%",
            Derived::VatDifference => "C IVA",
            Derived::RecomputedTotal => "T2",
            Derived::TotalDifference => "Comprobación T2",
            Derived::Deductible => "Deducible",
            Derived::Reasons => "Motivos",
        }
    }
}

/// Width of every appended column.
pub const DERIVED_COLUMN_WIDTH: f64 = 15.0;
