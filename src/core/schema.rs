//! Header resolution for invoice sheets.
//!
//! Columns are located once per sheet by case-insensitive header match,
//! producing typed indices. Row extraction then never looks at headers.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::types::{Amount, Capabilities, Cell, InvoiceRow};

/// Columns every invoice sheet is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Subtotal,
    Discount,
    VatZeroRate,
    VatExempt,
    Vat16,
    Total,
    CfdiUsage,
    PaymentMethod,
    PaymentForm,
    ReceiverRegime,
    IssuerName,
    Concept,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::Subtotal,
        Column::Discount,
        Column::VatZeroRate,
        Column::VatExempt,
        Column::Vat16,
        Column::Total,
        Column::CfdiUsage,
        Column::PaymentMethod,
        Column::PaymentForm,
        Column::ReceiverRegime,
        Column::IssuerName,
        Column::Concept,
    ];

    /// Header text as exported by the SAT invoice downloader.
    pub fn header(self) -> &'static str {
        match self {
            Column::Subtotal => "SubTotal",
            Column::Discount => "Descuento",
            Column::VatZeroRate => "IVA Trasladado 0%",
            Column::VatExempt => "IVA Exento",
            Column::Vat16 => "IVA Trasladado 16%",
            Column::Total => "Total",
            Column::CfdiUsage => "Uso CFDI",
            Column::PaymentMethod => "Metodo pago",
            Column::PaymentForm => "Forma pago",
            Column::ReceiverRegime => "Regimen receptor",
            Column::IssuerName => "Razon emisor",
            Column::Concept => "Conceptos",
        }
    }

    /// Amount columns whose blank cells are written back as zero.
    pub fn is_zero_filled(self) -> bool {
        matches!(
            self,
            Column::Vat16 | Column::VatZeroRate | Column::VatExempt | Column::Discount
        )
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Header of the optional effect column.
pub const EFFECT_HEADER: &str = "Efecto";

/// Marker that identifies IEPS columns.
pub const EXCISE_MARKER: &str = "IEPS";

/// A discovered IEPS column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExciseColumn {
    pub index: usize,
    pub header: String,
}

/// Typed column positions for one sheet.
///
/// Required columns missing from the sheet are placed after the last
/// existing column, in [`Column::ALL`] order, and read as blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    indices: [usize; 12],
    missing: Vec<Column>,
    excise: Vec<ExciseColumn>,
    effect: Option<usize>,
    width: usize,
}

fn header_eq(header: &str, name: &str) -> bool {
    header.trim().to_lowercase() == name.trim().to_lowercase()
}

impl ColumnSchema {
    /// Resolve column positions from the header row.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Self {
        let find = |name: &str| headers.iter().position(|h| header_eq(h.as_ref(), name));

        let mut indices = [0usize; 12];
        let mut missing = Vec::new();
        let mut next = headers.len();
        for col in Column::ALL {
            match find(col.header()) {
                Some(idx) => indices[col.slot()] = idx,
                None => {
                    warn!(column = col.header(), position = next, "required column missing, appending");
                    indices[col.slot()] = next;
                    missing.push(col);
                    next += 1;
                }
            }
        }

        let excise: Vec<ExciseColumn> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.as_ref().to_uppercase().contains(EXCISE_MARKER))
            .map(|(index, h)| ExciseColumn {
                index,
                header: h.as_ref().trim().to_string(),
            })
            .collect();
        if excise.is_empty() {
            warn!("no IEPS columns found");
        } else {
            for col in &excise {
                info!(column = %col.header, index = col.index, "IEPS column found");
            }
        }

        let effect = find(EFFECT_HEADER);
        if let Some(idx) = effect {
            info!(index = idx, "effect column found");
        }

        Self {
            indices,
            missing,
            excise,
            effect,
            width: next,
        }
    }

    /// Position of a required column (possibly an appended one).
    pub fn index(&self, col: Column) -> usize {
        self.indices[col.slot()]
    }

    /// Required columns that were not in the header row.
    pub fn missing(&self) -> &[Column] {
        &self.missing
    }

    pub fn is_missing(&self, col: Column) -> bool {
        self.missing.contains(&col)
    }

    pub fn excise_columns(&self) -> &[ExciseColumn] {
        &self.excise
    }

    pub fn effect_index(&self) -> Option<usize> {
        self.effect
    }

    /// Number of columns once missing required columns are appended.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            excise_columns: self.excise.len(),
            effect_column: self.effect.is_some(),
        }
    }

    /// Build an [`InvoiceRow`] from a row of cells.
    ///
    /// Short rows are padded with blanks.
    pub fn extract_row(&self, cells: &[Cell]) -> InvoiceRow {
        let cell = |idx: usize| cells.get(idx).unwrap_or(&Cell::Empty);
        let amount = |col: Column| Amount::from(cell(self.index(col)));
        let text = |col: Column| cell(self.index(col)).as_text();

        InvoiceRow {
            subtotal: amount(Column::Subtotal),
            discount: amount(Column::Discount),
            vat_zero_rate: amount(Column::VatZeroRate),
            vat_exempt: amount(Column::VatExempt),
            vat_16: amount(Column::Vat16),
            total: amount(Column::Total),
            cfdi_usage: text(Column::CfdiUsage),
            payment_method: text(Column::PaymentMethod),
            payment_form: text(Column::PaymentForm),
            receiver_regime: text(Column::ReceiverRegime),
            issuer_name: text(Column::IssuerName),
            concept: text(Column::Concept).unwrap_or_default(),
            excise: self
                .excise
                .iter()
                .map(|c| Amount::from(cell(c.index)))
                .collect(),
            effect: self.effect.and_then(|idx| cell(idx).as_text()),
        }
    }
}
