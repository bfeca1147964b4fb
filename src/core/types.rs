use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A scalar spreadsheet cell, independent of the file format it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    /// No value at all.
    Empty,
    /// A numeric cell.
    Number(Decimal),
    /// A text cell (not trimmed).
    Text(String),
    /// A boolean cell.
    Bool(bool),
}

impl Cell {
    /// Text form of the cell, or `None` when it is empty.
    ///
    /// Numbers are rendered without trailing zeros, so a payment form typed
    /// as the number `3` reads as `"3"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(d) => Some(d.normalize().to_string()),
            Cell::Text(s) => Some(s.clone()),
            Cell::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        }
    }
}

/// A money amount read from a cell.
///
/// Blank cells count as zero everywhere. Cells that hold something other
/// than a number are kept as [`Amount::Invalid`]: the rule chain treats them
/// as zero, the VAT reconciliation treats them as unverifiable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Amount {
    #[default]
    Blank,
    Value(Decimal),
    Invalid(String),
}

impl Amount {
    /// The amount, with blank and invalid cells counting as zero.
    pub fn or_zero(&self) -> Decimal {
        match self {
            Amount::Value(d) => *d,
            Amount::Blank | Amount::Invalid(_) => Decimal::ZERO,
        }
    }

    /// The amount for arithmetic checks: blank is zero, invalid is `None`.
    pub fn checked(&self) -> Option<Decimal> {
        match self {
            Amount::Blank => Some(Decimal::ZERO),
            Amount::Value(d) => Some(*d),
            Amount::Invalid(_) => None,
        }
    }

    /// Whether the cell carries anything besides blank or zero.
    pub fn is_populated(&self) -> bool {
        match self {
            Amount::Blank => false,
            Amount::Value(d) => !d.is_zero(),
            Amount::Invalid(_) => true,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Amount::Blank)
    }
}

impl From<Decimal> for Amount {
    fn from(d: Decimal) -> Self {
        Amount::Value(d)
    }
}

impl From<&Cell> for Amount {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Empty => Amount::Blank,
            Cell::Number(d) => Amount::Value(*d),
            Cell::Text(s) if s.trim().is_empty() => Amount::Blank,
            Cell::Text(s) => match Decimal::from_str(s.trim()) {
                Ok(d) => Amount::Value(d),
                Err(_) => Amount::Invalid(s.clone()),
            },
            Cell::Bool(b) => Amount::Invalid(b.to_string()),
        }
    }
}

/// One invoice line as read from the sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InvoiceRow {
    /// SubTotal.
    pub subtotal: Amount,
    /// Descuento.
    pub discount: Amount,
    /// IVA Trasladado 0%, base of the zero-rate bracket.
    pub vat_zero_rate: Amount,
    /// IVA Exento.
    pub vat_exempt: Amount,
    /// IVA Trasladado 16% as stated on the invoice.
    pub vat_16: Amount,
    /// Total.
    pub total: Amount,
    /// Uso CFDI, e.g. "G03 - Gastos en general".
    pub cfdi_usage: Option<String>,
    /// Metodo pago, e.g. "PUE - Pago en una sola exhibición".
    pub payment_method: Option<String>,
    /// Forma pago, e.g. "01 - Efectivo".
    pub payment_form: Option<String>,
    /// Regimen receptor, e.g. "626 - Régimen Simplificado de Confianza".
    pub receiver_regime: Option<String>,
    /// Razon emisor.
    pub issuer_name: Option<String>,
    /// Conceptos (free text).
    pub concept: String,
    /// IEPS amounts, one per discovered excise column, in discovery order.
    pub excise: Vec<Amount>,
    /// Efecto, when the sheet has that column.
    pub effect: Option<String>,
}

impl InvoiceRow {
    /// Whether the optional effect field marks this row as an outflow.
    pub fn is_expense_effect(&self) -> bool {
        self.effect
            .as_deref()
            .map(|e| matches!(e.trim().to_uppercase().as_str(), "EGRESO" | "E"))
            .unwrap_or(false)
    }
}

/// Dataset-level facts about which optional columns exist.
///
/// Resolved once per sheet and passed to the evaluator; rows never probe
/// for columns themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Number of IEPS columns discovered.
    pub excise_columns: usize,
    /// Whether an "Efecto" column exists.
    pub effect_column: bool,
}

impl Capabilities {
    pub fn has_excise(&self) -> bool {
        self.excise_columns > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_from_cells() {
        assert_eq!(Amount::from(&Cell::Empty), Amount::Blank);
        assert_eq!(Amount::from(&Cell::Text("  ".into())), Amount::Blank);
        assert_eq!(
            Amount::from(&Cell::Text(" 12.50 ".into())),
            Amount::Value(dec!(12.50))
        );
        assert_eq!(
            Amount::from(&Cell::Text("n/a".into())),
            Amount::Invalid("n/a".into())
        );
    }

    #[test]
    fn invalid_amount_counts_as_zero_but_is_unchecked() {
        let a = Amount::Invalid("abc".into());
        assert_eq!(a.or_zero(), Decimal::ZERO);
        assert_eq!(a.checked(), None);
        assert!(a.is_populated());
    }

    #[test]
    fn zero_is_not_populated() {
        assert!(!Amount::Value(dec!(0.00)).is_populated());
        assert!(!Amount::Blank.is_populated());
        assert!(Amount::Value(dec!(0.01)).is_populated());
    }

    #[test]
    fn number_cell_text_is_normalized() {
        assert_eq!(Cell::Number(dec!(3.00)).as_text().as_deref(), Some("3"));
        assert_eq!(Cell::Empty.as_text(), None);
    }

    #[test]
    fn expense_effect_variants() {
        let mut row = InvoiceRow::default();
        assert!(!row.is_expense_effect());
        row.effect = Some(" egreso ".into());
        assert!(row.is_expense_effect());
        row.effect = Some("E".into());
        assert!(row.is_expense_effect());
        row.effect = Some("Ingreso".into());
        assert!(!row.is_expense_effect());
    }
}
