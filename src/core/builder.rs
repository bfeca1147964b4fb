use rust_decimal::Decimal;

use super::types::{Amount, InvoiceRow};

/// Builder for [`InvoiceRow`], mostly for tests and programmatic input.
///
/// Unset amounts stay blank, unset text fields stay absent.
///
/// ```
/// use deducible::core::*;
/// use rust_decimal_macros::dec;
///
/// let row = InvoiceRowBuilder::new()
///     .usage("G03 - Gastos en general")
///     .method("PUE")
///     .form("03 - Transferencia electrónica de fondos")
///     .subtotal(dec!(1000))
///     .vat_16(dec!(160))
///     .total(dec!(1160))
///     .build();
/// assert_eq!(row.total, Amount::Value(dec!(1160)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InvoiceRowBuilder {
    row: InvoiceRow,
}

impl InvoiceRowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subtotal(mut self, amount: Decimal) -> Self {
        self.row.subtotal = Amount::Value(amount);
        self
    }

    pub fn discount(mut self, amount: Decimal) -> Self {
        self.row.discount = Amount::Value(amount);
        self
    }

    pub fn vat_zero_rate(mut self, amount: Decimal) -> Self {
        self.row.vat_zero_rate = Amount::Value(amount);
        self
    }

    pub fn vat_exempt(mut self, amount: Decimal) -> Self {
        self.row.vat_exempt = Amount::Value(amount);
        self
    }

    pub fn vat_16(mut self, amount: Decimal) -> Self {
        self.row.vat_16 = Amount::Value(amount);
        self
    }

    pub fn total(mut self, amount: Decimal) -> Self {
        self.row.total = Amount::Value(amount);
        self
    }

    /// Uso CFDI, with or without description.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.row.cfdi_usage = Some(usage.into());
        self
    }

    /// Metodo pago.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.row.payment_method = Some(method.into());
        self
    }

    /// Forma pago.
    pub fn form(mut self, form: impl Into<String>) -> Self {
        self.row.payment_form = Some(form.into());
        self
    }

    /// Regimen receptor.
    pub fn regime(mut self, regime: impl Into<String>) -> Self {
        self.row.receiver_regime = Some(regime.into());
        self
    }

    pub fn issuer(mut self, name: impl Into<String>) -> Self {
        self.row.issuer_name = Some(name.into());
        self
    }

    pub fn concept(mut self, concept: impl Into<String>) -> Self {
        self.row.concept = concept.into();
        self
    }

    /// IEPS amounts in column order.
    pub fn excise(mut self, amounts: Vec<Amount>) -> Self {
        self.row.excise = amounts;
        self
    }

    pub fn effect(mut self, effect: impl Into<String>) -> Self {
        self.row.effect = Some(effect.into());
        self
    }

    pub fn build(self) -> InvoiceRow {
        self.row
    }
}
