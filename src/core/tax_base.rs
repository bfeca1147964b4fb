use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::{Amount, InvoiceRow};

/// General IVA rate.
pub const VAT_RATE_16: Decimal = dec!(0.16);

/// Largest difference still accepted as a match.
pub const VAT_TOLERANCE: Decimal = dec!(0.01);

/// Derived tax bases for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBases {
    /// SUB1-16%: subtotal minus discount.
    pub base_after_discount: Decimal,
    /// SUB0%: the zero-rate bracket (after any IEPS substitution).
    pub zero_rate: Decimal,
    /// SUB2-16%: the part taxed at 16%.
    pub base_at_16: Decimal,
    /// IVA ACREDITABLE 16%, rounded to cents.
    pub expected_vat_16: Decimal,
    /// C IVA: expected minus stated 16% VAT.
    pub vat_difference: Decimal,
    /// T2: base at 16% plus zero-rate plus stated VAT.
    pub recomputed_total: Decimal,
    /// Comprobación T2: stated total minus recomputed total.
    pub total_difference: Decimal,
    /// Whether stated and expected VAT agree. `None` when an input was
    /// not a number or the arithmetic overflowed, so the check could not
    /// be made.
    pub matches_stated_vat_16: Option<bool>,
}

impl TaxBases {
    pub fn is_vat_verified(&self) -> bool {
        self.matches_stated_vat_16 == Some(true)
    }
}

/// Round to cents, halves away from zero (as spreadsheet `ROUND` does).
fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn vat_at_16(base: Decimal) -> Option<Decimal> {
    base.checked_mul(VAT_RATE_16).map(round_cents)
}

/// Compute the tax bases of `row`.
///
/// `zero_rate` is passed separately because IEPS resolution may have
/// replaced the row's own zero-rate amount. A derived value whose
/// arithmetic overflows is reported as zero and the VAT check as `None`.
pub fn compute_tax_bases(row: &InvoiceRow, zero_rate: &Amount) -> TaxBases {
    let subtotal = row.subtotal.or_zero();
    let discount = row.discount.or_zero();
    let zero = zero_rate.or_zero();
    let stated = row.vat_16.or_zero();

    let base_after_discount = subtotal.checked_sub(discount);
    let base_at_16 = base_after_discount.and_then(|b| b.checked_sub(zero));
    let expected_vat_16 = base_at_16.and_then(vat_at_16);
    let vat_difference = expected_vat_16.and_then(|e| e.checked_sub(stated));
    let recomputed_total = base_at_16
        .and_then(|b| b.checked_add(zero))
        .and_then(|t| t.checked_add(stated));
    let total_difference = recomputed_total.and_then(|t| row.total.or_zero().checked_sub(t));

    let derived = [
        base_after_discount,
        base_at_16,
        expected_vat_16,
        vat_difference,
        recomputed_total,
        total_difference,
    ];
    let overflowed = derived.iter().any(Option::is_none);
    if overflowed {
        warn!(%subtotal, %discount, %zero, %stated, "tax base arithmetic overflowed");
    }

    TaxBases {
        base_after_discount: base_after_discount.unwrap_or_default(),
        zero_rate: zero,
        base_at_16: base_at_16.unwrap_or_default(),
        expected_vat_16: expected_vat_16.unwrap_or_default(),
        vat_difference: vat_difference.unwrap_or_default(),
        recomputed_total: recomputed_total.unwrap_or_default(),
        total_difference: total_difference.unwrap_or_default(),
        matches_stated_vat_16: if overflowed {
            None
        } else {
            vat_matches(&row.subtotal, &row.discount, zero_rate, &row.vat_16)
        },
    }
}

/// Reconcile stated 16% VAT against the recomputed base.
///
/// Returns `None` if any input is not a number or the arithmetic overflows.
pub fn vat_matches(
    subtotal: &Amount,
    discount: &Amount,
    zero_rate: &Amount,
    stated_vat_16: &Amount,
) -> Option<bool> {
    let base_at_16 = subtotal
        .checked()?
        .checked_sub(discount.checked()?)?
        .checked_sub(zero_rate.checked()?)?;
    let expected = vat_at_16(base_at_16)?;
    let stated = round_cents(stated_vat_16.checked()?);
    Some(expected.checked_sub(stated)?.abs() < VAT_TOLERANCE)
}
