use serde::{Deserialize, Serialize};

use super::codes::{RegimeCategory, UsageHighlight, extract_code, usage_highlight};
use super::excise::{ExciseResolution, FuelExcise, resolve_excise};
use super::fuel::is_fuel;
use super::policy::RulePolicy;
use super::rules::{Reason, Verdict, evaluate_rules};
use super::tax_base::{TaxBases, compute_tax_bases};
use super::types::{Capabilities, InvoiceRow};

/// How a fuel purchase was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelPayment {
    Cash,
    Electronic,
    /// Neither cash nor an accepted electronic form.
    Other,
}

/// Display categories for one row. None of these feed the verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowTags {
    pub regime: RegimeCategory,
    pub usage: Option<UsageHighlight>,
    pub fuel: Option<FuelExcise>,
    pub fuel_payment: Option<FuelPayment>,
    /// IEPS was moved into the zero-rate bracket.
    pub excise_substituted: bool,
    /// Non-fuel cash payment above the limit.
    pub cash_over_limit: bool,
    /// Cash fuel purchase covered by the regime allowance.
    pub fuel_cash_allowance: bool,
    pub vat_verified: bool,
    pub expense_effect: bool,
}

/// Everything computed for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub is_fuel: bool,
    pub excise: ExciseResolution,
    pub bases: TaxBases,
    pub verdict: Verdict,
    pub tags: RowTags,
}

/// Evaluate one row: fuel detection, IEPS resolution, tax bases, rules.
///
/// Pure: the same row, capabilities and policy always give the same
/// outcome, and rows do not influence each other.
///
/// ```
/// use deducible::core::*;
/// use rust_decimal_macros::dec;
///
/// let row = InvoiceRowBuilder::new()
///     .usage("G01 - Adquisición de mercancías")
///     .method("PUE")
///     .form("04")
///     .total(dec!(5000))
///     .build();
/// let outcome = evaluate_row(&row, &Capabilities::default(), &RulePolicy::default());
/// assert!(outcome.verdict.is_deductible);
/// assert_eq!(outcome.verdict.display_reasons(), vec!["meets all requirements"]);
/// ```
pub fn evaluate_row(row: &InvoiceRow, caps: &Capabilities, policy: &RulePolicy) -> RowOutcome {
    let fuel = is_fuel(&row.concept, &policy.fuel_keywords);
    let excise = resolve_excise(row, fuel, caps);
    let bases = compute_tax_bases(row, &excise.zero_rate);
    let verdict = evaluate_rules(row, fuel, policy);

    let form = extract_code(row.payment_form.as_deref()).to_uppercase();
    let fuel_payment = fuel.then(|| {
        if policy.is_cash(&form) {
            FuelPayment::Cash
        } else if policy.is_electronic_form(&form) {
            FuelPayment::Electronic
        } else {
            FuelPayment::Other
        }
    });

    let tags = RowTags {
        regime: RegimeCategory::from_code(&extract_code(row.receiver_regime.as_deref())),
        usage: usage_highlight(row.cfdi_usage.as_deref()),
        fuel: excise.fuel,
        fuel_payment,
        excise_substituted: excise.substituted_from.is_some(),
        cash_over_limit: verdict.has_reason(|r| matches!(r, Reason::CashOverLimit { .. })),
        fuel_cash_allowance: verdict
            .has_reason(|r| matches!(r, Reason::FuelCashAllowance { .. })),
        vat_verified: bases.is_vat_verified(),
        expense_effect: caps.effect_column && row.is_expense_effect(),
    };

    RowOutcome {
        is_fuel: fuel,
        excise,
        bases,
        verdict,
        tags,
    }
}

/// Evaluate every row in order.
pub fn evaluate_rows(rows: &[InvoiceRow], caps: &Capabilities, policy: &RulePolicy) -> Vec<RowOutcome> {
    rows.iter().map(|r| evaluate_row(r, caps, policy)).collect()
}
