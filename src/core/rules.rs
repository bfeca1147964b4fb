use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::codes::{extract_code, extract_code_upper};
use super::policy::RulePolicy;
use super::types::InvoiceRow;

/// Display text when a row passes every rule without remarks.
pub const MEETS_ALL_REQUIREMENTS: &str = "meets all requirements";

/// Why a row was rejected, or a remark attached to an accepted row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    /// Uso CFDI outside the deductible set.
    UsageNotDeductible { usage: String },
    /// Metodo pago outside the accepted set.
    InvalidPaymentMethod { method: String },
    /// Fuel paid in cash by a receiver without the allowance.
    FuelCashBanned,
    /// Fuel paid in cash, covered by the regime allowance. Not a rejection.
    FuelCashAllowance { total: Decimal, limit: Decimal },
    /// Fuel paid with a non-electronic, non-cash form.
    InvalidFuelPaymentForm { form: String },
    /// Non-fuel cash payment above the cash limit.
    CashOverLimit { total: Decimal, limit: Decimal },
    /// Forma pago outside the accepted set.
    InvalidPaymentForm { form: String },
}

impl Reason {
    /// Whether this reason takes the deduction away.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Reason::FuelCashAllowance { .. })
    }
}

fn shown(code: &str) -> &str {
    if code.is_empty() { "missing" } else { code }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reason::UsageNotDeductible { usage } => {
                write!(f, "usage code not deductible ({})", shown(usage))
            }
            Reason::InvalidPaymentMethod { method } => {
                write!(f, "invalid payment method ({})", shown(method))
            }
            Reason::FuelCashBanned => write!(f, "fuel purchase in cash is never deductible"),
            Reason::FuelCashAllowance { total, limit } => write!(
                f,
                "cash fuel purchase under simplified-regime allowance (total {total} <= {limit})"
            ),
            Reason::InvalidFuelPaymentForm { form } => write!(
                f,
                "invalid payment form for fuel ({}); fuel must be paid electronically",
                shown(form)
            ),
            Reason::CashOverLimit { total, limit } => {
                write!(f, "cash payment over threshold (total {total} > {limit})")
            }
            Reason::InvalidPaymentForm { form } => {
                write!(f, "invalid payment form ({})", shown(form))
            }
        }
    }
}

/// Deductibility decision for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_deductible: bool,
    /// Reasons in rule order. Empty when nothing is worth reporting.
    pub reasons: Vec<Reason>,
}

impl Verdict {
    /// Reasons as display strings, with the canonical text for a clean row.
    pub fn display_reasons(&self) -> Vec<String> {
        if self.reasons.is_empty() {
            vec![MEETS_ALL_REQUIREMENTS.to_string()]
        } else {
            self.reasons.iter().map(ToString::to_string).collect()
        }
    }

    pub fn has_reason(&self, pred: impl Fn(&Reason) -> bool) -> bool {
        self.reasons.iter().any(pred)
    }
}

/// Run the LISR Art. 27 rule chain over one row.
///
/// Every rule runs; a failing rule records its reason and clears the
/// verdict, it does not stop the chain.
///
/// 1. Uso CFDI must be deductible.
/// 2. Metodo pago must be accepted.
/// 3. Fuel: cash is banned unless the regime allowance covers it; other
///    forms must be electronic.
/// 4. Non-fuel: cash above the limit is rejected; other forms must be in
///    the accepted set.
pub fn evaluate_rules(row: &InvoiceRow, is_fuel: bool, policy: &RulePolicy) -> Verdict {
    let mut reasons = Vec::new();

    let usage = extract_code_upper(row.cfdi_usage.as_deref());
    if !policy.is_deductible_usage(&usage) {
        reasons.push(Reason::UsageNotDeductible { usage });
    }

    let method = extract_code_upper(row.payment_method.as_deref());
    if !policy.is_valid_method(&method) {
        reasons.push(Reason::InvalidPaymentMethod { method });
    }

    let form = extract_code_upper(row.payment_form.as_deref());
    let total = row.total.or_zero();

    if is_fuel {
        check_fuel_payment(row, &form, total, policy, &mut reasons);
    } else if policy.is_cash(&form) && total > policy.cash_limit {
        reasons.push(Reason::CashOverLimit {
            total,
            limit: policy.cash_limit,
        });
    } else if !policy.is_valid_form(&form) {
        reasons.push(Reason::InvalidPaymentForm { form });
    }

    Verdict {
        is_deductible: !reasons.iter().any(Reason::is_rejection),
        reasons,
    }
}

fn check_fuel_payment(
    row: &InvoiceRow,
    form: &str,
    total: Decimal,
    policy: &RulePolicy,
    reasons: &mut Vec<Reason>,
) {
    if policy.is_cash(form) {
        let regime = extract_code(row.receiver_regime.as_deref());
        match &policy.fuel_cash_exception {
            Some(exception) if exception.applies(&regime, total) => {
                reasons.push(Reason::FuelCashAllowance {
                    total,
                    limit: exception.limit,
                });
            }
            _ => reasons.push(Reason::FuelCashBanned),
        }
    } else if !policy.is_electronic_form(form) {
        reasons.push(Reason::InvalidFuelPaymentForm {
            form: form.to_string(),
        });
    }
}
