//! Rule thresholds and catalog sets as data.
//!
//! [`RulePolicy::default`] is the current LISR Art. 27 rule set. Every
//! threshold and code set can be overridden through [`RulePolicyBuilder`]
//! or by deserializing a policy file.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::codes::REGIME_RESICO;
use super::error::{DeducibleError, PolicyIssue};
use super::fuel::DEFAULT_FUEL_KEYWORDS;

/// Cash limit of LISR Art. 27 fr. III.
pub const CASH_LIMIT: Decimal = dec!(2000);

/// SAT c_FormaPago code for cash.
pub const CASH_FORM: &str = "01";

/// Allowance for cash fuel purchases by receivers in specific regimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelCashException {
    /// Receiver regime codes that qualify.
    pub regimes: Vec<String>,
    /// Highest total (inclusive) the allowance covers.
    pub limit: Decimal,
}

impl FuelCashException {
    pub fn applies(&self, regime: &str, total: Decimal) -> bool {
        total <= self.limit && self.regimes.iter().any(|r| r == regime)
    }
}

/// Data-driven deductibility rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulePolicy {
    /// Uso CFDI codes that allow a deduction.
    pub deductible_usages: Vec<String>,
    /// Accepted Metodo pago codes.
    pub payment_methods: Vec<String>,
    /// Forma pago codes accepted for non-fuel purchases.
    pub payment_forms: Vec<String>,
    /// Forma pago codes that count as electronic for fuel purchases.
    pub electronic_forms: Vec<String>,
    /// Forma pago code meaning cash.
    pub cash_form: String,
    /// Cash payments above this total are not deductible.
    pub cash_limit: Decimal,
    /// Cash fuel allowance; `None` bans every cash fuel purchase.
    pub fuel_cash_exception: Option<FuelCashException>,
    /// Lowercase fuel vocabulary, matched as substrings.
    pub fuel_keywords: Vec<String>,
}

fn codes(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            deductible_usages: codes(&["G01", "G02", "G03"]),
            payment_methods: codes(&["PUE", "PPD"]),
            payment_forms: codes(&["01", "02", "03", "04", "28"]),
            electronic_forms: codes(&["02", "03", "04", "05", "06", "28", "29"]),
            cash_form: CASH_FORM.to_string(),
            cash_limit: CASH_LIMIT,
            fuel_cash_exception: Some(FuelCashException {
                regimes: vec![REGIME_RESICO.to_string()],
                limit: CASH_LIMIT,
            }),
            fuel_keywords: codes(DEFAULT_FUEL_KEYWORDS),
        }
    }
}

impl RulePolicy {
    pub fn is_deductible_usage(&self, code: &str) -> bool {
        self.deductible_usages.iter().any(|c| c == code)
    }

    pub fn is_valid_method(&self, code: &str) -> bool {
        self.payment_methods.iter().any(|c| c == code)
    }

    pub fn is_valid_form(&self, code: &str) -> bool {
        self.payment_forms.iter().any(|c| c == code)
    }

    pub fn is_electronic_form(&self, code: &str) -> bool {
        self.electronic_forms.iter().any(|c| c == code)
    }

    pub fn is_cash(&self, code: &str) -> bool {
        code == self.cash_form
    }

    /// Check the policy for problems. Returns all issues found.
    pub fn validate(&self) -> Vec<PolicyIssue> {
        let mut issues = Vec::new();

        for (field, list) in [
            ("deductible_usages", &self.deductible_usages),
            ("payment_methods", &self.payment_methods),
            ("payment_forms", &self.payment_forms),
            ("electronic_forms", &self.electronic_forms),
        ] {
            if list.is_empty() {
                issues.push(PolicyIssue::new(field, "must not be empty"));
            }
            for code in list {
                if code.trim().is_empty() {
                    issues.push(PolicyIssue::new(field, "contains a blank code"));
                } else if code.trim() != code || code.to_uppercase() != *code {
                    issues.push(PolicyIssue::new(
                        field,
                        format!("code '{code}' must be trimmed and uppercase"),
                    ));
                }
            }
        }

        if self.cash_form.trim().is_empty() {
            issues.push(PolicyIssue::new("cash_form", "must not be empty"));
        }

        if self.cash_limit.is_sign_negative() {
            issues.push(PolicyIssue::new(
                "cash_limit",
                format!("must not be negative, got {}", self.cash_limit),
            ));
        }

        if let Some(exception) = &self.fuel_cash_exception {
            if exception.regimes.is_empty() {
                issues.push(PolicyIssue::new(
                    "fuel_cash_exception.regimes",
                    "must not be empty; omit the exception to ban all cash fuel purchases",
                ));
            }
            if exception.limit.is_sign_negative() {
                issues.push(PolicyIssue::new(
                    "fuel_cash_exception.limit",
                    format!("must not be negative, got {}", exception.limit),
                ));
            }
        }

        for keyword in &self.fuel_keywords {
            if keyword.is_empty() {
                issues.push(PolicyIssue::new("fuel_keywords", "contains an empty keyword"));
            } else if keyword.to_lowercase() != *keyword {
                issues.push(PolicyIssue::new(
                    "fuel_keywords",
                    format!("keyword '{keyword}' must be lowercase"),
                ));
            }
        }

        issues
    }

    /// Validate and return the policy, or a [`DeducibleError::Policy`].
    pub fn validated(self) -> Result<Self, DeducibleError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(self)
        } else {
            Err(issues.into())
        }
    }
}

/// Builder for [`RulePolicy`], starting from the default rule set.
///
/// ```
/// use deducible::core::*;
/// use rust_decimal_macros::dec;
///
/// let policy = RulePolicyBuilder::new()
///     .cash_limit(dec!(1500))
///     .without_fuel_cash_exception()
///     .build()
///     .unwrap();
/// assert!(policy.fuel_cash_exception.is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RulePolicyBuilder {
    policy: RulePolicy,
}

impl RulePolicyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deductible_usages<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.deductible_usages = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn payment_methods<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.payment_methods = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn payment_forms<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.payment_forms = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn electronic_forms<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.electronic_forms = codes.into_iter().map(Into::into).collect();
        self
    }

    pub fn cash_limit(mut self, limit: Decimal) -> Self {
        self.policy.cash_limit = limit;
        self
    }

    /// Allow cash fuel purchases up to `limit` for the given regimes.
    pub fn fuel_cash_exception<I, S>(mut self, regimes: I, limit: Decimal) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.fuel_cash_exception = Some(FuelCashException {
            regimes: regimes.into_iter().map(Into::into).collect(),
            limit,
        });
        self
    }

    /// Ban every cash fuel purchase regardless of regime.
    pub fn without_fuel_cash_exception(mut self) -> Self {
        self.policy.fuel_cash_exception = None;
        self
    }

    pub fn fuel_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.fuel_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    /// Build and validate the policy.
    pub fn build(self) -> Result<RulePolicy, DeducibleError> {
        self.policy.validated()
    }
}
