//! Run-level counters over evaluated rows.

use serde::{Deserialize, Serialize};

use super::codes::UsageHighlight;
use super::excise::FuelExcise;
use super::outcome::{FuelPayment, RowOutcome};

/// Diagnostic counters for one validation run.
///
/// Built by folding row outcomes; it never influences a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_rows: usize,
    pub deductible: usize,
    pub not_deductible: usize,
    pub fuel_with_excise: usize,
    pub fuel_without_excise: usize,
    pub fuel_cash: usize,
    pub fuel_electronic: usize,
    pub fuel_cash_allowance: usize,
    pub usage_s01: usize,
    pub cash_over_limit: usize,
    pub excise_substituted: usize,
    pub vat_verified: usize,
}

impl RunSummary {
    /// Add one row outcome.
    #[must_use]
    pub fn record(mut self, outcome: &RowOutcome) -> Self {
        let tags = &outcome.tags;
        self.total_rows += 1;
        if outcome.verdict.is_deductible {
            self.deductible += 1;
        } else {
            self.not_deductible += 1;
        }
        match tags.fuel {
            Some(FuelExcise::WithExcise) => self.fuel_with_excise += 1,
            Some(FuelExcise::WithoutExcise) => self.fuel_without_excise += 1,
            None => {}
        }
        match tags.fuel_payment {
            Some(FuelPayment::Cash) => self.fuel_cash += 1,
            Some(FuelPayment::Electronic) => self.fuel_electronic += 1,
            Some(FuelPayment::Other) | None => {}
        }
        self.fuel_cash_allowance += usize::from(tags.fuel_cash_allowance);
        self.usage_s01 += usize::from(tags.usage == Some(UsageHighlight::NoTaxEffects));
        self.cash_over_limit += usize::from(tags.cash_over_limit);
        self.excise_substituted += usize::from(tags.excise_substituted);
        self.vat_verified += usize::from(tags.vat_verified);
        self
    }

    /// Combine counters of two partial runs.
    #[must_use]
    pub fn merge(self, other: RunSummary) -> Self {
        Self {
            total_rows: self.total_rows + other.total_rows,
            deductible: self.deductible + other.deductible,
            not_deductible: self.not_deductible + other.not_deductible,
            fuel_with_excise: self.fuel_with_excise + other.fuel_with_excise,
            fuel_without_excise: self.fuel_without_excise + other.fuel_without_excise,
            fuel_cash: self.fuel_cash + other.fuel_cash,
            fuel_electronic: self.fuel_electronic + other.fuel_electronic,
            fuel_cash_allowance: self.fuel_cash_allowance + other.fuel_cash_allowance,
            usage_s01: self.usage_s01 + other.usage_s01,
            cash_over_limit: self.cash_over_limit + other.cash_over_limit,
            excise_substituted: self.excise_substituted + other.excise_substituted,
            vat_verified: self.vat_verified + other.vat_verified,
        }
    }
}

impl<'a> Extend<&'a RowOutcome> for RunSummary {
    fn extend<I: IntoIterator<Item = &'a RowOutcome>>(&mut self, iter: I) {
        *self = iter.into_iter().fold(*self, RunSummary::record);
    }
}

impl<'a> FromIterator<&'a RowOutcome> for RunSummary {
    fn from_iter<I: IntoIterator<Item = &'a RowOutcome>>(iter: I) -> Self {
        iter.into_iter().fold(RunSummary::default(), RunSummary::record)
    }
}
