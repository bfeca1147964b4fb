//! Cell fills for the augmented sheet.
//!
//! Row outcomes are mapped to semantic [`Fill`]s first; the [`Palette`]
//! turns those into concrete colors at write time.

use std::collections::BTreeMap;

use rust_xlsxwriter::Color;

use crate::core::{Column, ColumnSchema, FuelExcise, RegimeCategory, RowOutcome, UsageHighlight};

use super::Derived;

/// Semantic fill of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fill {
    /// Headers, RESICO regime, fuel with IEPS, deductible outflows.
    Accent,
    /// Verified VAT, refund usage, deductible rows.
    Ok,
    /// Rejected rows, S01 usage, cash over the limit.
    Reject,
    /// Regime 612.
    Secondary,
    /// Unrecognized regime, fuel without IEPS, substituted IEPS, cash fuel allowance.
    Warning,
}

/// Colors for each [`Fill`].
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub ok: Color,
    pub reject: Color,
    pub secondary: Color,
    pub warning: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: Color::RGB(0x00B0F0),
            ok: Color::RGB(0x00FF00),
            reject: Color::RGB(0xFF0000),
            secondary: Color::RGB(0x800080),
            warning: Color::RGB(0xFFA500),
        }
    }
}

impl Palette {
    pub fn color(&self, fill: Fill) -> Color {
        match fill {
            Fill::Accent => self.accent,
            Fill::Ok => self.ok,
            Fill::Reject => self.reject,
            Fill::Secondary => self.secondary,
            Fill::Warning => self.warning,
        }
    }
}

/// Fills for one data row, keyed by column index.
///
/// Derived columns are placed after `schema.width()`.
pub fn row_fills(schema: &ColumnSchema, outcome: &RowOutcome) -> BTreeMap<usize, Fill> {
    let tags = &outcome.tags;
    let derived = |d: Derived| schema.width() + d as usize;
    let mut fills = BTreeMap::new();

    match tags.fuel {
        Some(FuelExcise::WithExcise) => {
            fills.insert(schema.index(Column::Concept), Fill::Accent);
        }
        Some(FuelExcise::WithoutExcise) => {
            fills.insert(schema.index(Column::Concept), Fill::Warning);
        }
        None => {}
    }

    if tags.excise_substituted {
        fills.insert(schema.index(Column::VatZeroRate), Fill::Warning);
    }

    if tags.vat_verified {
        fills.insert(schema.index(Column::Vat16), Fill::Ok);
        fills.insert(derived(Derived::ExpectedVat16), Fill::Ok);
    }

    let regime = schema.index(Column::ReceiverRegime);
    match tags.regime {
        RegimeCategory::Simplified => {
            fills.insert(regime, Fill::Accent);
        }
        RegimeCategory::Business => {
            fills.insert(regime, Fill::Secondary);
        }
        RegimeCategory::Unrecognized => {
            fills.insert(regime, Fill::Warning);
            fills.insert(schema.index(Column::IssuerName), Fill::Warning);
        }
    }

    match tags.usage {
        Some(UsageHighlight::Refund) => {
            fills.insert(schema.index(Column::CfdiUsage), Fill::Ok);
        }
        Some(UsageHighlight::NoTaxEffects) => {
            fills.insert(schema.index(Column::CfdiUsage), Fill::Reject);
        }
        None => {}
    }

    if tags.fuel_cash_allowance {
        fills.insert(schema.index(Column::PaymentForm), Fill::Warning);
    }

    let verdict_fill = if !outcome.verdict.is_deductible || tags.cash_over_limit {
        Fill::Reject
    } else if tags.expense_effect {
        Fill::Accent
    } else {
        Fill::Ok
    };
    fills.insert(derived(Derived::Deductible), verdict_fill);

    if tags.cash_over_limit {
        if let Some(effect) = schema.effect_index() {
            fills.insert(effect, Fill::Reject);
        }
    }

    fills
}
