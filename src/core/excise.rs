//! IEPS handling for fuel rows.
//!
//! Fuel IEPS is accounted for inside the zero-rate bracket, so for fuel
//! rows the first populated IEPS column replaces the IVA 0% amount.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{Amount, Capabilities, InvoiceRow};

/// Whether a fuel row had its IEPS accounted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FuelExcise {
    WithExcise,
    WithoutExcise,
}

/// Outcome of IEPS resolution for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExciseResolution {
    /// Zero-rate amount to use for the tax bases.
    pub zero_rate: Amount,
    /// Index into `InvoiceRow::excise` of the substituted column.
    pub substituted_from: Option<usize>,
    /// Fuel tag; `None` for non-fuel rows.
    pub fuel: Option<FuelExcise>,
}

/// Resolve the zero-rate amount of `row`.
///
/// Non-fuel rows keep their own IVA 0% amount even when IEPS columns hold
/// values. When several IEPS columns are populated the first one in
/// discovery order wins.
pub fn resolve_excise(row: &InvoiceRow, is_fuel: bool, caps: &Capabilities) -> ExciseResolution {
    if !is_fuel {
        return ExciseResolution {
            zero_rate: row.vat_zero_rate.clone(),
            substituted_from: None,
            fuel: None,
        };
    }

    let populated = if caps.has_excise() {
        row.excise.iter().position(Amount::is_populated)
    } else {
        None
    };

    match populated {
        Some(idx) => {
            debug!(column = idx, value = ?row.excise[idx], "IEPS moved into zero-rate bracket");
            ExciseResolution {
                zero_rate: row.excise[idx].clone(),
                substituted_from: Some(idx),
                fuel: Some(FuelExcise::WithExcise),
            }
        }
        None => ExciseResolution {
            zero_rate: row.vat_zero_rate.clone(),
            substituted_from: None,
            fuel: Some(FuelExcise::WithoutExcise),
        },
    }
}
