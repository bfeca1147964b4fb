//! # deducible
//!
//! Deductibility validation (LISR Art. 27) for Mexican CFDI invoice
//! exports: IVA 16%/0% reconciliation, IEPS handling for fuel, payment
//! method and form checks, and the cash limits for fuel and general
//! purchases.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use deducible::core::*;
//! use rust_decimal_macros::dec;
//!
//! let row = InvoiceRowBuilder::new()
//!     .usage("G03 - Gastos en general")
//!     .method("PUE - Pago en una sola exhibición")
//!     .form("01 - Efectivo")
//!     .regime("626 - Régimen Simplificado de Confianza")
//!     .concept("Gasolina Magna")
//!     .subtotal(dec!(1000))
//!     .vat_16(dec!(160))
//!     .total(dec!(1160))
//!     .build();
//!
//! let outcome = evaluate_row(&row, &Capabilities::default(), &RulePolicy::default());
//! assert!(outcome.is_fuel);
//! assert!(outcome.verdict.is_deductible);
//! assert!(outcome.tags.fuel_cash_allowance);
//! assert!(outcome.bases.is_vat_verified());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Row model, rule chain, policy, run summary |
//! | `xlsx` | Read invoice workbooks, write the validated copy |
//! | `cli` | `deducible` command-line tool |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xlsx")]
pub mod xlsx;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
