//! Core row model, rule chain and run summary.
//!
//! Everything in here is pure computation over in-memory rows: no file
//! access, no global state. Rows are independent of each other, so a
//! caller may evaluate them in any order or in parallel.

mod builder;
mod codes;
mod error;
mod excise;
mod fuel;
mod outcome;
mod policy;
mod rules;
mod schema;
mod summary;
mod tax_base;
mod types;

pub use builder::*;
pub use codes::*;
pub use error::*;
pub use excise::*;
pub use fuel::*;
pub use outcome::*;
pub use policy::*;
pub use rules::*;
pub use schema::*;
pub use summary::*;
pub use tax_base::*;
pub use types::*;
