//! Fuel purchase detection from the free-text concept.
//!
//! Matching is a case-insensitive substring search. Short terms such as
//! `gas` also match unrelated concepts ("gas doméstico", "gastos"), which
//! is accepted: the vocabulary is policy and can be narrowed per run.

/// Default fuel vocabulary.
pub const DEFAULT_FUEL_KEYWORDS: &[&str] = &[
    "gasolina",
    "combustible",
    "magna",
    "premium",
    "diesel",
    "diésel",
    "gasohol",
    "gasoil",
    "nafta",
    "petrol",
    "gas",
    "energético",
    "turbosina",
    "combustóleo",
];

/// Whether `concept` contains any of `keywords`, ignoring case on both sides.
///
/// An empty keyword never matches.
pub fn is_fuel<S: AsRef<str>>(concept: &str, keywords: &[S]) -> bool {
    if concept.is_empty() {
        return false;
    }
    let concept = concept.to_lowercase();
    keywords.iter().any(|k| {
        let k = k.as_ref();
        !k.is_empty() && concept.contains(&k.to_lowercase())
    })
}
