//! SAT catalog code handling.
//!
//! CFDI exports usually carry catalog fields as `"CODE - Description"`.
//! Only the code is meaningful to the rules.

use serde::{Deserialize, Serialize};

/// Régimen Simplificado de Confianza (RESICO).
pub const REGIME_RESICO: &str = "626";

/// Personas Físicas con Actividades Empresariales y Profesionales.
pub const REGIME_BUSINESS: &str = "612";

/// Uso CFDI "Sin efectos fiscales".
pub const USAGE_NO_TAX_EFFECTS: &str = "S01";

/// Full usage text that gets the refund highlight.
pub const USAGE_REFUND_TEXT: &str = "G02 - Devoluciones, descuentos o bonificaciones";

/// Extract the leading code from a `"CODE - Description"` value.
///
/// Returns the trimmed text before the first `-`, the trimmed whole value
/// when there is no separator, or an empty string for absent input.
///
/// ```
/// use deducible::core::extract_code;
///
/// assert_eq!(extract_code(Some("G01 - Honorarios")), "G01");
/// assert_eq!(extract_code(Some("G01")), "G01");
/// assert_eq!(extract_code(None), "");
/// ```
pub fn extract_code(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match value.split_once('-') {
        Some((code, _)) => code.trim().to_string(),
        None => value.trim().to_string(),
    }
}

/// Extract a code and uppercase it, for comparison against catalog sets.
pub fn extract_code_upper(value: Option<&str>) -> String {
    extract_code(value).to_uppercase()
}

/// Display category of the receiver's tax regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegimeCategory {
    /// 626, RESICO.
    Simplified,
    /// 612, business and professional activity.
    Business,
    /// Anything else, including a missing regime.
    Unrecognized,
}

impl RegimeCategory {
    pub fn from_code(code: &str) -> Self {
        match code {
            REGIME_RESICO => RegimeCategory::Simplified,
            REGIME_BUSINESS => RegimeCategory::Business,
            _ => RegimeCategory::Unrecognized,
        }
    }
}

/// Highlight applied to the usage cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsageHighlight {
    /// Exact "G02 - Devoluciones, descuentos o bonificaciones".
    Refund,
    /// Usage code S01, no tax effects.
    NoTaxEffects,
}

/// Pick the usage highlight, if any. S01 wins over the refund text.
pub fn usage_highlight(raw: Option<&str>) -> Option<UsageHighlight> {
    if extract_code_upper(raw) == USAGE_NO_TAX_EFFECTS {
        return Some(UsageHighlight::NoTaxEffects);
    }
    match raw {
        Some(text) if text.trim() == USAGE_REFUND_TEXT => Some(UsageHighlight::Refund),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_with_description() {
        assert_eq!(extract_code(Some("G01 - Honorarios")), "G01");
        assert_eq!(extract_code(Some("  03-Transferencia")), "03");
    }

    #[test]
    fn code_without_separator() {
        assert_eq!(extract_code(Some(" PUE ")), "PUE");
    }

    #[test]
    fn absent_and_blank() {
        assert_eq!(extract_code(None), "");
        assert_eq!(extract_code(Some("")), "");
        assert_eq!(extract_code(Some("   ")), "");
    }

    #[test]
    fn splits_on_first_separator_only() {
        assert_eq!(
            extract_code(Some("626 - Régimen Simplificado - RESICO")),
            "626"
        );
    }

    #[test]
    fn uppercase_variant() {
        assert_eq!(extract_code_upper(Some("g03 - gastos en general")), "G03");
    }

    #[test]
    fn regime_categories() {
        assert_eq!(RegimeCategory::from_code("626"), RegimeCategory::Simplified);
        assert_eq!(RegimeCategory::from_code("612"), RegimeCategory::Business);
        assert_eq!(RegimeCategory::from_code("601"), RegimeCategory::Unrecognized);
        assert_eq!(RegimeCategory::from_code(""), RegimeCategory::Unrecognized);
    }

    #[test]
    fn usage_highlights() {
        assert_eq!(
            usage_highlight(Some("G02 - Devoluciones, descuentos o bonificaciones")),
            Some(UsageHighlight::Refund)
        );
        assert_eq!(usage_highlight(Some("G02")), None);
        assert_eq!(
            usage_highlight(Some("S01 - Sin efectos fiscales")),
            Some(UsageHighlight::NoTaxEffects)
        );
        assert_eq!(usage_highlight(None), None);
    }
}
