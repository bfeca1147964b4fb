//! Edge cases around messy spreadsheet input.

#![cfg(feature = "core")]

use deducible::core::*;
use rust_decimal_macros::dec;

fn headers_with(extra: &[&str]) -> Vec<String> {
    Column::ALL
        .iter()
        .map(|c| c.header().to_string())
        .chain(extra.iter().map(|s| s.to_string()))
        .collect()
}

fn text(s: &str) -> Cell {
    Cell::Text(s.into())
}

fn num(d: rust_decimal::Decimal) -> Cell {
    Cell::Number(d)
}

/// A full row in header order, followed by `extra` cells.
fn cells(concept: &str, form: &str, extra: Vec<Cell>) -> Vec<Cell> {
    let mut row = vec![
        num(dec!(1000)),
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        num(dec!(160)),
        num(dec!(1160)),
        text("G03 - Gastos en general"),
        text("PUE"),
        text(form),
        text("612"),
        text("Gasolinera Los Pinos"),
        text(concept),
    ];
    row.extend(extra);
    row
}

// --- Column resolution ---

#[test]
fn headers_match_ignoring_case_and_spaces() {
    let mut headers = headers_with(&[]);
    headers[0] = "  subtotal ".into();
    headers[8] = "FORMA PAGO".into();
    let schema = ColumnSchema::resolve(&headers);
    assert!(schema.missing().is_empty());
    assert_eq!(schema.index(Column::Subtotal), 0);
    assert_eq!(schema.index(Column::PaymentForm), 8);
}

#[test]
fn missing_columns_are_appended_in_order() {
    let headers: Vec<&str> = vec!["Total", "Conceptos", "Uso CFDI"];
    let schema = ColumnSchema::resolve(&headers);
    assert_eq!(schema.missing().len(), 9);
    assert_eq!(schema.missing()[0], Column::Subtotal);
    assert_eq!(schema.index(Column::Subtotal), 3);
    assert_eq!(schema.index(Column::Discount), 4);
    assert_eq!(schema.width(), 12);
    assert!(schema.is_missing(Column::Vat16));
    assert!(!schema.is_missing(Column::Total));

    // Appended columns read as blanks.
    let row = schema.extract_row(&[num(dec!(50)), text("Papelería"), text("G03")]);
    assert_eq!(row.total, Amount::Value(dec!(50)));
    assert_eq!(row.subtotal, Amount::Blank);
    assert_eq!(row.payment_form, None);
}

#[test]
fn ieps_columns_are_discovered_by_marker() {
    let headers = headers_with(&["IEPS Trasladado", "Notas", "ieps retenido", "Efecto"]);
    let schema = ColumnSchema::resolve(&headers);
    let found: Vec<usize> = schema.excise_columns().iter().map(|c| c.index).collect();
    assert_eq!(found, vec![12, 14]);
    assert_eq!(schema.effect_index(), Some(15));
    assert_eq!(
        schema.capabilities(),
        Capabilities {
            excise_columns: 2,
            effect_column: true,
        }
    );
}

#[test]
fn short_rows_are_padded() {
    let schema = ColumnSchema::resolve(&headers_with(&["IEPS"]));
    let row = schema.extract_row(&[num(dec!(10))]);
    assert_eq!(row.subtotal, Amount::Value(dec!(10)));
    assert_eq!(row.concept, "");
    assert_eq!(row.excise, vec![Amount::Blank]);
}

// --- Amount parsing ---

#[test]
fn text_amounts() {
    assert_eq!(Amount::from(&text(" 12.50 ")), Amount::Value(dec!(12.50)));
    assert_eq!(Amount::from(&text("   ")), Amount::Blank);
    assert_eq!(Amount::from(&text("N/A")), Amount::Invalid("N/A".into()));
    assert_eq!(Amount::Invalid("N/A".into()).or_zero(), dec!(0));
}

#[test]
fn invalid_subtotal_makes_vat_unverified_but_keeps_verdict() {
    let schema = ColumnSchema::resolve(&headers_with(&[]));
    let mut row_cells = cells("Papelería", "03", vec![]);
    row_cells[0] = text("mil pesos");
    let row = schema.extract_row(&row_cells);
    let outcome = evaluate_row(&row, &schema.capabilities(), &RulePolicy::default());
    assert_eq!(outcome.bases.matches_stated_vat_16, None);
    assert!(!outcome.tags.vat_verified);
    assert!(outcome.verdict.is_deductible);
    assert_eq!(outcome.bases.base_after_discount, dec!(0));
}

#[test]
fn invalid_total_counts_as_zero_for_cash_limit() {
    let schema = ColumnSchema::resolve(&headers_with(&[]));
    let mut row_cells = cells("Papelería", "01", vec![]);
    row_cells[5] = text("#REF!");
    let row = schema.extract_row(&row_cells);
    let outcome = evaluate_row(&row, &schema.capabilities(), &RulePolicy::default());
    assert!(outcome.verdict.is_deductible);
}

#[test]
fn huge_amounts_still_get_a_verdict() {
    let schema = ColumnSchema::resolve(&headers_with(&[]));
    let mut row_cells = cells("Papelería", "03", vec![]);
    row_cells[0] = text("50000000000000000000000000000");
    row_cells[4] = text("50000000000000000000000000000");
    let row = schema.extract_row(&row_cells);
    assert_eq!(row.subtotal, Amount::Value(dec!(50000000000000000000000000000)));

    let outcome = evaluate_row(&row, &schema.capabilities(), &RulePolicy::default());
    assert_eq!(outcome.bases.matches_stated_vat_16, None);
    assert_eq!(outcome.bases.recomputed_total, dec!(0));
    assert!(!outcome.tags.vat_verified);
    assert!(outcome.verdict.is_deductible);

    let summary: RunSummary = std::iter::once(&outcome).collect();
    assert_eq!(summary.total_rows, 1);
    assert_eq!(summary.vat_verified, 0);
}

#[test]
fn half_cent_vat_rounds_up() {
    let schema = ColumnSchema::resolve(&headers_with(&[]));
    let mut row_cells = cells("Papelería", "03", vec![]);
    row_cells[0] = text("1.03125");
    row_cells[4] = num(dec!(0.17));
    let row = schema.extract_row(&row_cells);
    let outcome = evaluate_row(&row, &schema.capabilities(), &RulePolicy::default());
    assert_eq!(outcome.bases.expected_vat_16, dec!(0.17));
    assert!(outcome.tags.vat_verified);
}

// --- IEPS resolution ---

#[test]
fn first_populated_ieps_column_wins() {
    let headers = headers_with(&["IEPS 8%", "IEPS Cuota", "IEPS Otro"]);
    let schema = ColumnSchema::resolve(&headers);
    let row = schema.extract_row(&cells(
        "Magna",
        "04",
        vec![num(dec!(0)), num(dec!(42.10)), num(dec!(7))],
    ));
    let outcome = evaluate_row(&row, &schema.capabilities(), &RulePolicy::default());
    assert_eq!(outcome.excise.substituted_from, Some(1));
    assert_eq!(outcome.bases.zero_rate, dec!(42.10));
}

#[test]
fn zero_ieps_leaves_fuel_without_excise() {
    let schema = ColumnSchema::resolve(&headers_with(&["IEPS"]));
    let row = schema.extract_row(&cells("Diesel", "04", vec![num(dec!(0))]));
    let outcome = evaluate_row(&row, &schema.capabilities(), &RulePolicy::default());
    assert_eq!(outcome.tags.fuel, Some(FuelExcise::WithoutExcise));
    assert!(!outcome.tags.excise_substituted);
    assert!(outcome.tags.vat_verified);
}

#[test]
fn fuel_in_sheet_without_ieps_columns() {
    let schema = ColumnSchema::resolve(&headers_with(&[]));
    let row = schema.extract_row(&cells("Gasolina", "04", vec![]));
    let outcome = evaluate_row(&row, &schema.capabilities(), &RulePolicy::default());
    assert_eq!(outcome.tags.fuel, Some(FuelExcise::WithoutExcise));
    assert_eq!(outcome.excise.substituted_from, None);
}

#[test]
fn text_ieps_is_substituted_and_unverifiable() {
    let schema = ColumnSchema::resolve(&headers_with(&["IEPS"]));
    let row = schema.extract_row(&cells("Gasolina", "04", vec![text("ver anexo")]));
    let outcome = evaluate_row(&row, &schema.capabilities(), &RulePolicy::default());
    assert_eq!(outcome.excise.substituted_from, Some(0));
    assert_eq!(outcome.excise.zero_rate, Amount::Invalid("ver anexo".into()));
    assert_eq!(outcome.bases.matches_stated_vat_16, None);
    assert_eq!(outcome.bases.zero_rate, dec!(0));
}

// --- Fuel vocabulary ---

#[test]
fn fuel_matching_quirks() {
    let keywords = DEFAULT_FUEL_KEYWORDS;
    assert!(is_fuel("DIÉSEL AUTOMOTRIZ", keywords));
    assert!(is_fuel("Turbosina", keywords));
    // Short terms over-match.
    assert!(is_fuel("Gas doméstico", keywords));
    assert!(is_fuel("Gastos de representación", keywords));
    assert!(!is_fuel("", keywords));
    assert!(!is_fuel("Papelería", keywords));
}

#[test]
fn narrowed_vocabulary_excludes_gas() {
    let policy = RulePolicyBuilder::new()
        .fuel_keywords(["gasolina", "diesel"])
        .build()
        .unwrap();
    let row = InvoiceRowBuilder::new().concept("Gastos varios").build();
    let outcome = evaluate_row(&row, &Capabilities::default(), &policy);
    assert!(!outcome.is_fuel);
}

// --- Codes ---

#[test]
fn code_extraction_edge_cases() {
    assert_eq!(extract_code(Some("")), "");
    assert_eq!(extract_code(Some(" - Sin código")), "");
    assert_eq!(extract_code(Some("G03-Gastos-en general")), "G03");
    assert_eq!(extract_code_upper(Some("ppd - parcialidades")), "PPD");
}

#[test]
fn numeric_cells_read_as_codes() {
    assert_eq!(num(dec!(626)).as_text().as_deref(), Some("626"));
    assert_eq!(num(dec!(3.00)).as_text().as_deref(), Some("3"));
    assert_eq!(Cell::Empty.as_text(), None);
}

#[test]
fn s01_wins_over_refund_highlight() {
    assert_eq!(
        usage_highlight(Some("S01 - Sin efectos fiscales")),
        Some(UsageHighlight::NoTaxEffects)
    );
    assert_eq!(usage_highlight(Some(USAGE_REFUND_TEXT)), Some(UsageHighlight::Refund));
    assert_eq!(usage_highlight(Some("G02")), None);
    assert_eq!(usage_highlight(None), None);
}

#[test]
fn numeric_regime_cell_is_recognized() {
    let schema = ColumnSchema::resolve(&headers_with(&[]));
    let mut row_cells = cells("Papelería", "03", vec![]);
    row_cells[9] = num(dec!(626));
    let row = schema.extract_row(&row_cells);
    let outcome = evaluate_row(&row, &schema.capabilities(), &RulePolicy::default());
    assert_eq!(outcome.tags.regime, RegimeCategory::Simplified);
}
