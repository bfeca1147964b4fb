use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use deducible::core::*;

const CONCEPTS: [&str; 5] = [
    "Gasolina Magna",
    "Papelería",
    "Diesel",
    "Renta de oficina",
    "Servicio de consultoría",
];

const FORMS: [&str; 4] = ["01 - Efectivo", "03", "04 - Tarjeta de crédito", "28"];

fn build_row(i: usize) -> InvoiceRow {
    let subtotal = Decimal::from(100 + (i % 50) * 97);
    InvoiceRowBuilder::new()
        .usage(if i % 7 == 0 { "S01 - Sin efectos fiscales" } else { "G03 - Gastos en general" })
        .method("PUE - Pago en una sola exhibición")
        .form(FORMS[i % FORMS.len()])
        .regime(if i % 3 == 0 { "626" } else { "612" })
        .issuer("Proveedor de Prueba SA de CV")
        .concept(CONCEPTS[i % CONCEPTS.len()])
        .subtotal(subtotal)
        .vat_16((subtotal * dec!(0.16)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .total(subtotal * dec!(1.16))
        .excise(vec![Amount::Value(Decimal::from(i % 4))])
        .build()
}

fn build_rows(n: usize) -> Vec<InvoiceRow> {
    (0..n).map(build_row).collect()
}

fn caps() -> Capabilities {
    Capabilities {
        excise_columns: 1,
        effect_column: false,
    }
}

fn sheet_headers() -> Vec<String> {
    Column::ALL
        .iter()
        .map(|c| c.header().to_string())
        .chain(["IEPS Trasladado".to_string(), "Efecto".to_string()])
        .collect()
}

fn bench_evaluate_row(c: &mut Criterion) {
    let row = build_row(0);
    let policy = RulePolicy::default();
    c.bench_function("evaluate_row", |b| {
        b.iter(|| black_box(evaluate_row(black_box(&row), &caps(), &policy)));
    });
}

fn bench_evaluate_1000_rows(c: &mut Criterion) {
    let rows = build_rows(1000);
    let policy = RulePolicy::default();
    c.bench_function("evaluate_rows_1000", |b| {
        b.iter(|| black_box(evaluate_rows(black_box(&rows), &caps(), &policy)));
    });
}

fn bench_summary(c: &mut Criterion) {
    let outcomes = evaluate_rows(&build_rows(1000), &caps(), &RulePolicy::default());
    c.bench_function("run_summary_1000", |b| {
        b.iter(|| black_box(black_box(&outcomes).iter().collect::<RunSummary>()));
    });
}

fn bench_schema_and_extract(c: &mut Criterion) {
    let headers = sheet_headers();
    let cells: Vec<Cell> = vec![
        Cell::Number(dec!(1000)),
        Cell::Empty,
        Cell::Empty,
        Cell::Empty,
        Cell::Number(dec!(160)),
        Cell::Number(dec!(1160)),
        Cell::Text("G03 - Gastos en general".into()),
        Cell::Text("PUE".into()),
        Cell::Text("04".into()),
        Cell::Text("612".into()),
        Cell::Text("Gasolinera".into()),
        Cell::Text("Gasolina Premium".into()),
        Cell::Number(dec!(85.3)),
        Cell::Text("Ingreso".into()),
    ];

    c.bench_function("schema_resolve", |b| {
        b.iter(|| black_box(ColumnSchema::resolve(black_box(&headers))));
    });

    let schema = ColumnSchema::resolve(&headers);
    c.bench_function("extract_row", |b| {
        b.iter(|| black_box(schema.extract_row(black_box(&cells))));
    });
}

fn bench_fuel_match(c: &mut Criterion) {
    c.bench_function("is_fuel_default_keywords", |b| {
        b.iter(|| {
            black_box(is_fuel(
                black_box("SERVICIO DE MANTENIMIENTO PREVENTIVO A VEHÍCULO"),
                DEFAULT_FUEL_KEYWORDS,
            ))
        });
    });
}

criterion_group!(
    benches,
    bench_evaluate_row,
    bench_evaluate_1000_rows,
    bench_summary,
    bench_schema_and_extract,
    bench_fuel_match,
);
criterion_main!(benches);
