//! Validate an invoice workbook and write `<name>_validado.xlsx` beside it.
//!
//! ```text
//! deducible [FILE] [--policy POLICY.json]
//! ```
//!
//! Without FILE the name is asked for on stdin. Log verbosity follows
//! `RUST_LOG` (default `info`).

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use deducible::core::{RulePolicy, RunSummary};
use deducible::xlsx::{Palette, process_file};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq)]
struct Args {
    input: Option<String>,
    policy: Option<PathBuf>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--policy" | "-p" => {
                let path = iter.next().context("--policy needs a file path")?;
                parsed.policy = Some(PathBuf::from(path));
            }
            flag if flag.starts_with('-') => bail!("unknown option '{flag}'"),
            _ if parsed.input.is_some() => bail!("only one input file is accepted"),
            _ => parsed.input = Some(arg),
        }
    }
    Ok(parsed)
}

/// Trim the name and make sure it ends in exactly one `.xlsx`.
fn normalize_file_name(name: &str) -> String {
    let name = name.trim();
    let stem = match name.len().checked_sub(5).and_then(|i| name.get(i..).map(|ext| (i, ext))) {
        Some((i, ext)) if ext.eq_ignore_ascii_case(".xlsx") => &name[..i],
        _ => name,
    };
    format!("{stem}.xlsx")
}

fn prompt_file_name() -> Result<String> {
    print!("Excel file name (without .xlsx): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("reading file name from stdin")?;
    if line.trim().is_empty() {
        bail!("no file name given");
    }
    Ok(line)
}

fn load_policy(path: &Path) -> Result<RulePolicy> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading policy file {}", path.display()))?;
    let policy: RulePolicy = serde_json::from_str(&text)
        .with_context(|| format!("parsing policy file {}", path.display()))?;
    Ok(policy.validated()?)
}

fn print_summary(output: &Path, summary: &RunSummary) {
    let rule = "=".repeat(80);
    println!("\n{rule}");
    println!("validation finished");
    println!("{rule}");
    println!("output file: {}", output.display());
    println!("rows processed: {}", summary.total_rows);
    println!("  deductible: {}", summary.deductible);
    println!("  not deductible: {}", summary.not_deductible);

    println!("\ncolors:");
    println!("  regime 626: blue");
    println!("  regime 612: purple");
    println!("  other regimes: orange");
    println!("  usage G02 refund: green");
    println!("  usage S01: red");
    println!("  deductible outflow: blue");
    println!("  deductible other: green");
    println!("  not deductible / cash over limit: red");

    println!("\ncounters:");
    println!("  IEPS moved to zero rate: {}", summary.excise_substituted);
    println!("  fuel with IEPS: {}", summary.fuel_with_excise);
    println!("  fuel without IEPS: {}", summary.fuel_without_excise);
    println!("  fuel paid in cash: {}", summary.fuel_cash);
    println!("  fuel cash under regime allowance: {}", summary.fuel_cash_allowance);
    println!("  fuel paid electronically: {}", summary.fuel_electronic);
    println!("  usage S01: {}", summary.usage_s01);
    println!("  cash over limit: {}", summary.cash_over_limit);
    println!("  stated VAT verified: {}", summary.vat_verified);
    println!("{rule}");
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    let policy = match &args.policy {
        Some(path) => load_policy(path)?,
        None => RulePolicy::default(),
    };

    let raw = match args.input {
        Some(name) => name,
        None => prompt_file_name()?,
    };
    let input = PathBuf::from(normalize_file_name(&raw));

    let processed = process_file(&input, &policy, &Palette::default())
        .with_context(|| format!("validating {}", input.display()))?;
    for column in &processed.created_columns {
        println!("created column: '{}'", column.header());
    }
    print_summary(&processed.output, &processed.summary);
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
