use pnrquote_core::error::QuoteError;
use pnrquote_core::policy::{self, builtin, schema::PricingPolicy};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tracing::info;

use super::read_input;
use crate::output;

pub fn run(
    input: &Path,
    policy_file: Option<PathBuf>,
    preset: Option<String>,
    rav: Option<Decimal>,
    output_format: &str,
) -> Result<(), QuoteError> {
    let text = read_input(input)?;
    let policy = resolve_policy(policy_file, preset)?;
    info!(policy = %policy.name, "pricing with policy");

    let quote = pnrquote_core::quote_document(&text, &policy, rav)?;

    if quote.options.is_empty() {
        eprintln!("No fare lines found; nothing to price.");
    }

    match output_format {
        "json" => output::json::print(&quote)?,
        _ => output::table::print_quote(&quote),
    }

    Ok(())
}

fn resolve_policy(
    policy_file: Option<PathBuf>,
    preset: Option<String>,
) -> Result<PricingPolicy, QuoteError> {
    match (policy_file, preset) {
        (Some(path), _) => policy::load_policy(&path),
        (None, Some(name)) => builtin::load_preset(&name),
        (None, None) => builtin::default_policy(),
    }
}
