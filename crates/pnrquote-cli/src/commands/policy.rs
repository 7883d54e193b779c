use pnrquote_core::error::QuoteError;
use pnrquote_core::policy::builtin;
use pnrquote_core::pricing::format::format_percent;
use std::path::Path;

pub fn list() -> Result<(), QuoteError> {
    println!("Available predefined policies:\n");
    for name in builtin::PRESETS {
        let policy = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!(
            "  {:<8} {} (v{}){}",
            name, policy.name, policy.version, default_marker
        );
        if let Some(ref desc) = policy.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn show(name: &str) -> Result<(), QuoteError> {
    let policy = builtin::load_preset(name)?;

    println!("{} (version {})\n", policy.name, policy.version);

    if let Some(ref desc) = policy.description {
        println!("{}\n", desc);
    }

    println!("  RAV:             {}", format_percent(policy.rav_percent));
    println!("  Max RAV:         {}", format_percent(policy.max_rav_percent));
    println!("  Default fee:     {}", policy.default_fee);
    println!(
        "  Change penalty:  {}",
        policy.default_change_penalty.as_deref().unwrap_or("-")
    );
    println!();
    println!("Values declared in the quote text (comissão, fee, multa) take");
    println!("precedence over these defaults. --rav overrides both.\n");

    Ok(())
}

pub fn schema() -> Result<(), QuoteError> {
    print!(
        r#"JSON Policy Schema
==================

A policy file holds the commercial defaults used by `pnrquote quote`
when a quote option does not state its own terms.

Fields:
  name                    (string, required)  Human-readable policy name
  description             (string, optional)  What this policy is for
  version                 (string, required)  Version identifier (e.g., "2025.1")
  rav_percent             (string, required)  RAV percent of the base fare,
                                              applied when the quote declares
                                              no commission. Between 0 and
                                              max_rav_percent.
  default_fee             (string, optional)  Fixed fee added to the commission
                                              when the quote has no "fee" line.
                                              Default: "0"
  default_change_penalty  (string, optional)  Change-penalty text shown when the
                                              quote has no "multa" line.
  max_rav_percent         (string, optional)  Upper bound accepted for any RAV,
                                              declared or overridden.
                                              Default: "100"

Example:
{{
  "name": "Corporativo",
  "description": "Contracted accounts, reduced RAV",
  "version": "1.0",
  "rav_percent": "6",
  "default_fee": "35",
  "default_change_penalty": "USD 300 + diferença tarifária",
  "max_rav_percent": "12"
}}

Note: amounts and percents must be quoted strings, not bare numbers,
to preserve exact decimal precision (e.g., "7.5" not 7.5).
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), QuoteError> {
    let policy = pnrquote_core::policy::load_policy(file)?;

    println!("Policy '{}' (v{}) is valid.", policy.name, policy.version);
    println!("  RAV: {}", format_percent(policy.rav_percent));
    println!("  Default fee: {}", policy.default_fee);

    let mut warnings = Vec::new();
    if policy.default_change_penalty.is_none() {
        warnings.push("no default_change_penalty; options without a 'multa' line show none");
    }
    if policy.rav_percent.is_zero() && policy.default_fee.is_zero() {
        warnings.push("RAV and fee are both zero; totals equal the net fare plus taxes");
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
