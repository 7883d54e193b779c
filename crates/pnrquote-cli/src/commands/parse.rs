use pnrquote_core::error::QuoteError;
use std::path::{Path, PathBuf};

use super::read_input;
use crate::output;

pub fn run(
    input: &Path,
    output_format: &str,
    output_file: Option<PathBuf>,
    simple: bool,
    trace: bool,
) -> Result<(), QuoteError> {
    let text = read_input(input)?;

    if trace {
        let bundle = pnrquote_core::trace_document(&text);
        match output_format {
            "json" => output::json::print(&bundle)?,
            _ => output::table::print_trace(&bundle, &text),
        }
        return Ok(());
    }

    let email = pnrquote_core::parse_email_to_options(&text);

    let (json, table) = if simple {
        let pnr = pnrquote_core::parse_pnr(&text).ok_or(QuoteError::EmptyInput)?;
        (serde_json::to_string_pretty(&pnr)?, output::table::format_pnr(&pnr))
    } else {
        (
            serde_json::to_string_pretty(&email)?,
            output::table::format_options(&email.options),
        )
    };

    match output_file {
        Some(path) => {
            // Always write JSON when saving to file
            std::fs::write(&path, &json)?;
            eprintln!(
                "Parsed {} option(s), written to {}",
                email.options.len(),
                path.display()
            );
            for w in email.options.iter().flat_map(|o| o.warnings.iter()) {
                eprintln!("  warning: {}", w.message);
            }
        }
        None => match output_format {
            "json" => println!("{json}"),
            _ => println!("{table}"),
        },
    }

    Ok(())
}
