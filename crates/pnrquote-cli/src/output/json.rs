use pnrquote_core::error::QuoteError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), QuoteError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
