pub mod parse;
pub mod policy;
pub mod quote;
pub mod validate;

use pnrquote_core::error::QuoteError;
use std::io::Read;
use std::path::Path;

/// Read the quote text from a file, or from stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String, QuoteError> {
    let text = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };

    if text.trim().is_empty() {
        return Err(QuoteError::EmptyInput);
    }
    Ok(text)
}
