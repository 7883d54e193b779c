use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a monetary or percentage amount as written by agents.
///
/// Handles formats like:
/// - "6500.00" / "6500,00" -> 6500.00
/// - "6.500,00" / "6,500.00" -> 6500.00
/// - "USD 50" / "usd50,00" -> 50
/// - "1.234.567" -> 1234567 (repeated separator is a thousands separator)
///
/// Returns None when no number can be read.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let digits: String = s
        .trim()
        .trim_start_matches(|c: char| c.is_alphabetic() || c.is_whitespace())
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect();
    let digits = digits.trim_end_matches(['.', ',']);

    if digits.is_empty() || !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let normalized = normalize_separators(digits);
    Decimal::from_str(&normalized).ok()
}

/// Reduce a number with `,`/`.` separators to plain `1234.56` form.
fn normalize_separators(s: &str) -> String {
    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');

    match (last_comma, last_dot) {
        // Both present: whichever comes last is the decimal separator
        (Some(c), Some(d)) => {
            let (thousands, decimal) = if c > d { ('.', ',') } else { (',', '.') };
            s.chars()
                .filter(|&ch| ch != thousands)
                .map(|ch| if ch == decimal { '.' } else { ch })
                .collect()
        }
        (Some(_), None) => single_separator(s, ','),
        (None, Some(_)) => single_separator(s, '.'),
        (None, None) => s.to_string(),
    }
}

/// A single kind of separator is decimal when it occurs once, thousands otherwise.
fn single_separator(s: &str, sep: char) -> String {
    if s.matches(sep).count() == 1 {
        s.replace(sep, ".")
    } else {
        s.replace(sep, "")
    }
}

/// Render an amount with exactly two decimals and a currency code: `USD 200.00`.
pub fn format_code_amount(currency: &str, amount: Decimal) -> String {
    let mut value = amount.round_dp(2);
    value.rescale(2);
    format!("{} {}", currency, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dot_decimal() {
        assert_eq!(parse_amount("6500.00"), Some(dec!(6500.00)));
    }

    #[test]
    fn test_comma_decimal() {
        assert_eq!(parse_amount("2539,30"), Some(dec!(2539.30)));
    }

    #[test]
    fn test_brazilian_thousands() {
        assert_eq!(parse_amount("6.500,00"), parse_amount("6500.00"));
        assert_eq!(parse_amount("6.500,00"), Some(dec!(6500)));
    }

    #[test]
    fn test_english_thousands() {
        assert_eq!(parse_amount("6,500.00"), Some(dec!(6500)));
    }

    #[test]
    fn test_repeated_separator_is_thousands() {
        assert_eq!(parse_amount("1.234.567"), Some(dec!(1234567)));
    }

    #[test]
    fn test_currency_prefix_and_trailing_dot() {
        assert_eq!(parse_amount("USD 50,00."), Some(dec!(50)));
        assert_eq!(parse_amount("usd400.00"), Some(dec!(400)));
    }

    #[test]
    fn test_not_a_number() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount(",50"), None);
    }

    #[test]
    fn test_format_code_amount() {
        assert_eq!(format_code_amount("USD", dec!(200)), "USD 200.00");
        assert_eq!(format_code_amount("EUR", dec!(400.5)), "EUR 400.50");
    }
}
