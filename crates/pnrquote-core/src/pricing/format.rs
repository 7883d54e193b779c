use rust_decimal::{Decimal, RoundingStrategy};

/// Round to cents, half away from zero.
pub fn round_money(value: Decimal) -> Decimal {
    let mut v = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    v.rescale(2);
    v
}

/// Brazilian grouping: `1234.5` -> `1.234,50`.
pub fn format_money(value: Decimal) -> String {
    let rounded = round_money(value);
    let plain = rounded.abs().to_string();
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped},{frac_part}")
}

/// Money with the currency symbol used on quotes: `US$ 9.689,30`.
pub fn format_currency(currency: &str, value: Decimal) -> String {
    let symbol = match currency {
        "USD" => "US$",
        "BRL" => "R$",
        "EUR" => "€",
        "GBP" => "£",
        other => other,
    };
    format!("{} {}", symbol, format_money(value))
}

/// Two decimals and a percent sign: `10.00%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{}%", round_money(value))
}
