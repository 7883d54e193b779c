use super::normalize::normalize_pax_type;
use super::values::parse_amount;
use crate::model::PaxType;
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::LazyLock;

/// Currency codes recognized anywhere in a block.
pub const CURRENCIES: &str = "USD|EUR|BRL|GBP|CAD|AUD|CHF";

/// `[tarifa] CUR fare + txs|taxas [CUR] taxes [tail]`
static FARE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*(?:tarifa\s*:?\s*)?(?P<cur>{CURRENCIES})\s*(?P<fare>\d[\d.,]*)\s*\+\s*(?:txs|taxas|taxes|tax)\s*(?:(?:{CURRENCIES})\s*)?(?P<tax>\d[\d.,]*)(?P<tail>.*)$"
    ))
    .expect("fare pattern is valid")
});

/// `*Class[/PAX][rest]` after the tax amount.
static CLASS_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*\*\s*(?P<class>[^\s/*]+)(?:\s*/\s*(?P<pax>ADT|CHD|INF)\b)?(?P<rest>.*)$")
        .expect("class suffix pattern is valid")
});

static FARE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*fare\s*:\s*(?:(?:{CURRENCIES})\s*)?(?:(?P<class>[A-Za-z]+)\s+)?(?:(?:{CURRENCIES})\s*)?(?P<amount>\d[\d.,]*)"
    ))
    .expect("fare label pattern is valid")
});

static TAXES_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*(?:taxes|taxas|txs)\s*:\s*(?:(?:{CURRENCIES})\s*)?(?P<amount>\d[\d.,]*)"
    ))
    .expect("taxes label pattern is valid")
});

/// A fare declaration read from one line, before class normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct FareMatch {
    pub currency: String,
    pub tarifa: Decimal,
    pub taxas: Decimal,
    /// Raw class token after `*`, if any.
    pub class_token: Option<String>,
    pub pax_type: PaxType,
    pub notes: Option<String>,
    /// Text after the tax amount that is not a class suffix (`+ Fee USD 50,00`).
    pub trailing: Option<String>,
}

/// Read a single-line fare declaration.
///
/// Accepted forms:
/// - `USD6500.00 + txs USD2539.30 * Exe`
/// - `tarifa usd 6500,00 + txs usd 2539,30 *Exe/ADT`
/// - `Tarifa USD 6500,00 + taxas USD 2539,30`
pub fn match_fare_line(line: &str) -> Option<FareMatch> {
    let caps = FARE_LINE.captures(line)?;
    let tarifa = parse_amount(&caps["fare"])?;
    let taxas = parse_amount(&caps["tax"])?;
    let tail = caps.name("tail").map(|m| m.as_str()).unwrap_or("");

    let mut fare = FareMatch {
        currency: caps["cur"].to_uppercase(),
        tarifa,
        taxas,
        class_token: None,
        pax_type: PaxType::default(),
        notes: None,
        trailing: None,
    };

    match CLASS_SUFFIX.captures(tail) {
        Some(suffix) => {
            fare.class_token = Some(suffix["class"].to_string());
            if let Some(pax) = suffix.name("pax") {
                fare.pax_type = normalize_pax_type(pax.as_str()).unwrap_or_default();
            }
            let rest = suffix["rest"].trim().trim_start_matches('/').trim();
            if !rest.is_empty() {
                fare.notes = Some(rest.to_string());
            }
        }
        None => {
            let rest = tail.trim();
            if !rest.is_empty() {
                fare.trailing = Some(rest.to_string());
            }
        }
    }

    Some(fare)
}

/// First half of the two-line form: `FARE: EXE 1234.00`.
/// Returns the optional class token and the base fare.
pub fn match_fare_label(line: &str) -> Option<(Option<String>, Decimal)> {
    let caps = FARE_LABEL.captures(line)?;
    let amount = parse_amount(&caps["amount"])?;
    Some((caps.name("class").map(|m| m.as_str().to_string()), amount))
}

/// Second half of the two-line form: `TAXES: 56.00`.
pub fn match_taxes_label(line: &str) -> Option<Decimal> {
    let caps = TAXES_LABEL.captures(line)?;
    parse_amount(&caps["amount"])
}
