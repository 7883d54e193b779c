//! Named single-line rules for the commercial terms of a quote block.
//!
//! Every rule looks at one line (or the whole block, for currency) and never
//! depends on another rule having matched. Amounts go through
//! [`parse_amount`] so every rule reads `6.500,00` and `6500.00` alike.

use super::fare::CURRENCIES;
use super::values::{format_code_amount, parse_amount};
use crate::model::FareCategory;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CURRENCY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)(?:^|[^A-Za-z])({CURRENCIES})(?:[^A-Za-z]|$)"))
        .expect("currency pattern is valid")
});

static INSTALLMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:pagto|parcelas?)\s*(\d{1,2})\s*x\b").expect("installments pattern is valid")
});

static INCENTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bin\s*(\d+(?:[.,]\d+)?)\s*%").expect("incentive pattern is valid")
});

static FEE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)(?:\+\s*)?\bfee\s*:?\s*(?:(?:{CURRENCIES})\s*)?(\d[\d.,]*)"
    ))
    .expect("fee pattern is valid")
});

static COMMISSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcomiss[ãa]o\s*:?\s*(\d+(?:[.,]\d+)?)\s*%").expect("commission pattern is valid")
});

static PENALTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*multa\b(?:\s+de\s+altera[çc][ãa]o)?\s*:?\s*(?P<rest>.*)$")
        .expect("penalty pattern is valid")
});

static REFUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?P<neg>n[ãa]o\s+)?reembols\w*\s*:?\s*(?P<rest>.*)$")
        .expect("refund pattern is valid")
});

static AMOUNT_ONLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?i)^(?:(?P<cur>{CURRENCIES})\s*)?(?P<amount>\d[\d.,]*)\s*(?P<cur_after>{CURRENCIES})?\s*[.;]?$"
    ))
    .expect("amount pattern is valid")
});

static BAGGAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d+\s*(?:pcs?|pe[çc]as?)\s*(?:de\s+)?\d+\s*kgs?\b(?:\s*/\s*[\w-]+)?")
        .expect("baggage pattern is valid")
});

static ALLOWANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*(?:pcs?|pe[çc]as?)\s*(?:de\s+)?(\d+)\s*kgs?(?:\s*/\s*([A-Za-z]+))?")
        .expect("allowance pattern is valid")
});

static PAYMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*pagto\b").expect("payment pattern is valid"));

static NET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bnet\s*[/ -]?\s*net\b").expect("net pattern is valid"));

static PAYMENT_NOISE: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)\s*-\s*net\s*net\b").expect("payment noise pattern is valid"),
        Regex::new(r"(?i)\s*-\s*comiss[ãa]o\s*\d+(?:[.,]\d+)?\s*%?").expect("payment noise pattern is valid"),
        Regex::new(r"(?i)\s*net\s*net\b").expect("payment noise pattern is valid"),
    ]
});

static DIGITS_X: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*x\b").expect("installment count pattern is valid"));

/// First currency code in the text, upper-cased.
pub fn find_currency(text: &str) -> Option<String> {
    CURRENCY.captures(text).map(|c| c[1].to_uppercase())
}

/// `pagto 6x`, `parcela 4x`, `parcelas 10x`.
pub fn find_installments(line: &str) -> Option<u32> {
    INSTALLMENTS.captures(line).and_then(|c| c[1].parse().ok())
}

/// `in 3%`. The flag is true when the match is the whole line.
pub fn find_incentive(line: &str) -> Option<(Decimal, bool)> {
    let caps = INCENTIVE.captures(line)?;
    let value = parse_amount(&caps[1])?;
    let whole = caps.get(0).map(|m| covers_line(line, m.as_str())).unwrap_or(false);
    Some((value, whole))
}

/// `Fee usd 50.00`, `+ Fee USD 50,00`.
pub fn find_fee(line: &str) -> Option<Decimal> {
    FEE.captures(line).and_then(|c| parse_amount(&c[1]))
}

/// `comissão 7%` inside any line.
pub fn find_commission(line: &str) -> Option<Decimal> {
    COMMISSION.captures(line).and_then(|c| parse_amount(&c[1]))
}

/// `Multa [de alteração] ...`. An amount-only remainder is rendered as
/// `CUR n.nn`; any other remainder is kept as written.
pub fn match_change_penalty(line: &str, block_currency: &str) -> Option<String> {
    let caps = PENALTY.captures(line)?;
    let rest = caps["rest"].trim();
    if rest.is_empty() {
        return Some(line.trim().to_string());
    }
    Some(amount_text(rest, block_currency).unwrap_or_else(|| rest.to_string()))
}

/// `Reembolso usd 400.00` or `Não reembolsável`. Lines that are not a bare
/// amount are kept whole so the negation survives.
pub fn match_refund(line: &str, block_currency: &str) -> Option<String> {
    let caps = REFUND.captures(line)?;
    if caps.name("neg").is_none() {
        if let Some(text) = amount_text(caps["rest"].trim(), block_currency) {
            return Some(text);
        }
    }
    Some(line.trim().to_string())
}

fn amount_text(rest: &str, block_currency: &str) -> Option<String> {
    let caps = AMOUNT_ONLY.captures(rest)?;
    let amount = parse_amount(&caps["amount"])?;
    let currency = caps
        .name("cur")
        .or_else(|| caps.name("cur_after"))
        .map(|m| m.as_str().to_uppercase())
        .unwrap_or_else(|| block_currency.to_string());
    Some(format_code_amount(&currency, amount))
}

/// Baggage hint as written: `2pc 32kg`, `2 peça de 32kgs`, `2pc 32kg/exe-pri`.
pub fn find_baggage(line: &str) -> Option<String> {
    BAGGAGE.find(line).map(|m| m.as_str().trim().to_string())
}

pub fn is_payment_line(line: &str) -> bool {
    PAYMENT.is_match(line)
}

/// `net net`, `Net/Net`, `net-net`.
pub fn has_net_marker(line: &str) -> bool {
    NET.is_match(line)
}

/// Customer-facing payment text. Internal markers (`net net`,
/// `comissão N%`) are removed first.
pub fn sanitize_payment_terms(line: &str, installments: Option<u32>) -> String {
    let clean = PAYMENT_NOISE
        .iter()
        .fold(line.to_string(), |acc, re| re.replace_all(&acc, "").into_owned());
    let clean = clean.trim();

    let count = DIGITS_X
        .captures(clean)
        .and_then(|c| c[1].parse::<u32>().ok())
        .or(installments.filter(|n| *n > 1));

    match count {
        Some(n) => format!("Em até {n}x no cartão de crédito. Taxas à vista."),
        None if clean.is_empty() => "À vista".to_string(),
        None => clean.to_string(),
    }
}

/// True when `matched` is everything on the line apart from surrounding
/// whitespace and a trailing `.` or `;`.
pub fn covers_line(line: &str, matched: &str) -> bool {
    line.trim().trim_end_matches(['.', ';']).trim() == matched.trim()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaggageAllowance {
    pub pieces: u32,
    pub piece_kg: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fare_class: Option<String>,
}

/// Decompose a baggage hint (`2pc 32kg/exe, 1pc 23kg`) into allowances.
/// Entries that do not read as `N pc N kg` are skipped.
pub fn parse_allowances(hint: &str) -> Vec<BaggageAllowance> {
    hint.split([',', ';'])
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .filter_map(|entry| {
            let caps = ALLOWANCE.captures(entry)?;
            Some(BaggageAllowance {
                pieces: caps[1].parse().ok()?,
                piece_kg: caps[2].parse().ok()?,
                fare_class: caps.get(3).map(|m| m.as_str().to_uppercase()),
            })
        })
        .collect()
}

/// Standard allowance for a cabin when the quote does not state one.
pub fn default_allowance_for(category: &FareCategory) -> BaggageAllowance {
    let (pieces, piece_kg) = match category {
        FareCategory::Exe => (2, 32),
        FareCategory::Pre => (2, 23),
        FareCategory::Eco | FareCategory::Other(_) => (1, 23),
    };
    BaggageAllowance {
        pieces,
        piece_kg,
        fare_class: None,
    }
}
