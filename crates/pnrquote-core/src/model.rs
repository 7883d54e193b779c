use crate::trace::ParseWarning;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One flight segment line of a PNR, e.g. `AZ 679 25NOV GRUFCO HS2 2040 #1200`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightSegment {
    pub carrier: String,
    pub flight_number: String,
    /// Declared departure date as written (`DDMON`); the year is resolved later.
    pub date: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub departure_time: String,
    pub arrival_time: String,
    /// `#` before the arrival time: the flight lands the next day.
    pub arrival_next_day: bool,
    /// Explicit arrival date (`DDMON`) written after the arrival time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<String>,
}

impl FlightSegment {
    /// Passenger count embedded in the booking status (`HS2` -> 2).
    pub fn passengers(&self) -> Option<u32> {
        let status = self.status.as_deref()?;
        let digits: String = status.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }

    pub fn route(&self) -> String {
        format!("{}-{}", self.departure_airport, self.arrival_airport)
    }
}

/// Normalized fare class. Tokens outside the known vocabulary are kept
/// verbatim (capitalized) in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FareCategory {
    Exe,
    Eco,
    Pre,
    Other(String),
}

impl FareCategory {
    pub fn is_known(&self) -> bool {
        !matches!(self, FareCategory::Other(_))
    }
}

impl fmt::Display for FareCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FareCategory::Exe => write!(f, "Exe"),
            FareCategory::Eco => write!(f, "Eco"),
            FareCategory::Pre => write!(f, "Pre"),
            FareCategory::Other(s) => write!(f, "{s}"),
        }
    }
}

impl From<String> for FareCategory {
    fn from(s: String) -> Self {
        crate::parsing::normalize::normalize_category(&s)
    }
}

impl From<FareCategory> for String {
    fn from(c: FareCategory) -> Self {
        c.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaxType {
    #[default]
    Adt,
    Chd,
    Inf,
}

impl fmt::Display for PaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaxType::Adt => write!(f, "ADT"),
            PaxType::Chd => write!(f, "CHD"),
            PaxType::Inf => write!(f, "INF"),
        }
    }
}

/// A fare declaration (`tarifa USD x + txs USD y *Class[/PaxType]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareLine {
    pub category: FareCategory,
    #[serde(default)]
    pub pax_type: PaxType,
    /// Base fare.
    pub tarifa: Decimal,
    /// Base taxes.
    pub taxas: Decimal,
    /// Free text written after the class token (`*Exe/Internos em eco`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One quotable itinerary option (one `==`-delimited block).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteOption {
    pub label: String,
    pub segments: Vec<FlightSegment>,
    pub fares: Vec<FareLine>,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_parcelas: Option<u32>,
    /// Commission percent declared in the text (`comissão 7%`). Never defaulted here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rav_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incentivo_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_usd: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_penalty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refundable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baggage_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub net_fare: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

impl QuoteOption {
    pub fn empty(label: String) -> Self {
        Self {
            label,
            segments: Vec::new(),
            fares: Vec::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            num_parcelas: None,
            rav_percent: None,
            incentivo_percent: None,
            fee_usd: None,
            change_penalty: None,
            refundable: None,
            baggage_hint: None,
            payment_terms: None,
            net_fare: false,
            notes: None,
            warnings: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.fares.is_empty()
    }
}

pub const DEFAULT_CURRENCY: &str = "USD";

/// Result of [`crate::parse_email_to_options`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEmail {
    pub options: Vec<QuoteOption>,
}

/// Result of [`crate::parse_pnr`]: a merged single view of the document.
///
/// Segments and fares are concatenated in block order; every optional field
/// comes from the first block that declares it. The per-block structure is in
/// `quotations` when the document has more than one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinglePnr {
    pub is_multi: bool,
    pub currency: String,
    pub segments: Vec<FlightSegment>,
    pub fares: Vec<FareLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_parcelas: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rav_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incentivo_percent: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_usd: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_penalty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refundable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baggage_hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
    #[serde(default)]
    pub net_fare: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub quotations: Vec<QuoteOption>,
}

impl SinglePnr {
    /// Merge per-block options into the single backward-compatible view.
    pub fn merge(options: Vec<QuoteOption>, is_multi: bool) -> SinglePnr {
        fn first<T: Clone>(options: &[QuoteOption], f: impl Fn(&QuoteOption) -> Option<T>) -> Option<T> {
            options.iter().find_map(f)
        }

        let currency = options
            .first()
            .map(|o| o.currency.clone())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        SinglePnr {
            is_multi,
            currency,
            segments: options.iter().flat_map(|o| o.segments.clone()).collect(),
            fares: options.iter().flat_map(|o| o.fares.clone()).collect(),
            num_parcelas: first(&options, |o| o.num_parcelas),
            rav_percent: first(&options, |o| o.rav_percent),
            incentivo_percent: first(&options, |o| o.incentivo_percent),
            fee_usd: first(&options, |o| o.fee_usd),
            change_penalty: first(&options, |o| o.change_penalty.clone()),
            refundable: first(&options, |o| o.refundable.clone()),
            baggage_hint: first(&options, |o| o.baggage_hint.clone()),
            payment_terms: first(&options, |o| o.payment_terms.clone()),
            net_fare: options.iter().any(|o| o.net_fare),
            notes: first(&options, |o| o.notes.clone()),
            quotations: if is_multi { options } else { Vec::new() },
        }
    }
}
