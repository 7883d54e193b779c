use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Commercial defaults applied when a quote does not state its own terms.
///
/// Decimal values are written as strings in policy files (`"rav_percent": "10"`)
/// so they load exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// RAV applied to the base fare when the quote declares no commission.
    pub rav_percent: Decimal,
    /// Fee added to the commission when the quote declares none.
    #[serde(default)]
    pub default_fee: Decimal,
    /// Change-penalty text used when the quote has none.
    #[serde(default)]
    pub default_change_penalty: Option<String>,
    /// Upper bound accepted for any RAV, declared or overridden.
    #[serde(default = "default_max_rav")]
    pub max_rav_percent: Decimal,
}

fn default_max_rav() -> Decimal {
    Decimal::ONE_HUNDRED
}
