use crate::model::{FareCategory, PaxType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inputs to [`crate::pricing::compute_totals`]. Every amount defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingParams {
    /// Base fare.
    pub tarifa: Decimal,
    /// Base taxes as quoted by the airline.
    pub taxas_base: Decimal,
    /// RAV (agency commission) percent of the base fare.
    pub rav_percent: Decimal,
    /// Fixed fee added to the commission.
    pub fee: Decimal,
    /// Supplier incentive percent of the base fare.
    pub incentivo_percent: Decimal,
    /// Display only; never enters the arithmetic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_penalty: Option<String>,
}

/// Derived amounts. Unrounded; see [`crate::pricing::format`] for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub rav: Decimal,
    pub incentivo: Decimal,
    /// `rav + fee + incentivo`.
    pub comissao: Decimal,
    /// `taxas_base + comissao`, the taxes line the customer sees.
    pub taxas_exibidas: Decimal,
    /// `tarifa + taxas_exibidas`.
    pub total: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_penalty: Option<String>,
}

/// Where the RAV percent used for an option came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RavSource {
    /// Supplied by the caller for this run.
    Override,
    /// Declared in the quote text (`comissão N%`).
    Quote,
    /// Taken from the pricing policy.
    Policy,
}

/// Pricing of one fare line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarePricing {
    pub category: FareCategory,
    pub pax_type: PaxType,
    pub params: PricingParams,
    pub result: PricingResult,
}

/// Pricing of a whole quote option: each fare plus the sum over all fares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPricing {
    pub label: String,
    pub currency: String,
    pub rav_percent: Decimal,
    pub rav_source: RavSource,
    pub fee: Decimal,
    pub incentivo_percent: Decimal,
    pub policy_name: String,
    pub fares: Vec<FarePricing>,
    /// All fares summed with the fee applied once.
    pub aggregate: PricingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_parcelas: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_terms: Option<String>,
}

/// Pricing of every option of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotePricing {
    pub is_multi: bool,
    pub options: Vec<OptionPricing>,
}
