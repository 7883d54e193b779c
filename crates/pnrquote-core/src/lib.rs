pub mod error;
pub mod itinerary;
pub mod model;
pub mod parsing;
pub mod policy;
pub mod pricing;
pub mod trace;

pub use parsing::{parse_email_to_options, parse_pnr, trace_document};

use chrono::NaiveDate;
use error::QuoteError;
use itinerary::{validate_segments, AirportDirectory, OptionValidation};
use policy::schema::PricingPolicy;
use pricing::{price_option, QuotePricing};
use rust_decimal::Decimal;

/// Main API entry point: parse a quote document and price every option.
///
/// `rav_override` replaces both the declared commission and the policy
/// default for every option.
pub fn quote_document(
    text: &str,
    policy: &PricingPolicy,
    rav_override: Option<Decimal>,
) -> Result<QuotePricing, QuoteError> {
    if text.trim().is_empty() {
        return Err(QuoteError::EmptyInput);
    }

    let email = parse_email_to_options(text);
    let options = email
        .options
        .iter()
        .filter(|o| !o.fares.is_empty())
        .map(|o| price_option(o, policy, rav_override))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuotePricing {
        is_multi: parsing::blocks::is_multi(text),
        options,
    })
}

/// Parse a quote document and validate the itinerary of each option.
///
/// `reference` anchors year inference for `DDMON` dates (usually today).
pub fn validate_document(
    text: &str,
    reference: NaiveDate,
    directory: &dyn AirportDirectory,
) -> Result<Vec<OptionValidation>, QuoteError> {
    if text.trim().is_empty() {
        return Err(QuoteError::EmptyInput);
    }

    Ok(parse_email_to_options(text)
        .options
        .iter()
        .map(|o| OptionValidation {
            label: o.label.clone(),
            result: validate_segments(&o.segments, reference, directory),
        })
        .collect())
}
