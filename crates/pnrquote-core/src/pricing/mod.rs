pub mod engine;
pub mod format;
pub mod outcome;

pub use engine::{checked_totals, compute_totals, price_option, validate_params};
pub use outcome::{FarePricing, OptionPricing, PricingParams, PricingResult, QuotePricing, RavSource};
