pub mod builtin;
pub mod schema;

use crate::error::QuoteError;
use rust_decimal::Decimal;
use schema::PricingPolicy;
use std::path::Path;

/// Load a pricing policy from a JSON file.
pub fn load_policy(path: &Path) -> Result<PricingPolicy, QuoteError> {
    let content = std::fs::read_to_string(path).map_err(|e| QuoteError::PolicyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_policy(&content, path)
}

/// Parse a pricing policy from a JSON string.
pub fn parse_policy(json: &str, source: &Path) -> Result<PricingPolicy, QuoteError> {
    let policy: PricingPolicy = serde_json::from_str(json).map_err(|e| QuoteError::PolicyLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_policy(&policy)?;
    Ok(policy)
}

/// Parse a pricing policy from a JSON string (no file path context).
pub fn parse_policy_str(json: &str) -> Result<PricingPolicy, QuoteError> {
    let policy: PricingPolicy = serde_json::from_str(json).map_err(QuoteError::Json)?;
    validate_policy(&policy)?;
    Ok(policy)
}

/// Validate that a policy is usable for pricing.
pub fn validate_policy(policy: &PricingPolicy) -> Result<(), QuoteError> {
    if policy.name.trim().is_empty() {
        return Err(QuoteError::PolicyInvalid("name must not be empty".into()));
    }

    if policy.max_rav_percent < Decimal::ZERO || policy.max_rav_percent > Decimal::ONE_HUNDRED {
        return Err(QuoteError::PolicyInvalid(format!(
            "max_rav_percent {} must be between 0 and 100",
            policy.max_rav_percent
        )));
    }

    if policy.rav_percent < Decimal::ZERO || policy.rav_percent > policy.max_rav_percent {
        return Err(QuoteError::PolicyInvalid(format!(
            "rav_percent {} must be between 0 and {}",
            policy.rav_percent, policy.max_rav_percent
        )));
    }

    if policy.default_fee < Decimal::ZERO {
        return Err(QuoteError::PolicyInvalid(format!(
            "default_fee {} must not be negative",
            policy.default_fee
        )));
    }

    Ok(())
}
