use crate::error::QuoteError;
use crate::policy::schema::PricingPolicy;

const PADRAO_JSON: &str = include_str!("../../../../policies/padrao.json");
const NET_JSON: &str = include_str!("../../../../policies/net.json");

/// Available predefined policies.
pub const PRESETS: &[&str] = &["padrao", "net"];

/// Preset used when the caller names none.
pub const DEFAULT_PRESET: &str = "padrao";

/// Load a predefined policy by name.
pub fn load_preset(name: &str) -> Result<PricingPolicy, QuoteError> {
    let json = match name {
        "padrao" => PADRAO_JSON,
        "net" => NET_JSON,
        _ => {
            return Err(QuoteError::PolicyInvalid(format!(
                "unknown preset '{}'. Available: {}",
                name,
                PRESETS.join(", ")
            )))
        }
    };
    let policy: PricingPolicy = serde_json::from_str(json)?;
    Ok(policy)
}

/// The 10% RAV business default.
pub fn default_policy() -> Result<PricingPolicy, QuoteError> {
    load_preset(DEFAULT_PRESET)
}
