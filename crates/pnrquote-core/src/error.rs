use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("no PNR text to parse (input is empty or whitespace)")]
    EmptyInput,

    #[error("failed to load pricing policy from {path}: {reason}")]
    PolicyLoad { path: PathBuf, reason: String },

    #[error("invalid pricing policy: {0}")]
    PolicyInvalid(String),

    #[error("invalid pricing parameters: {}", .0.join("; "))]
    InvalidPricing(Vec<String>),

    #[error("cannot decode segment '{segment}': {reason}")]
    InvalidSegment { segment: String, reason: String },

    #[error("{0} option(s) failed itinerary validation")]
    InvalidItinerary(usize),

    #[error("failed to load airport directory: {0}")]
    DirectoryLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
