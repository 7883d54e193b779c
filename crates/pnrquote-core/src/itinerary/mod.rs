pub mod decode;
pub mod directory;
pub mod validate;

pub use decode::{decode_segment, decode_segments, CarrierInfo, DecodedFlight};
pub use directory::{AirportDirectory, AirportLookup, StaticDirectory};
pub use validate::{
    validate_flight, validate_quote, validate_segments, OptionValidation, ValidationResult,
};
