use super::decode::{decode_segment, DecodedFlight};
use super::directory::{is_iata_airport_code, AirportDirectory, AirportLookup};
use crate::model::FlightSegment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accumulated validation findings. Never produced by a panic or an `Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Validation of one quote option's itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValidation {
    pub label: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

impl ValidationResult {
    fn from_findings(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

fn check_airport(role: &str, airport: &AirportLookup, errors: &mut Vec<String>) {
    if airport.iata_code.is_empty() {
        errors.push(format!("{role} airport code is required"));
    } else if !is_iata_airport_code(&airport.iata_code) {
        errors.push(format!("{role} airport code '{}' is not a valid IATA code", airport.iata_code));
    } else if !airport.found {
        errors.push(format!("{role} airport {} not found", airport.iata_code));
    }
}

/// Check one decoded flight.
pub fn validate_flight(flight: &DecodedFlight) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if flight.company.iata_code.trim().is_empty() {
        errors.push("carrier code is required".to_string());
    } else if flight.company.description == flight.company.iata_code {
        warnings.push(format!("carrier {} has no known name", flight.company.iata_code));
    }

    if flight.flight.trim().is_empty() {
        errors.push("flight number is required".to_string());
    }

    check_airport("departure", &flight.departure_airport, &mut errors);
    check_airport("landing", &flight.landing_airport, &mut errors);

    if !flight.departure_airport.iata_code.is_empty()
        && flight.departure_airport.iata_code == flight.landing_airport.iata_code
    {
        errors.push("departure and landing airports must differ".to_string());
    }

    if flight.landing_date < flight.departure_date {
        errors.push(format!(
            "landing date {} is before departure date {}",
            flight.landing_date, flight.departure_date
        ));
    } else if flight.landing_date == flight.departure_date {
        if flight.landing_time <= flight.departure_time {
            errors.push(format!(
                "landing time {} must be after departure time {} on the same day",
                flight.landing_time.format("%H:%M"),
                flight.departure_time.format("%H:%M")
            ));
        }
    } else {
        let days = (flight.landing_date - flight.departure_date).num_days();
        if days > 1 {
            warnings.push(format!("lands {days} days after departure"));
        }
    }

    ValidationResult::from_findings(errors, warnings)
}

/// Check a whole itinerary. Per-flight findings are prefixed `Flight N:`.
pub fn validate_quote(flights: &[DecodedFlight]) -> ValidationResult {
    if flights.is_empty() {
        return ValidationResult::from_findings(
            vec!["at least one flight is required".to_string()],
            Vec::new(),
        );
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (index, flight) in flights.iter().enumerate() {
        let result = validate_flight(flight);
        if !result.is_valid {
            errors.push(format!("Flight {}: {}", index + 1, result.errors.join(", ")));
        }
        warnings.extend(
            result
                .warnings
                .iter()
                .map(|w| format!("Flight {}: {}", index + 1, w)),
        );
    }

    ValidationResult::from_findings(errors, warnings)
}

/// Decode and validate raw segments. A segment that cannot be decoded is an
/// error for that flight instead of being skipped.
pub fn validate_segments(
    segments: &[FlightSegment],
    reference: NaiveDate,
    directory: &dyn AirportDirectory,
) -> ValidationResult {
    if segments.is_empty() {
        return validate_quote(&[]);
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (index, segment) in segments.iter().enumerate() {
        match decode_segment(segment, reference, directory) {
            Ok(flight) => {
                let result = validate_flight(&flight);
                if !result.is_valid {
                    errors.push(format!("Flight {}: {}", index + 1, result.errors.join(", ")));
                }
                warnings.extend(result.warnings.iter().map(|w| format!("Flight {}: {}", index + 1, w)));
            }
            Err(e) => errors.push(format!("Flight {}: {}", index + 1, e)),
        }
    }

    ValidationResult::from_findings(errors, warnings)
}
