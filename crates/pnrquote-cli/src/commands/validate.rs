use chrono::{Local, NaiveDate};
use pnrquote_core::error::QuoteError;
use pnrquote_core::itinerary::{
    decode_segments, AirportDirectory, DecodedFlight, OptionValidation, StaticDirectory,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::read_input;
use crate::output;

/// Decoded flights of one option.
#[derive(Debug, Serialize)]
pub struct OptionFlights {
    pub label: String,
    pub flights: Vec<DecodedFlight>,
}

/// Everything `validate` reports, printed as one JSON document.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub validation: Vec<OptionValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flights: Option<Vec<OptionFlights>>,
}

impl ValidationReport {
    pub fn invalid_count(&self) -> usize {
        self.validation.iter().filter(|r| !r.result.is_valid).count()
    }
}

pub fn build_report(
    text: &str,
    reference: NaiveDate,
    directory: &dyn AirportDirectory,
    flights: bool,
) -> Result<ValidationReport, QuoteError> {
    let validation = pnrquote_core::validate_document(text, reference, directory)?;

    let flights = flights.then(|| {
        pnrquote_core::parse_email_to_options(text)
            .options
            .into_iter()
            .map(|option| OptionFlights {
                flights: decode_segments(&option.segments, reference, directory),
                label: option.label,
            })
            .collect()
    });

    Ok(ValidationReport {
        validation,
        flights,
    })
}

pub fn run(
    input: &Path,
    today: Option<NaiveDate>,
    directory_file: Option<PathBuf>,
    flights: bool,
    output_format: &str,
) -> Result<(), QuoteError> {
    let text = read_input(input)?;
    let reference = today.unwrap_or_else(|| Local::now().date_naive());

    let directory = match directory_file {
        Some(path) => StaticDirectory::builtin().merged_with(StaticDirectory::load(&path)?),
        None => StaticDirectory::builtin(),
    };
    debug!(
        backend = directory.backend_name(),
        airports = directory.airport_count(),
        %reference, "validating itinerary"
    );

    let report = build_report(&text, reference, &directory, flights)?;

    match output_format {
        "json" => output::json::print(&report)?,
        _ => {
            output::table::print_validation(&report.validation);
            for option in report.flights.iter().flatten() {
                output::table::print_flights(&option.label, &option.flights);
            }
        }
    }

    match report.invalid_count() {
        0 => Ok(()),
        n => Err(QuoteError::InvalidItinerary(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OPTIONS: &str = "AZ  679   25NOV GRUFCO HS2  2040  #1200
Tarifa USD 6500,00 + taxas USD 2539,30 *Exe
==
AA 950 12FEB GRUJFK SS2 2235 0615 11FEB
Tarifa USD 2996,00 + taxas USD 272,00 *Eco
";

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
    }

    #[test]
    fn test_report_with_flights_is_one_json_document() {
        let report = build_report(TWO_OPTIONS, reference(), &StaticDirectory::builtin(), true).unwrap();
        let json = serde_json::to_string_pretty(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["validation"].as_array().unwrap().len(), 2);
        let flights = value["flights"].as_array().unwrap();
        assert_eq!(flights.len(), 2);
        assert_eq!(flights[0]["label"], "Opção 1");
        assert_eq!(flights[1]["label"], "Opção 2");
        assert_eq!(flights[0]["flights"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_report_without_flights_omits_the_key() {
        let report = build_report(TWO_OPTIONS, reference(), &StaticDirectory::builtin(), false).unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("flights").is_none());
        assert_eq!(report.invalid_count(), 1);
    }
}
