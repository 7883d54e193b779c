use super::directory::{AirportDirectory, AirportLookup};
use crate::error::QuoteError;
use crate::model::FlightSegment;
use chrono::{Datelike, Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierInfo {
    pub iata_code: String,
    /// Airline name, or the code when the directory does not know it.
    pub description: String,
}

/// A segment with calendar dates, clock times and resolved airports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedFlight {
    pub company: CarrierInfo,
    pub flight: String,
    pub departure_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub landing_date: NaiveDate,
    pub landing_time: NaiveTime,
    pub departure_airport: AirportLookup,
    pub landing_airport: AirportLookup,
    /// Lands on a later calendar day than it departs.
    pub overnight: bool,
}

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// `25NOV` -> (11, 25). No range check on the day.
pub fn parse_ddmon(s: &str) -> Option<(u32, u32)> {
    let s = s.trim();
    if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
        return None;
    }
    let (day, month) = s.split_at(s.len() - 3);
    let day: u32 = day.parse().ok()?;
    let month = MONTHS.iter().position(|m| m.eq_ignore_ascii_case(month))? as u32 + 1;
    Some((month, day))
}

/// Resolve a `DDMON` date against a reference date.
///
/// The year is the reference year, or the next one when the day has already
/// passed. Returns None for impossible dates (`31FEB`, `29FEB` outside a leap
/// year).
pub fn resolve_date(ddmon: &str, reference: NaiveDate) -> Option<NaiveDate> {
    let (month, day) = parse_ddmon(ddmon)?;
    let year = if (month, day) < (reference.month(), reference.day()) {
        reference.year() + 1
    } else {
        reference.year()
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Resolve an explicit arrival `DDMON` against the departure date.
///
/// The arrival takes the departure's year, except a January arrival after a
/// December departure, which rolls into the next year. An arrival written
/// before the departure therefore stays before it.
pub fn resolve_arrival_date(ddmon: &str, departure: NaiveDate) -> Option<NaiveDate> {
    let (month, day) = parse_ddmon(ddmon)?;
    let year = if departure.month() == 12 && month == 1 {
        departure.year() + 1
    } else {
        departure.year()
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// `2040` -> 20:40. Also accepts `20:40`.
pub fn parse_clock(hhmm: &str) -> Option<NaiveTime> {
    let digits: String = hhmm.trim().chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hour = digits[..2].parse().ok()?;
    let minute = digits[2..].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn invalid(segment: &FlightSegment, reason: String) -> QuoteError {
    QuoteError::InvalidSegment {
        segment: format!("{} {} {} {}", segment.carrier, segment.flight_number, segment.date, segment.route()),
        reason,
    }
}

/// Decode one segment.
///
/// Landing date: the explicit arrival date when present, else the next day
/// when the `#` marker is set, else the departure date.
pub fn decode_segment(
    segment: &FlightSegment,
    reference: NaiveDate,
    directory: &dyn AirportDirectory,
) -> Result<DecodedFlight, QuoteError> {
    let departure_date = resolve_date(&segment.date, reference)
        .ok_or_else(|| invalid(segment, format!("invalid departure date '{}'", segment.date)))?;
    let departure_time = parse_clock(&segment.departure_time).ok_or_else(|| {
        invalid(segment, format!("invalid departure time '{}'", segment.departure_time))
    })?;
    let landing_time = parse_clock(&segment.arrival_time).ok_or_else(|| {
        invalid(segment, format!("invalid landing time '{}'", segment.arrival_time))
    })?;

    let landing_date = match &segment.arrival_date {
        Some(arrival) => resolve_arrival_date(arrival, departure_date)
            .ok_or_else(|| invalid(segment, format!("invalid landing date '{}'", arrival)))?,
        None if segment.arrival_next_day => departure_date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| invalid(segment, "landing date out of range".to_string()))?,
        None => departure_date,
    };

    let company = CarrierInfo {
        description: directory
            .airline_name(&segment.carrier)
            .unwrap_or_else(|| segment.carrier.clone()),
        iata_code: segment.carrier.clone(),
    };

    Ok(DecodedFlight {
        company,
        flight: segment.flight_number.clone(),
        departure_date,
        departure_time,
        landing_date,
        landing_time,
        departure_airport: directory.resolve_airport(&segment.departure_airport),
        landing_airport: directory.resolve_airport(&segment.arrival_airport),
        overnight: landing_date > departure_date,
    })
}

/// Decode every segment, skipping (and logging) the ones that cannot be decoded.
pub fn decode_segments(
    segments: &[FlightSegment],
    reference: NaiveDate,
    directory: &dyn AirportDirectory,
) -> Vec<DecodedFlight> {
    segments
        .iter()
        .filter_map(|s| match decode_segment(s, reference, directory) {
            Ok(flight) => Some(flight),
            Err(e) => {
                warn!(backend = directory.backend_name(), "{e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::directory::StaticDirectory;
    use crate::parsing::segment::try_parse_segment;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_ddmon() {
        assert_eq!(parse_ddmon("25NOV"), Some((11, 25)));
        assert_eq!(parse_ddmon("8JAN"), Some((1, 8)));
        assert_eq!(parse_ddmon("25XYZ"), None);
        assert_eq!(parse_ddmon("NOV"), None);
    }

    #[test]
    fn test_year_inference() {
        let reference = date(2025, 10, 1);
        assert_eq!(resolve_date("25NOV", reference), Some(date(2025, 11, 25)));
        assert_eq!(resolve_date("08JAN", reference), Some(date(2026, 1, 8)));
        assert_eq!(resolve_date("01OCT", reference), Some(date(2025, 10, 1)));
        assert_eq!(resolve_date("31FEB", reference), None);
    }

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("2040"), NaiveTime::from_hms_opt(20, 40, 0));
        assert_eq!(parse_clock("06:15"), NaiveTime::from_hms_opt(6, 15, 0));
        assert_eq!(parse_clock("2560"), None);
        assert_eq!(parse_clock("12"), None);
    }

    #[test]
    fn test_overnight_marker_adds_a_day() {
        let seg = try_parse_segment("AZ  679   25NOV GRUFCO HS2  2040  #1200").unwrap();
        let flight = decode_segment(&seg, date(2025, 10, 1), &StaticDirectory::builtin()).unwrap();
        assert_eq!(flight.departure_date, date(2025, 11, 25));
        assert_eq!(flight.landing_date, date(2025, 11, 26));
        assert!(flight.overnight);
        assert_eq!(flight.company.description, "ITA Airways");
        assert_eq!(flight.departure_airport.description, "São Paulo");
        assert_eq!(flight.landing_airport.description, "Roma");
    }

    #[test]
    fn test_explicit_arrival_date_wins() {
        let seg = try_parse_segment("1 AA 950 12FEB  GRUJFK SS2  2235  0615   13FEB").unwrap();
        let flight = decode_segment(&seg, date(2026, 1, 10), &StaticDirectory::builtin()).unwrap();
        assert_eq!(flight.landing_date, date(2026, 2, 13));
        assert!(flight.overnight);
    }

    #[test]
    fn test_arrival_across_new_year() {
        let seg = try_parse_segment("LA 8084 31DEC GRULHR HS1 2340 1405 01JAN").unwrap();
        let flight = decode_segment(&seg, date(2025, 12, 1), &StaticDirectory::builtin()).unwrap();
        assert_eq!(flight.departure_date, date(2025, 12, 31));
        assert_eq!(flight.landing_date, date(2026, 1, 1));
    }

    #[test]
    fn test_arrival_written_before_departure_stays_before() {
        let seg = try_parse_segment("AA 950 12FEB GRUJFK SS2 2235 0615 11FEB").unwrap();
        let flight = decode_segment(&seg, date(2026, 1, 10), &StaticDirectory::builtin()).unwrap();
        assert_eq!(flight.departure_date, date(2026, 2, 12));
        assert_eq!(flight.landing_date, date(2026, 2, 11));
        assert!(!flight.overnight);
    }

    #[test]
    fn test_resolve_arrival_date() {
        assert_eq!(resolve_arrival_date("13FEB", date(2026, 2, 12)), Some(date(2026, 2, 13)));
        assert_eq!(resolve_arrival_date("02JAN", date(2025, 12, 31)), Some(date(2026, 1, 2)));
        assert_eq!(resolve_arrival_date("30DEC", date(2025, 12, 31)), Some(date(2025, 12, 30)));
        assert_eq!(resolve_arrival_date("30FEB", date(2026, 2, 12)), None);
    }

    #[test]
    fn test_undecodable_segment_skipped() {
        let good = try_parse_segment("AZ 2038   26NOV FCOLIN HS2  1400   1510").unwrap();
        let bad = try_parse_segment("AZ 2039   30FEB FCOLIN HS2  1400   1510").unwrap();
        let flights = decode_segments(&[good, bad], date(2025, 10, 1), &StaticDirectory::builtin());
        assert_eq!(flights.len(), 1);
        assert!(!flights[0].overnight);
    }
}
