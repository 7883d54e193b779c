use crate::model::FlightSegment;
use regex::Regex;
use std::sync::LazyLock;

/// Segment grammar:
/// `[N ]CARRIER FLIGHT DDMON ORIGDEST [STATUS] DEP [#]ARR [DDMON]`
///
/// Examples:
/// - `AZ  679   25NOV GRUFCO HS2  2040  #1200`
/// - `EK  262   08JAN GRUDXB   0130   2235` (no status)
/// - `1 AA 950 12FEB  GRUJFK SS2  2235  0615   13FEB` (line number, arrival date)
static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    const MONTH: &str = "(?:JAN|FEB|MAR|APR|MAY|JUN|JUL|AUG|SEP|OCT|NOV|DEC)";
    Regex::new(&format!(
        r"^(?:\d{{1,2}}\s+)?(?P<carrier>[A-Z0-9]{{2}})\s*(?P<flight>\d{{1,4}})\s+(?P<date>\d{{1,2}}{MONTH})\s+(?P<orig>[A-Z]{{3}})(?P<dest>[A-Z]{{3}})(?:\s+(?P<status>[A-Z]{{2}}\d{{1,2}}))?\s+(?P<dep>\d{{4}})(?:\s*(?P<next>#)\s*|\s+)(?P<arr>\d{{4}})(?:\s+(?P<arr_date>\d{{1,2}}{MONTH}))?(?:\s.*)?$"
    ))
    .expect("segment pattern is valid")
});

/// Try to read a line as a flight segment.
///
/// Returns None if the line does not follow the segment grammar; that is
/// never an error, the line is simply left for the other rules.
pub fn try_parse_segment(line: &str) -> Option<FlightSegment> {
    let caps = SEGMENT.captures(line.trim())?;

    Some(FlightSegment {
        carrier: caps["carrier"].to_string(),
        flight_number: caps["flight"].to_string(),
        date: caps["date"].to_string(),
        departure_airport: caps["orig"].to_string(),
        arrival_airport: caps["dest"].to_string(),
        status: caps.name("status").map(|m| m.as_str().to_string()),
        departure_time: caps["dep"].to_string(),
        arrival_time: caps["arr"].to_string(),
        arrival_next_day: caps.name("next").is_some(),
        arrival_date: caps.name("arr_date").map(|m| m.as_str().to_string()),
    })
}

pub fn is_segment_line(line: &str) -> bool {
    SEGMENT.is_match(line.trim())
}
