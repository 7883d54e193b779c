use crate::error::QuoteError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Result of resolving an airport code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportLookup {
    pub iata_code: String,
    /// City or airport name; the code itself when unresolved.
    pub description: String,
    pub found: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Airport and airline name resolution.
pub trait AirportDirectory: Send + Sync {
    /// Resolve an airport code. Never fails; unresolved codes come back
    /// with `found = false`.
    fn resolve_airport(&self, code: &str) -> AirportLookup;

    /// Airline name for a 2-character carrier code.
    fn airline_name(&self, code: &str) -> Option<String>;

    /// Name of this directory backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

pub fn is_iata_airport_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase())
}

/// In-memory directory backed by two code -> name maps.
#[derive(Debug, Clone)]
pub struct StaticDirectory {
    name: String,
    airports: HashMap<String, String>,
    airlines: HashMap<String, String>,
}

#[derive(Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    airports: HashMap<String, String>,
    #[serde(default)]
    airlines: HashMap<String, String>,
}

impl StaticDirectory {
    /// The bundled table of common airports and carriers.
    pub fn builtin() -> Self {
        Self {
            name: "builtin".to_string(),
            airports: to_owned_map(&BUILTIN_AIRPORTS),
            airlines: to_owned_map(&BUILTIN_AIRLINES),
        }
    }

    /// Parse a directory from JSON:
    /// `{ "airports": { "GRU": "São Paulo" }, "airlines": { "LA": "LATAM Airlines" } }`.
    pub fn from_json(json: &str) -> Result<Self, QuoteError> {
        let file: DirectoryFile =
            serde_json::from_str(json).map_err(|e| QuoteError::DirectoryLoad(e.to_string()))?;

        if let Some(bad) = file.airports.keys().find(|k| !is_iata_airport_code(&k.to_uppercase())) {
            return Err(QuoteError::DirectoryLoad(format!(
                "'{}' is not a 3-letter airport code",
                bad
            )));
        }

        Ok(Self {
            name: file.name.unwrap_or_else(|| "json".to_string()),
            airports: upper_keys(file.airports),
            airlines: upper_keys(file.airlines),
        })
    }

    pub fn load(path: &Path) -> Result<Self, QuoteError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| QuoteError::DirectoryLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Entries of `other` override entries of `self`.
    pub fn merged_with(mut self, other: StaticDirectory) -> Self {
        self.airports.extend(other.airports);
        self.airlines.extend(other.airlines);
        self.name = format!("{}+{}", self.name, other.name);
        self
    }

    pub fn airport_count(&self) -> usize {
        self.airports.len()
    }
}

impl AirportDirectory for StaticDirectory {
    fn resolve_airport(&self, code: &str) -> AirportLookup {
        let code = code.trim().to_uppercase();
        if !is_iata_airport_code(&code) {
            return AirportLookup {
                description: code.clone(),
                error: Some(format!("'{}' is not a valid IATA airport code", code)),
                iata_code: code,
                found: false,
            };
        }

        match self.airports.get(&code) {
            Some(name) => AirportLookup {
                iata_code: code,
                description: name.clone(),
                found: true,
                error: None,
            },
            None => AirportLookup {
                description: code.clone(),
                error: Some(format!("airport {} not found in {} directory", code, self.name)),
                iata_code: code,
                found: false,
            },
        }
    }

    fn airline_name(&self, code: &str) -> Option<String> {
        self.airlines.get(&code.trim().to_uppercase()).cloned()
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}

fn to_owned_map(map: &HashMap<&'static str, &'static str>) -> HashMap<String, String> {
    map.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn upper_keys(map: HashMap<String, String>) -> HashMap<String, String> {
    map.into_iter().map(|(k, v)| (k.trim().to_uppercase(), v)).collect()
}

static BUILTIN_AIRLINES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("LA", "LATAM Airlines"),
        ("BA", "British Airways"),
        ("IB", "Iberia"),
        ("TP", "TAP Air Portugal"),
        ("AF", "Air France"),
        ("KL", "KLM"),
        ("LH", "Lufthansa"),
        ("UA", "United Airlines"),
        ("AA", "American Airlines"),
        ("DL", "Delta Air Lines"),
        ("AZ", "ITA Airways"),
        ("LX", "Swiss International Air Lines"),
        ("JL", "Japan Airlines"),
        ("EK", "Emirates"),
        ("SA", "South African Airways"),
        ("QR", "Qatar Airways"),
    ])
});

static BUILTIN_AIRPORTS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Brasil
        ("GRU", "São Paulo"),
        ("CGH", "São Paulo"),
        ("GIG", "Rio de Janeiro"),
        ("SDU", "Rio de Janeiro"),
        ("BSB", "Brasília"),
        ("REC", "Recife"),
        ("SSA", "Salvador"),
        ("FOR", "Fortaleza"),
        ("CWB", "Curitiba"),
        ("POA", "Porto Alegre"),
        // Europa
        ("LIS", "Lisboa"),
        ("OPO", "Porto"),
        ("MAD", "Madrid"),
        ("BCN", "Barcelona"),
        ("FCO", "Roma"),
        ("MXP", "Milão"),
        ("LIN", "Milão"),
        ("VCE", "Veneza"),
        ("FLR", "Florença"),
        ("NAP", "Nápoles"),
        ("CDG", "Paris"),
        ("ORY", "Paris"),
        ("NCE", "Nice"),
        ("LHR", "Londres"),
        ("LGW", "Londres"),
        ("MAN", "Manchester"),
        ("EDI", "Edimburgo"),
        ("AMS", "Amsterdam"),
        ("FRA", "Frankfurt"),
        ("MUC", "Munique"),
        ("ZRH", "Zurique"),
        ("GVA", "Genebra"),
        ("VIE", "Viena"),
        ("IST", "Istambul"),
        // Américas
        ("JFK", "Nova York"),
        ("EWR", "Nova York"),
        ("MIA", "Miami"),
        ("MCO", "Orlando"),
        ("LAX", "Los Angeles"),
        ("SFO", "San Francisco"),
        ("ORD", "Chicago"),
        ("ATL", "Atlanta"),
        ("DFW", "Dallas"),
        ("BOS", "Boston"),
        ("IAD", "Washington"),
        ("YYZ", "Toronto"),
        ("MEX", "Cidade do México"),
        ("CUN", "Cancún"),
        ("EZE", "Buenos Aires"),
        ("SCL", "Santiago"),
        ("LIM", "Lima"),
        ("BOG", "Bogotá"),
        // Oriente Médio, Ásia, Oceania, África
        ("DXB", "Dubai"),
        ("DOH", "Doha"),
        ("AUH", "Abu Dhabi"),
        ("HKG", "Hong Kong"),
        ("PVG", "Xangai"),
        ("PEK", "Pequim"),
        ("NRT", "Tóquio"),
        ("HND", "Tóquio"),
        ("ICN", "Seul"),
        ("SIN", "Singapura"),
        ("BKK", "Bangkok"),
        ("SYD", "Sydney"),
        ("AKL", "Auckland"),
        ("JNB", "Joanesburgo"),
        ("CPT", "Cidade do Cabo"),
    ])
});
