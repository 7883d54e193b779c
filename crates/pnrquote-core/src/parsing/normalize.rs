use crate::model::{FareCategory, PaxType};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Normalize a fare class token to a [`FareCategory`].
///
/// Known aliases map case-insensitively (`exe` -> Exe, `premium` -> Pre).
/// Anything else is kept as `Other` with its first letter capitalized.
pub fn normalize_category(raw: &str) -> FareCategory {
    let lower = raw.trim().to_lowercase();
    if let Some(known) = CATEGORY_ALIASES.get(lower.as_str()) {
        return known.clone();
    }
    FareCategory::Other(capitalize(&lower))
}

/// Normalize a passenger type suffix (`/chd`). Unknown tokens yield None.
pub fn normalize_pax_type(raw: &str) -> Option<PaxType> {
    match raw.trim().to_lowercase().as_str() {
        "adt" => Some(PaxType::Adt),
        "chd" => Some(PaxType::Chd),
        "inf" => Some(PaxType::Inf),
        _ => None,
    }
}

/// A standalone cabin line such as `Executiva` sets the class for fare
/// lines that carry no `*Class` suffix.
pub fn cabin_hint(line: &str) -> Option<FareCategory> {
    let lower = line.trim().trim_end_matches(['.', ':']).to_lowercase();
    if lower.is_empty() {
        return None;
    }
    CABIN_LINES
        .get(lower.as_str())
        .or_else(|| CATEGORY_ALIASES.get(lower.as_str()).filter(|_| lower.len() > 3))
        .cloned()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

static CATEGORY_ALIASES: LazyLock<HashMap<&'static str, FareCategory>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // Executive / business
    m.insert("exe", FareCategory::Exe);
    m.insert("exec", FareCategory::Exe);
    m.insert("executiva", FareCategory::Exe);
    m.insert("executive", FareCategory::Exe);
    m.insert("business", FareCategory::Exe);

    // Economy
    m.insert("eco", FareCategory::Eco);
    m.insert("econ", FareCategory::Eco);
    m.insert("economica", FareCategory::Eco);
    m.insert("econômica", FareCategory::Eco);
    m.insert("economy", FareCategory::Eco);

    // Premium economy
    m.insert("pre", FareCategory::Pre);
    m.insert("prem", FareCategory::Pre);
    m.insert("premium", FareCategory::Pre);
    m.insert("premeco", FareCategory::Pre);

    m
});

/// Multi-word cabin names that only appear as standalone lines.
static CABIN_LINES: LazyLock<HashMap<&'static str, FareCategory>> = LazyLock::new(|| {
    let mut m = HashMap::new();
    m.insert("classe executiva", FareCategory::Exe);
    m.insert("business class", FareCategory::Exe);
    m.insert("classe econômica", FareCategory::Eco);
    m.insert("classe economica", FareCategory::Eco);
    m.insert("premium economy", FareCategory::Pre);
    m.insert("premium eco", FareCategory::Pre);
    m.insert("econômica premium", FareCategory::Pre);
    m
});
