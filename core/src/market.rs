//! Place name to market code resolution.
//!
//! Known landmarks map to numeric codes through a fixed table. Anything
//! else gets a generated code `{location}_{category}_{unix_seconds}`; such
//! codes are unique per second, not stable, and the server may not know
//! them.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

/// Known place names and their market codes, most specific names first.
pub const MARKET_CODES: &[(&str, &str)] = &[
    ("대전느리울중학교", "10435"),
    ("유성고속터미널", "10436"),
    ("시청역6번 출구", "10437"),
    ("대전역1번 출구", "10438"),
    ("중앙로역7번 출구", "10439"),
    ("대전 중리전통시장", "10440"),
    ("대전시청", "10441"),
    ("대전 시청", "10441"),
    ("대전역", "10438"),
    ("시청역", "10437"),
    ("중앙로역", "10439"),
    ("유성고속", "10436"),
    ("느리울중학교", "10435"),
    ("중리전통시장", "10440"),
];

const LOCATION_SLUGS: &[(&str, &str)] = &[
    ("대전시청", "daejeon_city_hall"),
    ("대전 시청", "daejeon_city_hall"),
    ("강남구", "gangnam_gu"),
    ("서울시청", "seoul_city_hall"),
    ("부산시청", "busan_city_hall"),
    ("인천시청", "incheon_city_hall"),
    ("광주시청", "gwangju_city_hall"),
    ("대구시청", "daegu_city_hall"),
    ("울산시청", "ulsan_city_hall"),
];

/// Business categories offered when requesting a diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    All,
    Shopping,
    Accommodation,
    Food,
    Leisure,
    Travel,
    Transport,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::All,
        Category::Shopping,
        Category::Accommodation,
        Category::Food,
        Category::Leisure,
        Category::Travel,
        Category::Transport,
    ];

    /// Label shown in the app and sent as `category`.
    pub fn label(self) -> &'static str {
        match self {
            Category::All => "전체",
            Category::Shopping => "쇼핑업",
            Category::Accommodation => "숙박업",
            Category::Food => "식음료업",
            Category::Leisure => "여가서비스업",
            Category::Travel => "여행업",
            Category::Transport => "운송업",
        }
    }

    /// ASCII code used inside generated market codes.
    pub fn code(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Shopping => "shopping",
            Category::Accommodation => "accommodation",
            Category::Food => "food",
            Category::Leisure => "leisure",
            Category::Travel => "travel",
            Category::Transport => "transport",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

/// A market code, either from the known table or generated on the spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketCode {
    Known(&'static str),
    Generated(String),
}

impl MarketCode {
    pub fn as_str(&self) -> &str {
        match self {
            MarketCode::Known(code) => code,
            MarketCode::Generated(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, MarketCode::Known(_))
    }
}

impl fmt::Display for MarketCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Look `location` up in `MARKET_CODES`.
///
/// An exact match wins. Otherwise a key contained in the input (or the
/// input contained in a key) matches; among several, the longest key wins,
/// ties going to table order. Blank input never matches.
pub fn resolve_market_code(location: &str) -> Option<&'static str> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }
    if let Some((_, code)) = MARKET_CODES.iter().find(|(name, _)| *name == location) {
        return Some(*code);
    }
    MARKET_CODES
        .iter()
        .filter(|(name, _)| location.contains(name) || name.contains(location))
        .fold(None::<(&str, &'static str)>, |best, &(name, code)| match best {
            Some((best_name, _)) if best_name.chars().count() >= name.chars().count() => best,
            _ => Some((name, code)),
        })
        .map(|(_, code)| code)
}

/// Category label to the code used in generated market codes. Unknown
/// labels are lower-cased.
pub fn category_code(category: &str) -> String {
    let category = category.trim();
    Category::from_label(category)
        .map(|c| c.code().to_string())
        .unwrap_or_else(|| category.to_lowercase())
}

/// Location to the slug used in generated market codes. Unknown places are
/// lower-cased with spaces turned into underscores. Surrounding whitespace
/// is ignored, as in `resolve_market_code`.
pub fn location_slug(location: &str) -> String {
    let location = location.trim();
    LOCATION_SLUGS
        .iter()
        .find(|(name, _)| *name == location)
        .map(|(_, slug)| slug.to_string())
        .unwrap_or_else(|| location.to_lowercase().replace(' ', "_"))
}

/// `{location_slug}_{category_code}_{unix_seconds}`.
pub fn generate_market_code(location: &str, category: &str, unix_seconds: u64) -> String {
    format!(
        "{}_{}_{unix_seconds}",
        location_slug(location),
        category_code(category)
    )
}

/// Table lookup first, generated code otherwise.
pub fn market_code_at(location: &str, category: &str, unix_seconds: u64) -> MarketCode {
    match resolve_market_code(location) {
        Some(code) => {
            debug!(location, code, "market code from table");
            MarketCode::Known(code)
        }
        None => {
            let code = generate_market_code(location, category, unix_seconds);
            debug!(location, code = %code, "generated market code");
            MarketCode::Generated(code)
        }
    }
}

/// `market_code_at` with the current wall-clock time.
pub fn market_code_for(location: &str, category: &str) -> MarketCode {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    market_code_at(location, category, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("대전역1번 출구", "10438")]
    #[case("대전역", "10438")]
    #[case("대전 시청", "10441")]
    #[case("중리전통시장", "10440")]
    fn exact_names_resolve(#[case] location: &str, #[case] code: &str) {
        assert_eq!(resolve_market_code(location), Some(code));
    }

    #[test]
    fn substring_of_input_resolves() {
        assert_eq!(resolve_market_code("대전역 2번 출구 앞"), Some("10438"));
        assert_eq!(resolve_market_code("유성고속버스정류장"), Some("10436"));
    }

    #[test]
    fn input_inside_a_key_resolves() {
        assert_eq!(resolve_market_code("느리울"), Some("10435"));
    }

    #[test]
    fn exact_match_is_taken_before_containment() {
        // "시청역" is also contained in "시청역6번 출구".
        assert_eq!(resolve_market_code("시청역"), Some("10437"));
        assert_eq!(resolve_market_code("대전시청"), Some("10441"));
    }

    #[test]
    fn longest_contained_key_wins() {
        // Contains both "대전 시청" (10441) and "시청역" (10437).
        assert_eq!(resolve_market_code("대전 시청역 근처"), Some("10441"));
    }

    #[test]
    fn blank_and_unknown_do_not_resolve() {
        assert_eq!(resolve_market_code(""), None);
        assert_eq!(resolve_market_code("   "), None);
        assert_eq!(resolve_market_code("Gangnam Station"), None);
    }

    #[test]
    fn category_codes() {
        assert_eq!(category_code("식음료업"), "food");
        assert_eq!(category_code("전체"), "all");
        assert_eq!(category_code("Bakery"), "bakery");
    }

    #[test]
    fn location_slugs() {
        assert_eq!(location_slug("강남구"), "gangnam_gu");
        assert_eq!(location_slug("Seongsu Dong"), "seongsu_dong");
    }

    #[rstest]
    #[case(" 강남구", "gangnam_gu")]
    #[case("강남구\t", "gangnam_gu")]
    #[case("  서면 역 ", "서면_역")]
    fn padded_locations_slug_like_trimmed(#[case] location: &str, #[case] slug: &str) {
        assert_eq!(location_slug(location), slug);
    }

    #[test]
    fn padded_inputs_generate_the_trimmed_code() {
        assert_eq!(
            generate_market_code(" 강남구 ", " 식음료업", 1_700_000_000),
            "gangnam_gu_food_1700000000"
        );
    }

    #[test]
    fn unmapped_location_generates_code() {
        let code = market_code_at("강남구", "쇼핑업", 1_726_000_000);
        assert_eq!(code, MarketCode::Generated("gangnam_gu_shopping_1726000000".to_string()));
        assert!(!code.is_known());
    }

    #[test]
    fn mapped_location_ignores_timestamp() {
        let a = market_code_at("대전역", "쇼핑업", 1);
        let b = market_code_at("대전역", "숙박업", 2);
        assert_eq!(a, MarketCode::Known("10438"));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "10438");
    }

    #[test]
    fn wall_clock_code_has_three_parts() {
        let code = market_code_for("Seongsu Dong", "Cafe");
        let parts: Vec<&str> = code.as_str().rsplitn(2, '_').collect();
        assert!(parts[0].parse::<u64>().is_ok());
        assert!(code.as_str().starts_with("seongsu_dong_cafe_"));
    }

    #[test]
    fn category_labels_round_trip() {
        for c in Category::ALL {
            assert_eq!(Category::from_label(c.label()), Some(c));
        }
    }
}
