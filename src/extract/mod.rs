pub mod numeric;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use self::numeric::parse_locale_number;

// Label-first tiers, loose fallbacks second. Character classes deliberately
// exclude newlines so numbers on adjacent lines never get joined.
static PRICE_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)cena["':\s]*(\d[\d\u{a0} .,]*)\s*zł"#).unwrap());
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d[\d\u{a0} .,]*)\s*zł").unwrap());
static AREA_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)powierzchnia["':\s]*(\d+(?:[.,]\d+)?)\s*m"#).unwrap());
static AREA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)\s*m[²2]").unwrap());
static ROOMS_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)liczba\s+pokoi["':\s]*(\d+)"#).unwrap());
static ROOMS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)[-\u{a0} ]*poko").unwrap());
static STUDIO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(kawalerka|kawalerkę|kawalerki|studio)\b").unwrap());
// Label-to-value gap allows at most one line break, so a bare label never
// captures an unrelated number further down the blob.
static FLOOR_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:piętro|pietro|poziom)["':]*[^\S\n]*\n?[^\S\n]*((?:\d+|parter)(?:\s*/\s*(?:\d+|parter))?)"#,
    )
    .unwrap()
});
static FLOOR_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)((?:\d+|parter)(?:\s*/\s*(?:\d+|parter))?)\s*(?:piętro|pietro)").unwrap()
});
static PARTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bparter\b").unwrap());
static PRICE_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\u{a0} .,]+zł(/m[²2])?$").unwrap());

const ELEVATOR_WORDS: &[&str] = &["winda", "windą", "windy", "elevator", "lift"];
const ELEVATOR_NEGATIONS: &[&str] = &["brak windy", "bez windy", "no elevator", "without elevator"];
const BALCONY_WORDS: &[&str] = &["balkon", "taras", "loggia", "balcony"];

// Navigation chrome that search pages leak into card text.
const TITLE_BLACKLIST: &[&str] = &[
    "powiadomienia",
    "notifications",
    "szukaj",
    "search",
    "filtry",
    "filters",
    "obserwuj",
    "zapisz wyszukiwanie",
];
const MIN_TITLE_LEN: usize = 6;

/// Prices below this are extraction noise (a stray fee or per-month figure
/// near the price element), not an apartment price.
const MIN_PLAUSIBLE_PRICE: f64 = 10_000.0;

/// Where a text blob came from: a compact search-results card or a full
/// listing page. Loose fallback patterns only run against card text; full
/// pages carry too much unrelated copy for them to be safe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Summary,
    Detail,
}

/// Partial record pulled from one text blob. Absence is meaningful: a missing
/// field lets the detail pass (or the filter's optimistic path) take over.
#[derive(Debug, Default, Clone, Serialize)]
pub struct FieldSet {
    pub price: Option<f64>,
    pub area: Option<f64>,
    pub rooms: Option<u32>,
    pub floor: Option<String>,
    pub has_elevator: bool,
    pub has_balcony: bool,
    pub title: Option<String>,
    pub location: Option<String>,
}

pub fn extract_fields(text: &str, ctx: Context) -> FieldSet {
    let lower = text.to_lowercase();
    FieldSet {
        price: extract_price(text),
        area: extract_area(text, ctx),
        rooms: extract_rooms(text, ctx),
        floor: extract_floor(text),
        has_elevator: extract_elevator(&lower),
        has_balcony: BALCONY_WORDS.iter().any(|w| lower.contains(w)),
        title: (ctx == Context::Summary)
            .then(|| extract_title(text))
            .flatten(),
        location: (ctx == Context::Summary)
            .then(|| extract_location(text))
            .flatten(),
    }
}

/// Stable listing id: last path segment of the link, `.html` suffix and any
/// query/fragment stripped. Derived once, before any extraction work.
pub fn listing_id(link: &str) -> Option<String> {
    let path = link.split(['?', '#']).next().unwrap_or(link);
    let last = path.trim_end_matches('/').rsplit('/').next()?;
    let id = last.strip_suffix(".html").unwrap_or(last);
    (!id.is_empty()).then(|| id.to_string())
}

fn extract_price(text: &str) -> Option<f64> {
    for re in [&*PRICE_LABEL_RE, &*PRICE_RE] {
        for caps in re.captures_iter(text) {
            let end = caps.get(0).map(|m| m.end()).unwrap_or(0);
            // A zł figure followed by /m² is the unit price, not the asking price.
            if is_per_area_suffix(&text[end..]) {
                continue;
            }
            return parse_locale_number(&caps[1]).filter(|p| *p >= MIN_PLAUSIBLE_PRICE);
        }
    }
    None
}

fn is_per_area_suffix(rest: &str) -> bool {
    let Some(after_slash) = rest.trim_start().strip_prefix('/') else {
        return false;
    };
    after_slash.trim_start().starts_with(['m', 'M'])
}

fn extract_area(text: &str, ctx: Context) -> Option<f64> {
    if let Some(caps) = AREA_LABEL_RE.captures(text) {
        return parse_locale_number(&caps[1]);
    }
    if ctx == Context::Summary {
        if let Some(caps) = AREA_RE.captures(text) {
            return parse_locale_number(&caps[1]);
        }
    }
    None
}

fn extract_rooms(text: &str, ctx: Context) -> Option<u32> {
    if let Some(caps) = ROOMS_LABEL_RE.captures(text) {
        return caps[1].parse().ok();
    }
    if ctx == Context::Summary {
        if let Some(caps) = ROOMS_RE.captures(text) {
            return caps[1].parse().ok();
        }
    }
    // No digit anywhere: a studio is exactly one room.
    STUDIO_RE.is_match(text).then_some(1)
}

fn extract_floor(text: &str) -> Option<String> {
    let raw = FLOOR_LABEL_RE
        .captures(text)
        .or_else(|| FLOOR_SUFFIX_RE.captures(text))
        .map(|caps| caps[1].to_string())
        .or_else(|| PARTER_RE.is_match(text).then(|| "parter".to_string()))?;
    // Normalize "4 / 6" to "4/6".
    Some(raw.to_lowercase().split_whitespace().collect())
}

fn extract_elevator(lower: &str) -> bool {
    if ELEVATOR_NEGATIONS.iter().any(|n| lower.contains(n)) {
        return false;
    }
    ELEVATOR_WORDS.iter().any(|w| lower.contains(w))
}

fn extract_title(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let line = line.trim();
        if line.chars().count() < MIN_TITLE_LEN {
            return None;
        }
        let lower = line.to_lowercase();
        if TITLE_BLACKLIST.contains(&lower.as_str()) || PRICE_ONLY_RE.is_match(&lower) {
            return None;
        }
        Some(line.to_string())
    })
}

// Cards render "<district> - <freshness date>"; the left side is the location
// as long as it is not a measurement row.
fn extract_location(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (left, _) = line.trim().split_once(" - ")?;
        let left = left.trim();
        let len = left.chars().count();
        if len < 3 || len > 60 || left.chars().any(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(left.to_string())
    })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.txt", name)).unwrap()
    }

    #[test]
    fn olx_card() {
        let f = extract_fields(&fixture("olx_card"), Context::Summary);
        assert_eq!(
            f.title.as_deref(),
            Some("Mieszkanie 3-pokojowe z windą i balkonem, Krzyki")
        );
        assert_eq!(f.price, Some(450000.0));
        assert_eq!(f.area, Some(52.5));
        assert_eq!(f.rooms, Some(3));
        assert_eq!(f.floor.as_deref(), Some("3"));
        assert!(f.has_elevator);
        assert!(f.has_balcony);
        assert_eq!(f.location.as_deref(), Some("Wrocław, Krzyki"));
    }

    #[test]
    fn otodom_card() {
        let f = extract_fields(&fixture("otodom_card"), Context::Summary);
        assert_eq!(f.title.as_deref(), Some("Przestronne 2 pokoje przy Rynku"));
        assert_eq!(f.price, Some(620000.0));
        assert_eq!(f.area, Some(48.0));
        assert_eq!(f.rooms, Some(2));
        assert_eq!(f.floor.as_deref(), Some("4/6"));
        assert_eq!(f.location.as_deref(), Some("Wrocław, Stare Miasto"));
    }

    #[test]
    fn detail_page() {
        let f = extract_fields(&fixture("detail_page"), Context::Detail);
        assert_eq!(f.price, Some(450000.0));
        assert_eq!(f.area, Some(52.5));
        assert_eq!(f.rooms, Some(3));
        assert_eq!(f.floor.as_deref(), Some("3/4"));
        assert!(f.has_elevator);
        assert!(f.has_balcony);
        // Title and location only come from summary cards.
        assert_eq!(f.title, None);
        assert_eq!(f.location, None);
    }

    #[test]
    fn detail_ignores_loose_patterns() {
        // A full page mentions other listings' areas; only the labelled value counts.
        let text = "Zobacz podobne: 120 m² dom\nPowierzchnia: 48 m²";
        let f = extract_fields(text, Context::Detail);
        assert_eq!(f.area, Some(48.0));
        let no_label = "Zobacz podobne: 120 m² dom";
        assert_eq!(extract_fields(no_label, Context::Detail).area, None);
    }

    #[test]
    fn elevator_negation_wins() {
        let f = extract_fields("winda w okolicy, ale brak windy w budynku", Context::Detail);
        assert!(!f.has_elevator);
        let f = extract_fields("bez windy", Context::Detail);
        assert!(!f.has_elevator);
    }

    #[test]
    fn studio_counts_as_one_room() {
        let f = extract_fields("Kawalerka w centrum, 28 m²", Context::Summary);
        assert_eq!(f.rooms, Some(1));
    }

    #[test]
    fn digit_beats_studio_token() {
        let f = extract_fields("2 pokoje, dawniej kawalerka", Context::Summary);
        assert_eq!(f.rooms, Some(2));
    }

    #[test]
    fn implausible_price_is_noise() {
        let f = extract_fields("Czynsz 500 zł miesięcznie", Context::Summary);
        assert_eq!(f.price, None);
    }

    #[test]
    fn unit_price_figure_is_not_the_price() {
        // Otodom cards list the per-m² figure above the asking price.
        let f = extract_fields("10 000 zł/m²\n520 000 zł", Context::Summary);
        assert_eq!(f.price, Some(520000.0));
        let f = extract_fields("9 500 zł / m²\n620 000 zł", Context::Summary);
        assert_eq!(f.price, Some(620000.0));
        // Only the unit figure present: no price at all.
        let f = extract_fields("12 000 zł/m²", Context::Summary);
        assert_eq!(f.price, None);
    }

    #[test]
    fn bare_floor_label_does_not_reach_across_blank_lines() {
        let f = extract_fields("Piętro:\n\n450 000 zł", Context::Detail);
        assert_eq!(f.floor, None);
        // A value directly on the next line still counts.
        let f = extract_fields("Piętro:\n3/4", Context::Detail);
        assert_eq!(f.floor.as_deref(), Some("3/4"));
    }

    #[test]
    fn title_skips_chrome_and_prices() {
        let text = "Filtry\nObserwuj\n620 000 zł\nŁadne mieszkanie na Krzykach";
        let f = extract_fields(text, Context::Summary);
        assert_eq!(f.title.as_deref(), Some("Ładne mieszkanie na Krzykach"));
    }

    #[test]
    fn title_skips_short_lines() {
        let f = extract_fields("ok\nDwupokojowe z widokiem", Context::Summary);
        assert_eq!(f.title.as_deref(), Some("Dwupokojowe z widokiem"));
    }

    #[test]
    fn floor_word_orders() {
        assert_eq!(
            extract_fields("Piętro: 3", Context::Detail).floor.as_deref(),
            Some("3")
        );
        assert_eq!(
            extract_fields("4/6 piętro", Context::Summary).floor.as_deref(),
            Some("4/6")
        );
        assert_eq!(
            extract_fields("\"pietro\":\"parter\"", Context::Detail).floor.as_deref(),
            Some("parter")
        );
        assert_eq!(
            extract_fields("mieszkanie na parterze? nie: parter", Context::Summary)
                .floor
                .as_deref(),
            Some("parter")
        );
        assert_eq!(extract_fields("bez informacji", Context::Summary).floor, None);
    }

    #[test]
    fn id_from_link() {
        assert_eq!(
            listing_id("https://www.olx.pl/d/oferta/mieszkanie-krzyki-CID3-ID1abc.html").as_deref(),
            Some("mieszkanie-krzyki-CID3-ID1abc")
        );
        assert_eq!(
            listing_id("https://www.otodom.pl/pl/oferta/przestronne-2-pokoje-ID4xyz?from=list")
                .as_deref(),
            Some("przestronne-2-pokoje-ID4xyz")
        );
        assert_eq!(
            listing_id("https://www.olx.pl/d/oferta/trailing-slash-ID9/").as_deref(),
            Some("trailing-slash-ID9")
        );
    }
}
