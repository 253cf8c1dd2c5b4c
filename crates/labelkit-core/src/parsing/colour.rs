use std::sync::LazyLock;

use regex::Regex;

pub const UNKNOWN_COLOUR: &str = "UNKNOWN";

/// Page 2 boilerplate that never names the colour.
const SKIP_KEYWORDS: &[&str] = &[
    "purchase",
    "colour",
    "total",
    "pantone",
    "supplier",
    "price",
    "ordered",
    "sizes",
    "tpg",
    "tpx",
    "usd",
    "nip",
    "pepco",
    "poland",
    "ul. strzeszyńska 73a, 60-479 poznań",
];

static NUMERIC_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s,./-]+$").expect("valid numeric line pattern"));
static NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d.()]+").expect("valid colour noise pattern"));

/// Colour found on page 2 of an order sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColourLine {
    Found(String),
    /// The sheet asks for the colour to be entered by hand.
    Manual,
    Missing,
}

impl ColourLine {
    pub fn as_str(&self) -> &str {
        match self {
            ColourLine::Found(c) => c,
            ColourLine::Manual | ColourLine::Missing => UNKNOWN_COLOUR,
        }
    }
}

/// First non-boilerplate, non-numeric line, stripped of digits, dots and
/// parentheses and uppercased.
pub fn parse_colour(text: &str) -> ColourLine {
    let candidate = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter(|l| {
            let lower = l.to_lowercase();
            SKIP_KEYWORDS.iter().all(|k| !lower.contains(k))
        })
        .find(|l| !NUMERIC_LINE.is_match(l));

    let Some(line) = candidate else {
        return ColourLine::Missing;
    };

    let colour = NOISE.replace_all(line, "").trim().to_uppercase();

    if colour.contains("MANUAL") {
        ColourLine::Manual
    } else if colour.is_empty() {
        ColourLine::Found(UNKNOWN_COLOUR.to_string())
    } else {
        ColourLine::Found(colour)
    }
}
