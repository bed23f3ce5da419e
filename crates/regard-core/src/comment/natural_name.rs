//! Extraction of a plain display name from decorated feed names.
//!
//! Users decorate names with emoji and full-width punctuation
//! (`⭐みか⭐`, `♡ hana ♡`, `ゆう☆彡`). Templates address users by name, so
//! the decorative runs are trimmed off both ends. The character classes
//! stripped are a declarative range table rather than a regex so the policy
//! is inspectable and unit-testable on its own.

/// Unicode ranges treated as decoration, inclusive on both ends.
const STRIP_RANGES: &[(u32, u32)] = &[
    (0x2000, 0x206F),   // general punctuation (incl. ZWJ, bullets, quotes)
    (0x2190, 0x21FF),   // arrows
    (0x2460, 0x24FF),   // enclosed alphanumerics
    (0x2500, 0x25FF),   // box drawing, geometric shapes
    (0x2600, 0x26FF),   // misc symbols (stars, hearts, weather)
    (0x2700, 0x27BF),   // dingbats
    (0x2B00, 0x2BFF),   // misc symbols and arrows
    (0x3000, 0x303F),   // CJK symbols and punctuation
    (0x3099, 0x309C),   // bare kana combining marks
    (0xFE00, 0xFE0F),   // variation selectors
    (0xFF01, 0xFF0F),   // full-width punctuation runs
    (0xFF1A, 0xFF20),   //   (split around full-width digits
    (0xFF3B, 0xFF40),   //    and letters, which are kept)
    (0xFF5B, 0xFF65),   // full-width brackets, half-width punctuation
    (0xFFE0, 0xFFEE),   // full-width signs
    (0x1F000, 0x1FAFF), // emoji planes (pictographs, emoticons, transport…)
];

/// True for characters trimmed from the ends of a display name.
#[must_use]
pub fn is_decorative(c: char) -> bool {
    if c.is_whitespace() || c.is_ascii_punctuation() {
        return true;
    }
    let code = u32::from(c);
    STRIP_RANGES
        .iter()
        .any(|&(start, end)| (start..=end).contains(&code))
}

/// Trim leading/trailing decorative runs from a raw display name.
///
/// Interior decoration stays: `み☆か` is someone's name, `☆みか☆` is `みか`
/// wearing stars. Returns an empty string for all-decoration names.
#[must_use]
pub fn natural_name(raw: &str) -> &str {
    raw.trim_matches(is_decorative)
}
