use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_/]").expect("slug character class should be valid"));
static DASH_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-+").expect("dash run pattern should be valid"));

/// Trim whitespace + strip outer quotes if present.
pub fn clean_str(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

/// Normalize a label into a lowercase, hyphen-separated slug usable in
/// file names and URI path segments.
///
/// Non-ASCII text is transliterated first (`£` becomes `ps`, `é` becomes
/// `e`). Then anything outside `[a-z0-9_/]` becomes `-`, runs of `-`
/// collapse and a trailing `-` is dropped. A leading `-` is kept.
pub fn pathify(label: &str) -> String {
    let lower = deunicode(label).to_lowercase();
    let replaced = NON_SLUG_CHARS.replace_all(&lower, "-");
    let collapsed = DASH_RUNS.replace_all(&replaced, "-");
    collapsed
        .strip_suffix('-')
        .unwrap_or(&collapsed)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_str_strips_quotes_and_whitespace() {
        assert_eq!(clean_str("  \"2019\" "), "2019");
        assert_eq!(clean_str("\""), "\"");
        assert_eq!(clean_str(" 1,234 "), "1,234");
    }

    #[test]
    fn pathify_labels() {
        assert_eq!(pathify("Alcohol price index"), "alcohol-price-index");
        assert_eq!(pathify("F10"), "f10");
        assert_eq!(
            pathify("Net Ingredient Cost (£ 000s)"),
            "net-ingredient-cost-ps-000s"
        );
        assert_eq!(pathify("Spirits: percentage of total"), "spirits-percentage-of-total");
        assert_eq!(pathify("K70.0-K70.9"), "k70-0-k70-9");
        assert_eq!(pathify("per_adult/year"), "per_adult/year");
        assert_eq!(pathify("(revised)"), "-revised");
    }

    #[test]
    fn pathify_transliterates_non_ascii() {
        assert_eq!(pathify("Café rosé"), "cafe-rose");
        assert_eq!(
            pathify("Off trade alcohol (£ million)"),
            "off-trade-alcohol-ps-million"
        );
    }
}
