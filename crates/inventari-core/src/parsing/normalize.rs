use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Collapse every run of whitespace to a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case- and diacritic-insensitive form used for keyword matching.
///
/// Steps:
/// 1. Decompose (NFD) so accents become separate combining marks
/// 2. Drop the combining marks
/// 3. Lowercase
/// 4. Collapse whitespace
pub fn fold(s: &str) -> String {
    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();
    collapse_whitespace(&stripped.to_lowercase())
}

/// True if `haystack` contains any of `keywords`, compared folded.
pub fn contains_keyword(haystack: &str, keywords: &[&str]) -> bool {
    let folded = fold(haystack);
    keywords.iter().any(|kw| folded.contains(&fold(kw)))
}

/// True if any folded word of `haystack` equals one of `keywords`.
///
/// Words are split on anything that is not alphanumeric, so "TOTALS:" yields
/// "totals" while "CONSUMABLE" never matches "suma".
pub fn contains_word(haystack: &str, keywords: &[&str]) -> bool {
    let folded = fold(haystack);
    folded
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .any(|word| keywords.iter().any(|kw| fold(kw) == word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(
            collapse_whitespace("  ESCOLA \t  BRESSOL\n MUNICIPAL "),
            "ESCOLA BRESSOL MUNICIPAL"
        );
    }

    #[test]
    fn test_fold_strips_accents_and_case() {
        assert_eq!(fold("INSPECCIÓ FÍSICA"), "inspeccio fisica");
        assert_eq!(fold("ÚS COMÚ"), "us comu");
    }

    #[test]
    fn test_contains_keyword_is_diacritic_insensitive() {
        assert!(contains_keyword("TOTAL GENERAL:", &["total"]));
        assert!(contains_keyword("Subtotal pàgina", &["SUBTOTAL"]));
        assert!(contains_keyword("SUMA ANTERIOR", &["suma"]));
        assert!(!contains_keyword("ESCOLA BRESSOL", &["total", "suma"]));
    }

    #[test]
    fn test_contains_word_matches_whole_words() {
        let kws = ["total", "suma"];
        assert!(contains_word("TOTAL GENERAL:", &kws));
        assert!(contains_word("Suma parcial", &kws));
        assert!(!contains_word("MATERIAL CONSUMABLE", &kws));
        assert!(!contains_word("TOTALMENT", &kws));
    }

    #[test]
    fn test_contains_word_catches_plural_totals() {
        use crate::schema::vocab::TOTALS_KEYWORDS;
        assert!(contains_word("SUBTOTALS:", TOTALS_KEYWORDS));
        assert!(contains_word("Sumes i segueix", TOTALS_KEYWORDS));
        assert!(!contains_word("MATERIAL CONSUMABLE", TOTALS_KEYWORDS));
    }
}
