use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount as printed in the inventory books.
///
/// Handles formats like:
/// - "1.234,56" -> 1234.56 (dot thousands, comma decimals)
/// - "1.234.567" -> 1234567 (grouped thousands, no decimals)
/// - "0,5" -> 0.5
/// - "12.5" -> 12.5 (a lone dot that is not a thousands group)
/// - "-" or "" -> None
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();

    if s.is_empty() || s == crate::model::MISSING {
        return None;
    }

    let normalized = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else if is_grouped_thousands(s) {
        s.replace('.', "")
    } else {
        s.to_string()
    };

    Decimal::from_str(&normalized).ok()
}

/// "1.234" / "12.345.678": groups of exactly three digits after each dot.
fn is_grouped_thousands(s: &str) -> bool {
    let mut groups = s.split('.');
    let head = match groups.next() {
        Some(h) if !h.is_empty() && h.len() <= 3 => h,
        _ => return false,
    };
    let mut saw_group = false;
    for group in groups {
        if group.len() != 3 || !group.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        saw_group = true;
    }
    saw_group && head.bytes().all(|b| b.is_ascii_digit())
}

/// Parse an inventory id for ordering. Anything unparseable sorts as 0.
pub fn parse_id(s: &str) -> u64 {
    s.trim().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_comma_decimals_with_thousands() {
        assert_eq!(parse_amount("1.234,56"), Some(dec!(1234.56)));
    }

    #[test]
    fn test_grouped_thousands() {
        assert_eq!(parse_amount("1.234.567"), Some(dec!(1234567)));
        assert_eq!(parse_amount("12.345"), Some(dec!(12345)));
    }

    #[test]
    fn test_plain_values() {
        assert_eq!(parse_amount("0"), Some(dec!(0)));
        assert_eq!(parse_amount("0,5"), Some(dec!(0.5)));
        assert_eq!(parse_amount("12.5"), Some(dec!(12.5)));
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(parse_amount("  68,00 "), Some(dec!(68.00)));
    }

    #[test]
    fn test_sentinel_and_garbage() {
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("PROPIETAT"), None);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), 42);
        assert_eq!(parse_id(" 7 "), 7);
        assert_eq!(parse_id("-"), 0);
        assert_eq!(parse_id("TOTAL"), 0);
    }
}
