use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+\.?\d*|\.\d+)$").expect("valid quantity pattern"));

static AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d.,]+$").expect("valid amount pattern"));

static GROUPED_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}(?:\.\d{3})*(?:,\d{2})?$").expect("valid grouped amount pattern")
});

static DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid date pattern"));

/// Content shape a fragment must have to land in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Only ASCII digits, between `min` and `max` of them.
    Digits { min: usize, max: usize },
    /// Any run of ASCII digits.
    Integer,
    /// A plain quantity: "3", "2.5", ".5".
    Quantity,
    /// Digits with dots and commas in any arrangement ("0", "1.234,56").
    Amount,
    /// Strict thousands-grouped amount with optional two decimals ("12.345,67").
    GroupedAmount,
    /// DD/MM/YYYY.
    Date,
    /// Anything that is neither an amount nor a date.
    Text,
}

impl Shape {
    pub const fn exact_digits(n: usize) -> Shape {
        Shape::Digits { min: n, max: n }
    }

    pub fn matches(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        match self {
            Shape::Digits { min, max } => {
                text.len() >= *min && text.len() <= *max && text.bytes().all(|b| b.is_ascii_digit())
            }
            Shape::Integer => text.bytes().all(|b| b.is_ascii_digit()),
            Shape::Quantity => QUANTITY.is_match(text),
            Shape::Amount => AMOUNT.is_match(text),
            Shape::GroupedAmount => GROUPED_AMOUNT.is_match(text),
            Shape::Date => DATE.is_match(text),
            Shape::Text => !AMOUNT.is_match(text) && !DATE.is_match(text),
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Digits { min, max } if min == max => write!(f, "{min} digits"),
            Shape::Digits { min, max } => write!(f, "{min}-{max} digits"),
            Shape::Integer => write!(f, "integer"),
            Shape::Quantity => write!(f, "quantity"),
            Shape::Amount => write!(f, "amount"),
            Shape::GroupedAmount => write!(f, "grouped amount"),
            Shape::Date => write!(f, "DD/MM/YYYY"),
            Shape::Text => write!(f, "text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_digits() {
        let code = Shape::exact_digits(6);
        assert!(code.matches("120103"));
        assert!(code.matches(" 120103 "));
        assert!(!code.matches("12010"));
        assert!(!code.matches("1201034"));
        assert!(!code.matches("12O103"));
    }

    #[test]
    fn test_digit_range() {
        let n = Shape::Digits { min: 1, max: 4 };
        assert!(n.matches("7"));
        assert!(n.matches("1234"));
        assert!(!n.matches("12345"));
        assert!(!n.matches(""));
    }

    #[test]
    fn test_quantity() {
        assert!(Shape::Quantity.matches("3"));
        assert!(Shape::Quantity.matches("2.5"));
        assert!(Shape::Quantity.matches(".5"));
        assert!(!Shape::Quantity.matches("."));
        assert!(!Shape::Quantity.matches("CADIRA"));
    }

    #[test]
    fn test_amounts() {
        assert!(Shape::Amount.matches("0"));
        assert!(Shape::Amount.matches("1.234,56"));
        assert!(!Shape::Amount.matches("12 €"));
        assert!(Shape::GroupedAmount.matches("12.345,67"));
        assert!(Shape::GroupedAmount.matches("950"));
        assert!(!Shape::GroupedAmount.matches("1234,5"));
    }

    #[test]
    fn test_date_and_text() {
        assert!(Shape::Date.matches("15/03/2020"));
        assert!(!Shape::Date.matches("15-03-2020"));
        assert!(Shape::Text.matches("A-12"));
        assert!(!Shape::Text.matches("15/03/2020"));
        assert!(!Shape::Text.matches("1.000,00"));
    }
}
