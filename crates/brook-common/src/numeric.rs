//! Parsing for the language's three numeric literal forms: integer, float
//! and rational. Unlike a general-purpose host language, there are no radix
//! prefixes and no digit-group separators here — the lexer's numeric token
//! classes already guarantee the lexeme matches one of the three grammars
//! below, so these functions only need to do the arithmetic.

/// Parses an integer literal lexeme (`[0-9]+`).
pub fn parse_int_literal(text: &str) -> Option<i64> {
    text.parse::<i64>().ok()
}

/// Parses a float literal lexeme (`[0-9]+ '.' [0-9]+`).
pub fn parse_float_literal(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

/// Parses a rational literal lexeme (`[0-9]+ '//' [0-9]+`) into its
/// (numerator, denominator) pair. Does not reduce the fraction — that is a
/// semantic concern for whatever consumes the parsed value.
pub fn parse_rational_literal(text: &str) -> Option<(i64, i64)> {
    let (num, den) = text.split_once("//")?;
    Some((num.parse().ok()?, den.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_integers() {
        assert_eq!(parse_int_literal("0"), Some(0));
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("3.5"), None);
    }

    #[test]
    fn parses_floats() {
        assert_eq!(parse_float_literal("3.5"), Some(3.5));
        assert_eq!(parse_float_literal("0.0"), Some(0.0));
    }

    #[test]
    fn parses_rationals() {
        assert_eq!(parse_rational_literal("1//2"), Some((1, 2)));
        assert_eq!(parse_rational_literal("10//3"), Some((10, 3)));
        assert_eq!(parse_rational_literal("10/3"), None);
    }
}
