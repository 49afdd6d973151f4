use thiserror::Error;

/// Separator inserted between groups of three digits in display prices
pub const THOUSANDS_SEPARATOR: char = '.';

/// Why a price string could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("price is empty")]
    Empty,

    #[error("unexpected character {0:?} in price")]
    InvalidCharacter(char),

    #[error("price does not fit in an unsigned 64-bit integer")]
    OutOfRange,
}

/// Parse a display price such as `350.000` (or `350,000`) into its value.
/// Currency symbols, signs and decimals are rejected.
pub fn parse_display(input: &str) -> Result<u64, PriceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PriceError::Empty);
    }

    let mut digits = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '0'..='9' => digits.push(c),
            '.' | ',' => {}
            other => return Err(PriceError::InvalidCharacter(other)),
        }
    }

    parse_wire(&digits)
}

/// Parse a wire price, which must be plain ASCII digits
pub fn parse_wire(input: &str) -> Result<u64, PriceError> {
    if input.is_empty() {
        return Err(PriceError::Empty);
    }
    if let Some(bad) = input.chars().find(|c| !c.is_ascii_digit()) {
        return Err(PriceError::InvalidCharacter(bad));
    }
    input.parse::<u64>().map_err(|_| PriceError::OutOfRange)
}

/// Format a value with thousands separators: `1234567` -> `1.234.567`
pub fn format_thousands(value: u64) -> String {
    group_digits(&value.to_string())
}

/// True when `input` is exactly how [`format_thousands`] would print it
pub fn is_canonical(input: &str) -> bool {
    parse_display(input)
        .map(|value| format_thousands(value) == input)
        .unwrap_or(false)
}

/// Input mask for price fields: keeps only the digits the user typed and
/// regroups them, so `"R$ 1234567"` becomes `"1.234.567"`.
pub fn price_mask(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let significant = digits.trim_start_matches('0');

    if digits.is_empty() {
        String::new()
    } else if significant.is_empty() {
        "0".to_string()
    } else {
        group_digits(significant)
    }
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);

    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1.000");
        assert_eq!(format_thousands(350_000), "350.000");
        assert_eq!(format_thousands(1_234_567), "1.234.567");
    }

    #[test]
    fn parses_display_prices() {
        assert_eq!(parse_display("100.000"), Ok(100_000));
        assert_eq!(parse_display("100,000"), Ok(100_000));
        assert_eq!(parse_display(" 42 "), Ok(42));
        assert_eq!(parse_display(""), Err(PriceError::Empty));
        assert_eq!(parse_display("R$ 10"), Err(PriceError::InvalidCharacter('R')));
        assert_eq!(parse_display("-5"), Err(PriceError::InvalidCharacter('-')));
        assert_eq!(parse_display("..."), Err(PriceError::Empty));
        assert_eq!(
            parse_display("99.999.999.999.999.999.999"),
            Err(PriceError::OutOfRange)
        );
    }

    #[test]
    fn wire_prices_are_digits_only() {
        assert_eq!(parse_wire("250000"), Ok(250_000));
        assert_eq!(parse_wire("250.000"), Err(PriceError::InvalidCharacter('.')));
        assert_eq!(parse_wire(""), Err(PriceError::Empty));
    }

    #[test]
    fn canonical_check() {
        assert!(is_canonical("350.000"));
        assert!(is_canonical("0"));
        assert!(!is_canonical("350000"));
        assert!(!is_canonical("0.350"));
        assert!(!is_canonical("abc"));
    }

    #[test]
    fn mask_keeps_only_digits() {
        assert_eq!(price_mask(""), "");
        assert_eq!(price_mask("abc"), "");
        assert_eq!(price_mask("1234567"), "1.234.567");
        assert_eq!(price_mask("R$ 1.2345"), "12.345");
        assert_eq!(price_mask("000"), "0");
        assert_eq!(price_mask("00450"), "450");
    }
}
