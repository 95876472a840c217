//! Lenient parsing of the locale decimal strings typed into measurements.
//!
//! Nothing here fails: malformed input degrades to zero and the caller decides
//! on a fallback. Parsing reads the longest numeric prefix, so `"1,5m"` is 1.5.

/// Parse a decimal that may use `,` or `.` as separator. Invalid input is 0.
pub fn parse_locale_decimal(input: &str) -> f64 {
    let normalized = input.trim_start().replacen(',', ".", 1);
    let prefix = numeric_prefix(&normalized, true);

    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Parse the integer prefix of a quantity string, `None` when there is none
pub fn parse_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    numeric_prefix(trimmed, false).parse::<i64>().ok()
}

/// Quantity as committed by the keypad: invalid or zero becomes 1
pub fn coerce_quantity(input: &str) -> u32 {
    match parse_integer(input) {
        Some(value) if value > 0 => u32::try_from(value).unwrap_or(u32::MAX),
        _ => 1,
    }
}

/// Width or height as committed by the keypad: empty or a lone separator is "0"
pub fn coerce_dimension(input: &str) -> String {
    match input {
        "" | "." | "," => "0".to_string(),
        other => to_stored_form(other),
    }
}

/// Canonical stored form uses `,` as separator
pub fn to_stored_form(value: &str) -> String {
    value.replacen('.', ",", 1)
}

/// Keypad buffers use `.` as separator
pub fn to_buffer_form(value: &str) -> String {
    value.replacen(',', ".", 1)
}

fn numeric_prefix(input: &str, allow_fraction: bool) -> &str {
    let bytes = input.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if allow_fraction && end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    &input[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_decimal_accepts_both_separators() {
        assert_eq!(parse_locale_decimal("1,5"), 1.5);
        assert_eq!(parse_locale_decimal("1.5"), 1.5);
        assert_eq!(parse_locale_decimal("2"), 2.0);
        assert_eq!(parse_locale_decimal(" 0,75"), 0.75);
    }

    #[test]
    fn test_parse_locale_decimal_degrades_to_zero() {
        assert_eq!(parse_locale_decimal(""), 0.0);
        assert_eq!(parse_locale_decimal("abc"), 0.0);
        assert_eq!(parse_locale_decimal(","), 0.0);
        assert_eq!(parse_locale_decimal("-"), 0.0);
    }

    #[test]
    fn test_parse_locale_decimal_reads_numeric_prefix() {
        assert_eq!(parse_locale_decimal("1,5m"), 1.5);
        assert_eq!(parse_locale_decimal("3."), 3.0);
        assert_eq!(parse_locale_decimal("-2,5"), -2.5);
    }

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity("3"), 3);
        assert_eq!(coerce_quantity(""), 1);
        assert_eq!(coerce_quantity("0"), 1);
        assert_eq!(coerce_quantity("x"), 1);
        assert_eq!(coerce_quantity("12abc"), 12);
    }

    #[test]
    fn test_coerce_dimension() {
        assert_eq!(coerce_dimension(""), "0");
        assert_eq!(coerce_dimension("."), "0");
        assert_eq!(coerce_dimension(","), "0");
        assert_eq!(coerce_dimension("1.25"), "1,25");
        assert_eq!(coerce_dimension("3"), "3");
    }

    #[test]
    fn test_buffer_and_stored_forms() {
        assert_eq!(to_buffer_form("1,20"), "1.20");
        assert_eq!(to_stored_form("1.20"), "1,20");
    }
}
