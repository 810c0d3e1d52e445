//! Integer parsing for values typed into sheet form fields.
//!
//! Form inputs carry whatever the user typed, so parsing follows the
//! browser's `parseInt` rules rather than `str::parse`: leading whitespace is
//! skipped, an optional sign and `0x` prefix are honoured, and the longest
//! run of digits wins ("12abc" is 12, "1.9" is 1). Only input with no
//! leading digits at all is unparseable.

/// Ranks used when a ranks field is empty or unparseable.
pub const DEFAULT_RANKS: i32 = 0;

/// Misc bonus used when a misc field is empty or unparseable.
pub const DEFAULT_MISC: i32 = 0;

/// Modifier used when a modifier field is empty or unparseable.
pub const DEFAULT_MODIFIER: i32 = 0;

/// Parse a form value, returning `None` when no integer prefix exists.
///
/// Values outside the `i32` range saturate at `i32::MIN` / `i32::MAX`.
pub fn parse_form_int(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}');

    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        _ => (10, unsigned),
    };

    // Bound keeps the accumulator well inside i64 while still covering the
    // magnitude of i32::MIN.
    const LIMIT: i64 = i32::MAX as i64 + 1;

    let mut magnitude: i64 = 0;
    let mut seen_digit = false;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        seen_digit = true;
        magnitude = (magnitude * i64::from(radix) + i64::from(digit)).min(LIMIT);
    }

    if !seen_digit {
        return None;
    }

    let signed = if negative { -magnitude } else { magnitude };
    Some(signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32)
}

/// Parse an optional form value, falling back to `default` when the field is
/// absent or unparseable.
pub fn form_int_or(raw: Option<&str>, default: i32) -> i32 {
    raw.and_then(parse_form_int).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_signed_values() {
        assert_eq!(parse_form_int("14"), Some(14));
        assert_eq!(parse_form_int("+2"), Some(2));
        assert_eq!(parse_form_int("-1"), Some(-1));
        assert_eq!(parse_form_int("  7"), Some(7));
        assert_eq!(parse_form_int("0"), Some(0));
    }

    #[test]
    fn takes_longest_digit_prefix() {
        assert_eq!(parse_form_int("12abc"), Some(12));
        assert_eq!(parse_form_int("1.9"), Some(1));
        assert_eq!(parse_form_int("3 ranks"), Some(3));
        assert_eq!(parse_form_int("1e3"), Some(1));
    }

    #[test]
    fn rejects_input_without_digits() {
        assert_eq!(parse_form_int(""), None);
        assert_eq!(parse_form_int("abc"), None);
        assert_eq!(parse_form_int("-"), None);
        assert_eq!(parse_form_int("+ 3"), None);
        assert_eq!(parse_form_int("0x"), None);
    }

    #[test]
    fn honours_hex_prefix() {
        assert_eq!(parse_form_int("0x1A"), Some(26));
        assert_eq!(parse_form_int("-0X10"), Some(-16));
    }

    #[test]
    fn saturates_out_of_range_values() {
        assert_eq!(parse_form_int("99999999999999999999"), Some(i32::MAX));
        assert_eq!(parse_form_int("-99999999999999999999"), Some(i32::MIN));
        assert_eq!(parse_form_int("-2147483648"), Some(i32::MIN));
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(form_int_or(Some("abc"), 10), 10);
        assert_eq!(form_int_or(None, DEFAULT_RANKS), 0);
        assert_eq!(form_int_or(Some("5"), 10), 5);
        assert_eq!(form_int_or(Some("0"), 10), 0);
    }
}
