//! Locale-flexible decimal parsing
//!
//! Dataset cells and OCR output use either `.` or `,` as the decimal separator.

/// Parse a decimal string, accepting `,` as the separator
///
/// Examples:
/// - "65,5" -> Some(65.5)
/// - " 2250 " -> Some(2250.0)
/// - "1.234,5" -> None (thousands separators are not supported)
pub fn parse_decimal(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a decimal string, falling back to 0 for anything unparseable
pub fn decimal_or_zero(s: &str) -> f64 {
    parse_decimal(s).unwrap_or(0.0)
}

/// Parse the numeric prefix of a string such as "12 g" or "65,5kkal"
pub fn leading_number(s: &str) -> Option<f64> {
    let normalized = s.trim().replace(',', ".");
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in normalized.char_indices() {
        if c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+')) {
            end = i + c.len_utf8();
        } else if c == '.' && !seen_dot {
            seen_dot = true;
            end = i + 1;
        } else {
            break;
        }
    }
    normalized[..end].trim_end_matches('.').parse::<f64>().ok()
}
