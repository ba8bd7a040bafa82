//! CLI value validators.
//!
//! Shared coercion functions for raw option values. Each returns the rule
//! that was broken as a plain message; the normalizer attaches the flag name.

/// Parse and validate a bounded float value.
///
/// # Arguments
///
/// * `s` - The string to parse
/// * `min` - Minimum allowed value (inclusive)
/// * `max` - Maximum allowed value (inclusive)
pub fn parse_bounded_float(s: &str, min: f64, max: f64) -> Result<f64, String> {
    let value = parse_finite_float(s)?;

    if !(min..=max).contains(&value) {
        return Err(format!("must be between {min} and {max}, got {value}"));
    }

    Ok(value)
}

/// Parse a finite float value.
pub fn parse_finite_float(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() {
        return Err(format!("'{s}' is not a finite number"));
    }

    Ok(value)
}

/// Parse an integer that must be at least 1.
pub fn parse_positive_int(s: &str) -> Result<usize, String> {
    let value = parse_int(s)?;
    if value < 1 {
        return Err(format!("must be a positive integer, got {value}"));
    }
    usize::try_from(value).map_err(|_| format!("'{s}' is out of range"))
}

/// Parse an integer that must be at least 0.
pub fn parse_non_negative_int(s: &str) -> Result<usize, String> {
    let value = parse_int(s)?;
    if value < 0 {
        return Err(format!("must be a non-negative integer, got {value}"));
    }
    usize::try_from(value).map_err(|_| format!("'{s}' is out of range"))
}

fn parse_int(s: &str) -> Result<i64, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid integer"))
}
