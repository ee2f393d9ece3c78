//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

/// Parse and validate a probability-like value (0.0-1.0).
pub fn parse_probability(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(format!("value must be between 0.0 and 1.0, got {value}"));
    }

    Ok(value)
}

/// Parse a finite float greater than zero.
pub fn parse_positive_float(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("value must be greater than 0, got {value}"));
    }

    Ok(value)
}

/// Parse an integer of at least one.
pub fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid whole number"))?;

    if value == 0 {
        return Err("value must be at least 1".to_string());
    }

    Ok(value)
}
