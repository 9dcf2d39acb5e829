//! Reputation scores: raw on-chain integers and the log-compressed display
//! value centered at 25.
//!
//! The two directions are independent approximations. Legacy clients compare
//! against historical values produced by exactly these formulas, so a
//! round trip is not expected to reproduce the original raw value.

use serde_json::Value;

/// Display value of a zero (or unscored) account.
pub const DISPLAY_CENTER: f64 = 25.0;

/// Raw magnitudes below 10^9 all collapse onto the center.
const MAGNITUDE_OFFSET: f64 = 9.0;
/// Display points per order of magnitude.
const POINTS_PER_MAGNITUDE: f64 = 9.0;
/// Nudges exact powers of ten away from a truncation boundary.
const LOG_EPSILON: f64 = 0.000_000_01;

/// Converts a raw reputation into its display value, rounded to 2 decimals.
pub fn raw_to_display(raw: i64) -> f64 {
    if raw == 0 {
        return DISPLAY_CENTER;
    }
    let sign = if raw < 0 { -1.0 } else { 1.0 };
    let magnitude = log_magnitude(&raw.unsigned_abs().to_string());

    let out = (magnitude - MAGNITUDE_OFFSET).max(0.0) * sign;
    round_2(out * POINTS_PER_MAGNITUDE + DISPLAY_CENTER)
}

/// `digits - 1` plus the fractional log10 of the leading four digits.
fn log_magnitude(digits: &str) -> f64 {
    let leading: u32 = digits
        .chars()
        .take(4)
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| acc * 10 + d);
    let log = f64::from(leading.max(1)).log10() + LOG_EPSILON;
    let places = digits.len().saturating_sub(1) as f64;
    places + (log - log.trunc())
}

/// Formatting rounds on the exact binary value, half to even.
fn round_2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

/// Approximate raw value for a display score.
pub fn display_to_raw(display: f64) -> i64 {
    let exponent = (display - DISPLAY_CENTER) / POINTS_PER_MAGNITUDE + MAGNITUDE_OFFSET;
    let sign = if exponent >= 0.0 { 1.0 } else { -1.0 };
    // `as` truncates toward zero and saturates at the i64 bounds
    (sign * 10f64.powf(exponent)) as i64
}

/// [`display_to_raw`] for loosely typed input. Anything that is not a number
/// or a numeric string maps to 0.
pub fn display_to_raw_value(value: &Value) -> i64 {
    let display = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    display.map(display_to_raw).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_is_center() {
        assert_eq!(raw_to_display(0), 25.0);
    }

    #[test]
    fn test_small_raw_values_collapse_to_center() {
        assert_eq!(raw_to_display(12_345), 25.0);
        assert_eq!(raw_to_display(1_000_000_000), 25.0);
    }

    #[test]
    fn test_known_display_values() {
        assert_eq!(raw_to_display(100_000_000_000), 43.0);
        assert_eq!(raw_to_display(1_000_000_000_000_000), 79.0);
        assert_eq!(raw_to_display(3_074_400_000_000), 56.39);
        assert_eq!(raw_to_display(95_832_978_796_820), 69.83);
    }

    #[test]
    fn test_sign_symmetry_around_center() {
        for raw in [100_000_000_000_i64, 3_074_400_000_000, 95_832_978_796_820] {
            let up = raw_to_display(raw) - DISPLAY_CENTER;
            let down = raw_to_display(-raw) - DISPLAY_CENTER;
            assert!((up + down).abs() < 0.011, "raw {raw}: {up} vs {down}");
        }
        assert_eq!(raw_to_display(-100_000_000_000), 7.0);
        assert_eq!(raw_to_display(-95_832_978_796_820), -19.83);
    }

    #[test]
    fn test_extreme_raw_values_do_not_panic() {
        assert!(raw_to_display(i64::MAX) > 100.0);
        assert!(raw_to_display(i64::MIN) < -50.0);
    }

    #[test]
    fn test_display_to_raw_known_values() {
        assert_eq!(display_to_raw(25.0), 1_000_000_000);
        assert_eq!(display_to_raw(43.0), 100_000_000_000);
        assert_eq!(display_to_raw(-56.0), 1);
    }

    #[test]
    fn test_display_to_raw_negative_exponent_truncates_to_zero() {
        // sign flips but the magnitude is 10^-1
        assert_eq!(display_to_raw(-65.0), 0);
    }

    #[test]
    fn test_round_trip_is_approximate() {
        let raw = 95_832_978_796_820_i64;
        let back = display_to_raw(raw_to_display(raw));
        assert_ne!(back, raw);
        let drift = (back - raw).abs() as f64 / raw as f64;
        assert!(drift < 0.01, "drift {drift}");
    }

    #[test]
    fn test_lenient_input_defaults_to_zero() {
        assert_eq!(display_to_raw_value(&json!(25)), 1_000_000_000);
        assert_eq!(display_to_raw_value(&json!("43")), 100_000_000_000);
        assert_eq!(display_to_raw_value(&json!("not a number")), 0);
        assert_eq!(display_to_raw_value(&json!(null)), 0);
        assert_eq!(display_to_raw_value(&json!([25])), 0);
        assert_eq!(display_to_raw_value(&json!({"rep": 25})), 0);
    }
}
