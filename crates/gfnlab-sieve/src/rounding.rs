//! Decimal rounding.

/// Round `value` to `places` decimal places.
///
/// Rounds the exact binary value, so `2.675` (stored as 2.67499…) becomes
/// `2.67`; exact ties go to the even digit (`0.125` → `0.12`).
/// Non-finite values are returned unchanged.
pub fn round_dp(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    // Float formatting is correctly rounded, so re-parsing it cannot fail.
    format!("{value:.places$}").parse().unwrap_or(value)
}

/// Round to the two places used throughout the GFN report.
pub fn round2(value: f64) -> f64 {
    round_dp(value, 2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_basic() {
        assert_eq!(round2(45.3), 45.3);
        assert_eq!(round2(33.333333), 33.33);
        assert_eq!(round2(66.666666), 66.67);
        assert_eq!(round2(4530.0), 4530.0);
    }

    #[test]
    fn test_round_uses_binary_value() {
        // 2.675 is 2.67499999... in binary
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(1.005), 1.0);
    }

    #[test]
    fn test_exact_ties_go_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round_dp(2.5, 0), 2.0);
        assert_eq!(round_dp(3.5, 0), 4.0);
    }

    #[test]
    fn test_negative_and_non_finite() {
        assert_eq!(round2(-12.3456), -12.35);
        assert!(round2(f64::NAN).is_nan());
        assert_eq!(round2(f64::INFINITY), f64::INFINITY);
    }
}
