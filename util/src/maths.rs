//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of kilometers-per-hour in one meter-per-second.
pub const KMH_PER_MS: f64 = 3.6;

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Wrap an angle in degrees into the range (-180, 180].
///
/// Any finite angle is accepted, not only those within one turn of the range.
pub fn wrap_deg_180<T>(angle_deg: T) -> T
where
    T: Float
{
    let half_turn = T::from(180.0).unwrap();
    let full_turn = T::from(360.0).unwrap();

    let wrapped = half_turn - rem_euclid(half_turn - angle_deg, full_turn);

    // rem_euclid can round up to a full turn for angles just above 180
    if wrapped <= -half_turn {
        half_turn
    }
    else {
        wrapped
    }
}

/// Convert a speed in meters/second into kilometers/hour.
pub fn ms_to_kmh(speed_ms: f64) -> f64 {
    speed_ms * KMH_PER_MS
}

/// Convert a speed in kilometers/hour into meters/second.
pub fn kmh_to_ms(speed_kmh: f64) -> f64 {
    speed_kmh / KMH_PER_MS
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wrap_deg_180() {
        assert_eq!(wrap_deg_180(0f64), 0f64);
        assert_eq!(wrap_deg_180(180f64), 180f64);
        assert_eq!(wrap_deg_180(-180f64), 180f64);
        assert_eq!(wrap_deg_180(190f64), -170f64);
        assert_eq!(wrap_deg_180(-190f64), 170f64);
        assert_eq!(wrap_deg_180(358f64), -2f64);
        assert_eq!(wrap_deg_180(-358f64), 2f64);
        assert_eq!(wrap_deg_180(720f64 + 45f64), 45f64);
    }

    #[test]
    fn test_wrap_deg_180_rounding_boundary() {
        // Just above 180 the remainder rounds up to a full turn
        let just_above = f64::from_bits(180f64.to_bits() + 1);
        let wrapped = wrap_deg_180(just_above);
        assert!(wrapped > -180.0 && wrapped <= 180.0, "out of range: {}", wrapped);
        assert_eq!(wrapped, 180.0);

        let wrapped = wrap_deg_180(just_above + 360.0);
        assert!(wrapped > -180.0 && wrapped <= 180.0, "out of range: {}", wrapped);

        let just_below = f64::from_bits((-180f64).to_bits() + 1);
        let wrapped = wrap_deg_180(just_below);
        assert!(wrapped > -180.0 && wrapped <= 180.0, "out of range: {}", wrapped);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&5f64, &-1f64, &1f64), 1f64);
        assert_eq!(clamp(&-5f64, &-1f64, &1f64), -1f64);
        assert_eq!(clamp(&0.25f64, &-1f64, &1f64), 0.25f64);
    }

    #[test]
    fn test_speed_conversion() {
        assert_abs_diff_eq!(kmh_to_ms(60.0), 16.666_666, epsilon = 1e-5);
        assert_abs_diff_eq!(ms_to_kmh(kmh_to_ms(42.0)), 42.0, epsilon = 1e-12);
    }
}
