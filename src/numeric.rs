//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between floating-point and integer
//! domains. They rely on debug assertions to flag unexpected overflows while
//! keeping the call-sites ergonomic.

/// Convert a finite `f64` into `f32`, asserting that it fits the target type.
#[expect(
    clippy::cast_possible_truncation,
    reason = "Callers assert that the value fits within f32 bounds."
)]
#[must_use]
pub fn expect_f32(value: f64) -> f32 {
    debug_assert!(value.is_finite(), "expected finite f64 for f32 conversion");
    debug_assert!(
        value <= f64::from(f32::MAX),
        "f64 value {value} exceeds f32::MAX"
    );
    debug_assert!(
        value >= f64::from(f32::MIN),
        "f64 value {value} is below f32::MIN"
    );
    value as f32
}

/// Replace NaN and infinities with zero.
///
/// Frame deltas come from the host platform and are not trusted.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Convert a signed velocity into the unsigned integer shown on the HUD.
///
/// The value is `|round(velocity × scale)|`, saturating at `u32::MAX`.
///
/// # Examples
/// ```
/// use roamer::numeric::speed_readout;
/// assert_eq!(speed_readout(0.8, 100.0), 80);
/// assert_eq!(speed_readout(-0.324, 100.0), 32);
/// assert_eq!(speed_readout(f32::NAN, 100.0), 0);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The rounded magnitude is validated against the u32 domain."
)]
#[must_use]
pub fn speed_readout(velocity: f32, scale: f32) -> u32 {
    let magnitude = (velocity * scale).round().abs();
    if !magnitude.is_finite() {
        return 0;
    }
    if magnitude >= u32::MAX as f32 {
        return u32::MAX;
    }
    magnitude as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0, 0)]
    #[case::forward_cap(0.8, 80)]
    #[case::rounds_to_nearest(0.4149, 41)]
    #[case::reverse(-0.32, 32)]
    fn readout_is_rounded_magnitude(#[case] velocity: f32, #[case] expected: u32) {
        assert_eq!(speed_readout(velocity, 100.0), expected);
    }

    #[rstest]
    fn readout_saturates() {
        assert_eq!(speed_readout(1.0e12, 100.0), u32::MAX);
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn non_finite_collapses_to_zero(#[case] value: f64) {
        assert_eq!(finite_or_zero(value), 0.0);
    }
}
