//! Input sample representations

/// A sample type the estimator accepts
///
/// Implementations map one interleaved value onto the linear range the
/// filter bank works in. Floating point input is taken as-is (not clamped);
/// integer input is scaled so that the largest positive value maps to 1.0.
pub trait Sample: Copy {
    /// Linear value fed into the filter history
    fn to_linear(self) -> f64;
}

impl Sample for f64 {
    #[inline]
    fn to_linear(self) -> f64 {
        self
    }
}

impl Sample for f32 {
    #[inline]
    fn to_linear(self) -> f64 {
        f64::from(self)
    }
}

/// Divisor for 32-bit integer input (`i32::MAX`, not `2^31`)
pub const I32_SCALE: f64 = i32::MAX as f64;

impl Sample for i32 {
    #[inline]
    fn to_linear(self) -> f64 {
        f64::from(self) / I32_SCALE
    }
}
