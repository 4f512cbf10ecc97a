const F32_EPSILON: f32 = 1e-5;
const F64_EPSILON: f64 = 1e-5;

/// Returns true when `left` and `right` differ by less than a fixed
/// epsilon of `1e-5`.
///
/// This is an absolute-tolerance comparison, not a ULP-based one; it is
/// unsuitable for very large magnitudes where `1e-5` is below the float
/// spacing.
pub fn approx_eq_f32(left: f32, right: f32) -> bool {
    (left - right).abs() < F32_EPSILON
}

/// Double-width variant of [`approx_eq_f32`] with the same `1e-5` epsilon.
pub fn approx_eq_f64(left: f64, right: f64) -> bool {
    (left - right).abs() < F64_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_values_are_equal() {
        assert!(approx_eq_f32(2.0, 2.0));
        assert!(approx_eq_f64(2.0, 2.0));
    }

    #[test]
    fn distant_values_are_not_equal() {
        assert!(!approx_eq_f32(2.3, 3.4));
        assert!(!approx_eq_f64(2.3, 3.4));
    }

    #[test]
    fn differences_inside_the_epsilon_are_equal() {
        assert!(approx_eq_f32(1.0, 1.000001));
        assert!(approx_eq_f64(1.0, 1.000001));
    }

    #[test]
    fn the_epsilon_itself_is_not_inside() {
        assert!(!approx_eq_f32(1.0, 1.00002));
    }
}
