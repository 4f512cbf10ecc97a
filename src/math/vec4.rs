use std::ops::{Add, Div, Mul, Neg, Sub};

/// A homogeneous-capable 4-tuple.
///
/// Standalone utility; it is not wired into [`crate::math::Mat4`]
/// multiplication, which works on points and 3D vectors directly.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Dot product with another vector.
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Vector length (magnitude).
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Squared magnitude of the vector.
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Returns a unit-length copy, or the zero vector when the length is
    /// exactly zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == 0.0 {
            return Self::zero();
        }
        self / len
    }
}

impl Add for Vec4 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }
}

impl Sub for Vec4 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }
}

/// Component-wise product.
impl Mul for Vec4 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::new(
            self.x * other.x,
            self.y * other.y,
            self.z * other.z,
            self.w * other.w,
        )
    }
}

impl Mul<f32> for Vec4 {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::new(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
            self.w * scalar,
        )
    }
}

impl Div<f32> for Vec4 {
    type Output = Self;

    /// Panics when `scalar` is exactly zero.
    fn div(self, scalar: f32) -> Self {
        assert!(scalar != 0.0, "Vec4 division by zero scalar");
        self * (1.0 / scalar)
    }
}

impl Neg for Vec4 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::approx_eq_f32;

    #[test]
    fn adds_and_subtracts_componentwise() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::new(0.5, -2.0, 1.0, 2.0);
        assert_eq!(a + b, Vec4::new(1.5, 0.0, 4.0, 6.0));
        assert_eq!(a - b, Vec4::new(0.5, 4.0, 2.0, 2.0));
    }

    #[test]
    fn multiplies_by_vector_and_scalar() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(a * Vec4::new(2.0, 2.0, 2.0, 2.0), a * 2.0);
    }

    #[test]
    #[should_panic(expected = "division by zero")]
    fn division_by_zero_panics() {
        let _ = Vec4::new(1.0, 1.0, 1.0, 1.0) / 0.0;
    }

    #[test]
    fn dot_is_symmetric() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!(a.dot(b), b.dot(a));
        assert_eq!(a.dot(b), 70.0);
    }

    #[test]
    fn normalize_yields_unit_length() {
        let v = Vec4::new(1.0, -2.0, 3.0, -4.0);
        assert!(approx_eq_f32(v.normalize().length(), 1.0));
    }

    #[test]
    fn normalize_of_zero_is_zero() {
        assert_eq!(Vec4::zero().normalize(), Vec4::zero());
    }

    #[test]
    fn negation_flips_every_component() {
        assert_eq!(
            -Vec4::new(1.0, -2.0, 3.0, -4.0),
            Vec4::new(-1.0, 2.0, -3.0, 4.0)
        );
    }
}
