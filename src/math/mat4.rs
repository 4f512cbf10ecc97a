use std::f32::consts::PI;
use std::ops::Mul;

use crate::math::{approx_eq_f32, Point3, Vec3};

/// A 4x4 transform matrix stored column-major (`data[col * 4 + row]`).
///
/// Conventions, applied uniformly across every constructor:
/// right-handed basis, camera looking down -z, OpenGL-style clip space
/// with z in [-1, 1].  The 16-float backing store is the exact byte layout
/// uploaded into GPU uniform buffers, matching WGSL's column-major
/// `mat4x4<f32>`.
///
/// The public constructors only produce valid affine or projective
/// transforms; [`Mat4::set`] is the one deliberate escape hatch past that
/// guarantee.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [f32; 16],
}

impl Mat4 {
    /// Returns the multiplicative identity.
    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, 0.0, // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Builds the view matrix for `eye` looking at `centre` with `up`.
    ///
    /// The rotation part holds the orthonormal basis as rows and the last
    /// column carries `-dot(axis, eye)` per axis, placing the camera at the
    /// origin looking down -z.  When `up` is parallel to `eye - centre` the
    /// x basis vector degenerates to zero; the result is deterministic but
    /// geometrically meaningless, and avoiding that input is the caller's
    /// responsibility.
    pub fn look_at(eye: Point3, centre: Point3, up: Vec3) -> Self {
        let z = (eye - centre).normalize();
        let x = up.cross(z).normalize();
        let y = z.cross(x).normalize();

        let eye_vec = eye - Point3::origin();
        let tx = -x.dot(eye_vec);
        let ty = -y.dot(eye_vec);
        let tz = -z.dot(eye_vec);

        Self {
            data: [
                x.x, y.x, z.x, 0.0, // col 0
                x.y, y.y, z.y, 0.0, // col 1
                x.z, y.z, z.z, 0.0, // col 2
                tx, ty, tz, 1.0, // col 3
            ],
        }
    }

    /// Builds a perspective projection from a vertical field of view, an
    /// aspect ratio and the near/far clip planes.
    ///
    /// Panics unless `0 < fov_y_radians < pi`, `aspect > 0` and
    /// `0 < near < far`.
    pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Self {
        assert!(
            fov_y_radians > 0.0 && fov_y_radians < PI,
            "perspective fov_y_radians outside (0, pi)"
        );
        assert!(aspect > 0.0, "perspective aspect not positive");
        assert!(near > 0.0, "perspective near plane not positive");
        assert!(near < far, "perspective near plane not before far plane");

        let tan_half_fov_y = 1.0 / (fov_y_radians / 2.0).tan();
        let nf = 1.0 / (near - far);

        Self {
            data: [
                tan_half_fov_y / aspect, 0.0, 0.0, 0.0, // col 0
                0.0, tan_half_fov_y, 0.0, 0.0, // col 1
                0.0, 0.0, (far + near) * nf, -1.0, // col 2
                0.0, 0.0, 2.0 * far * near * nf, 0.0, // col 3
            ],
        }
    }

    /// Returns the rotation around the X axis by `angle_radians`.
    pub fn rotate_x(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self {
            data: [
                1.0, 0.0, 0.0, 0.0, // col 0
                0.0, c, s, 0.0, // col 1
                0.0, -s, c, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Returns the rotation around the Y axis by `angle_radians`.
    pub fn rotate_y(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self {
            data: [
                c, 0.0, -s, 0.0, // col 0
                0.0, 1.0, 0.0, 0.0, // col 1
                s, 0.0, c, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Returns the rotation around the Z axis by `angle_radians`.
    pub fn rotate_z(angle_radians: f32) -> Self {
        let (s, c) = angle_radians.sin_cos();
        Self {
            data: [
                c, s, 0.0, 0.0, // col 0
                -s, c, 0.0, 0.0, // col 1
                0.0, 0.0, 1.0, 0.0, // col 2
                0.0, 0.0, 0.0, 1.0, // col 3
            ],
        }
    }

    /// Returns the combined rotation for the three axis angles, composed as
    /// `rotate_x(x) * rotate_y(y) * rotate_z(z)`.
    ///
    /// Applied to a point or vector, the Z rotation acts first and the X
    /// rotation last.  The order is part of the contract; rotations do not
    /// commute.
    pub fn rotate(angles_radians: Vec3) -> Self {
        Self::rotate_x(angles_radians.x)
            * Self::rotate_y(angles_radians.y)
            * Self::rotate_z(angles_radians.z)
    }

    /// Returns the translation by `v`.
    pub fn translate(v: Vec3) -> Self {
        let mut m = Self::identity();
        m.data[12] = v.x;
        m.data[13] = v.y;
        m.data[14] = v.z;
        m
    }

    /// Returns the non-uniform scale by `(x, y, z)`.
    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.data[0] = x;
        m.data[5] = y;
        m.data[10] = z;
        m
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        let d = &self.data;
        Self {
            data: [
                d[0], d[4], d[8], d[12], // col 0
                d[1], d[5], d[9], d[13], // col 1
                d[2], d[6], d[10], d[14], // col 2
                d[3], d[7], d[11], d[15], // col 3
            ],
        }
    }

    /// Returns `self * rhs` (standard row-by-column composition).
    pub fn multiply(&self, rhs: &Self) -> Self {
        let mut out = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.at(row, k) * rhs.at(k, col);
                }
                out[col * 4 + row] = sum;
            }
        }
        Self { data: out }
    }

    /// Applies the full homogeneous transform to a position (`w = 1`).
    ///
    /// When the resulting `w` is approximately 1 the components are
    /// returned directly; otherwise they are divided by `w` (the
    /// perspective divide).  A `w` near zero is not special-cased and
    /// yields infinite or NaN components, an accepted degenerate outcome.
    pub fn transform_point(&self, p: Point3) -> Point3 {
        let x = self.at(0, 0) * p.x + self.at(0, 1) * p.y + self.at(0, 2) * p.z + self.at(0, 3);
        let y = self.at(1, 0) * p.x + self.at(1, 1) * p.y + self.at(1, 2) * p.z + self.at(1, 3);
        let z = self.at(2, 0) * p.x + self.at(2, 1) * p.y + self.at(2, 2) * p.z + self.at(2, 3);
        let w = self.at(3, 0) * p.x + self.at(3, 1) * p.y + self.at(3, 2) * p.z + self.at(3, 3);

        if approx_eq_f32(w, 1.0) {
            return Point3::new(x, y, z);
        }

        let inv = 1.0 / w;
        Point3::new(x * inv, y * inv, z * inv)
    }

    /// Applies the rotation/scale part to a direction (`w = 0`): no
    /// translation, no divide.
    pub fn transform_vector(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.at(0, 0) * v.x + self.at(0, 1) * v.y + self.at(0, 2) * v.z,
            self.at(1, 0) * v.x + self.at(1, 1) * v.y + self.at(1, 2) * v.z,
            self.at(2, 0) * v.x + self.at(2, 1) * v.y + self.at(2, 2) * v.z,
        )
    }

    /// Returns the raw element at `idx` in storage order.
    pub fn get(&self, idx: usize) -> f32 {
        self.data[idx]
    }

    /// Sets the raw element at `idx` in storage order.
    ///
    /// Unchecked escape hatch: this can produce matrices no public
    /// constructor would, and nothing re-validates them.  Meant for tests
    /// and flat-buffer interchange.
    pub fn set(&mut self, idx: usize, val: f32) {
        self.data[idx] = val;
    }

    /// Returns the 16 elements in storage order (column-major), the layout
    /// copied byte-for-byte into GPU uniform buffers.
    pub fn to_array(self) -> [f32; 16] {
        self.data
    }

    fn at(&self, row: usize, col: usize) -> f32 {
        self.data[col * 4 + row]
    }
}

impl From<[f32; 16]> for Mat4 {
    fn from(data: [f32; 16]) -> Self {
        Self { data }
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.multiply(&rhs)
    }
}

impl Mul<Point3> for Mat4 {
    type Output = Point3;

    fn mul(self, p: Point3) -> Point3 {
        self.transform_point(p)
    }
}

impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        self.transform_vector(v)
    }
}
