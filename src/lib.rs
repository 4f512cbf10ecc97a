//! A minimal real-time 3D rendering demo built on wgpu.
//!
//! The crate pairs a self-contained 3D math library (vectors, points,
//! 4x4 matrices and an orbiting look-at camera) with a small renderer
//! that spins a scene once per frame.  The math core is pure and has no
//! GPU dependency, so it stays testable and easy to embed in headless
//! tools; everything platform-facing lives in [`render`] and the binary.

pub mod camera;
pub mod math;
pub mod render;

pub use camera::{Camera, ClipPlanes, View, ViewSize};
pub use math::{
    approx_eq_f32, approx_eq_f64, deg_to_rad, rad_to_deg, Mat4, Point3, Vec2, Vec3, Vec4,
};
pub use render::{FrameUniforms, Renderer};
