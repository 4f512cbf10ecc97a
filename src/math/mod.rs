//! Self-contained 3D math primitives for building view and projection
//! transforms.
//!
//! The module provides fixed-arity vectors, a position type, a 4x4 matrix
//! and the small helpers (angle conversion, epsilon comparison) the camera
//! and the demo loop need.  Everything is a plain `Copy` value type; all
//! operations are pure.
//!
//! Matrices are stored column-major (`data[col * 4 + row]`), use a
//! right-handed basis with the camera looking down -z, and target
//! OpenGL-style clip space (z in [-1, 1]).  The raw 16-float layout is
//! uploaded to the GPU as-is, matching WGSL's column-major `mat4x4<f32>`.

mod angle;
mod equal;
mod mat4;
mod point3;
mod vec2;
mod vec3;
mod vec4;

pub use angle::{deg_to_rad, rad_to_deg};
pub use equal::{approx_eq_f32, approx_eq_f64};
pub use mat4::Mat4;
pub use point3::Point3;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
