use std::f32::consts::PI;

const PI_BY_180: f32 = PI / 180.0;
const K180_BY_PI: f32 = 180.0 / PI;

/// Converts degrees to radians.
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * PI_BY_180
}

/// Converts radians to degrees.
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * K180_BY_PI
}
