//! Orbiting look-at camera built on the math primitives.

use crate::math::{Mat4, Point3, Vec3};

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSize {
    pub width: f32,
    pub height: f32,
}

/// Near and far clip plane distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlanes {
    pub near: f32,
    pub far: f32,
}

/// Projection frustum configuration consumed by [`Camera::new`].
///
/// The caller owns the values; the camera only requires that they satisfy
/// [`Mat4::perspective`]'s preconditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub size: ViewSize,
    pub fov_y_radians: f32,
    pub planes: ClipPlanes,
}

impl View {
    pub fn aspect(&self) -> f32 {
        self.size.width / self.size.height
    }
}

/// A camera holding an eye position, an aim point and an up vector, with
/// the projection, look-at and view-projection matrices derived from them.
///
/// `rotate` recomputes the current position from the *initial* one every
/// call, so rotation angles are absolute rather than accumulated; repeated
/// identical calls land on identical positions and no drift builds up
/// across frames.
///
/// The camera mutates in place and is not synchronized; callers sharing
/// one across threads must serialize access themselves.
#[derive(Debug, Clone)]
pub struct Camera {
    initial_position: Point3,
    current_position: Point3,
    aim_point: Point3,
    up: Vec3,

    projection_matrix: Mat4,
    look_at_matrix: Mat4,
    view_projection_matrix: Mat4,
}

impl Camera {
    /// Creates a camera at `position` aiming at `aim_point`, projecting
    /// through the frustum described by `view`.
    pub fn new(position: Point3, aim_point: Point3, up: Vec3, view: View) -> Self {
        let projection_matrix = Mat4::perspective(
            view.fov_y_radians,
            view.aspect(),
            view.planes.near,
            view.planes.far,
        );

        let mut camera = Self {
            initial_position: position,
            current_position: position,
            aim_point,
            up,
            projection_matrix,
            look_at_matrix: Mat4::identity(),
            view_projection_matrix: Mat4::identity(),
        };
        camera.update_look_at();
        camera
    }

    /// Moves the camera to the initial position rotated by `angles_radians`
    /// (composed as in [`Mat4::rotate`]) and re-derives the dependent
    /// matrices.
    ///
    /// The rotation is applied to the initial position, not the current
    /// one: calling this twice with the same angles is idempotent.
    pub fn rotate(&mut self, angles_radians: Vec3) {
        self.current_position = Mat4::rotate(angles_radians) * self.initial_position;
        self.update_look_at();
    }

    /// The current (possibly rotated) eye position.
    pub fn position(&self) -> Point3 {
        self.current_position
    }

    pub fn aim_point(&self) -> Point3 {
        self.aim_point
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn look_at_matrix(&self) -> Mat4 {
        self.look_at_matrix
    }

    /// `projection_matrix * look_at_matrix`, the transform uploaded to the
    /// GPU each frame.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    fn update_look_at(&mut self) {
        self.look_at_matrix = Mat4::look_at(self.current_position, self.aim_point, self.up);
        self.update_view_projection();
    }

    fn update_view_projection(&mut self) {
        self.view_projection_matrix = self.projection_matrix.multiply(&self.look_at_matrix);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{approx_eq_f32, deg_to_rad};
    use std::f32::consts::PI;

    fn demo_view() -> View {
        View {
            size: ViewSize {
                width: 1024.0,
                height: 768.0,
            },
            fov_y_radians: 2.0 * PI / 5.0,
            planes: ClipPlanes {
                near: 1.0,
                far: 100.0,
            },
        }
    }

    fn demo_camera() -> Camera {
        Camera::new(
            Point3::new(0.0, 0.0, 4.0),
            Point3::origin(),
            Vec3::UNIT_Y,
            demo_view(),
        )
    }

    #[test]
    fn view_projection_is_projection_times_look_at() {
        let mut camera = demo_camera();
        camera.rotate(Vec3::zero());
        assert_eq!(
            camera.view_projection_matrix(),
            camera.projection_matrix() * camera.look_at_matrix()
        );
    }

    #[test]
    fn rotating_by_zero_keeps_the_initial_position() {
        let mut camera = demo_camera();
        camera.rotate(Vec3::zero());
        assert_eq!(camera.position(), Point3::new(0.0, 0.0, 4.0));
    }

    #[test]
    fn rotation_is_absolute_not_cumulative() {
        let mut camera = demo_camera();
        let angles = Vec3::new(0.0, deg_to_rad(30.0), 0.0);

        camera.rotate(angles);
        let first = camera.position();
        camera.rotate(angles);
        let second = camera.position();

        assert_eq!(first, second);
    }

    #[test]
    fn a_quarter_turn_orbits_the_eye_into_positive_x() {
        let mut camera = demo_camera();
        camera.rotate(Vec3::new(0.0, deg_to_rad(90.0), 0.0));

        let position = camera.position();
        assert!(approx_eq_f32(position.x, 4.0));
        assert!(approx_eq_f32(position.y, 0.0));
        assert!(approx_eq_f32(position.z, 0.0));
    }

    #[test]
    fn rotation_re_derives_the_look_at_matrix() {
        let mut camera = demo_camera();
        camera.rotate(Vec3::new(0.0, deg_to_rad(45.0), 0.0));

        let expected = Mat4::look_at(camera.position(), camera.aim_point(), camera.up());
        assert_eq!(camera.look_at_matrix(), expected);
        assert_eq!(
            camera.view_projection_matrix(),
            camera.projection_matrix() * expected
        );
    }

    #[test]
    fn projection_uses_the_view_aspect() {
        let camera = demo_camera();
        let view = demo_view();
        let expected = Mat4::perspective(
            view.fov_y_radians,
            1024.0 / 768.0,
            view.planes.near,
            view.planes.far,
        );
        assert_eq!(camera.projection_matrix(), expected);
    }
}
