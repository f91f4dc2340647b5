//! Grid animation and camera matrices

use glam::{Mat4, Vec3};
use msaa_core::TargetExtent;

use crate::config::SceneConfig;
use crate::constants::camera;

/// Rotation state of the cube grid
#[derive(Debug, Clone, PartialEq)]
pub struct SceneAnimation {
    /// Whether the grid rotates
    pub rotate: bool,
    /// Rotation speed (radians per second)
    pub rotation_speed: f32,
    time: f32,
}

impl SceneAnimation {
    /// Create an animation from scene settings
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            rotate: config.rotate,
            rotation_speed: config.rotation_speed,
            time: 0.0,
        }
    }

    /// Accumulated rotation time (seconds)
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance by `dt` seconds. Time only accumulates while rotating.
    pub fn advance(&mut self, dt: f32) {
        if self.rotate {
            self.time += dt;
        }
    }

    /// Grid rotation about Z
    pub fn world(&self) -> Mat4 {
        Mat4::from_rotation_z(self.time * self.rotation_speed)
    }
}

/// Projection * view * world for a camera looking down -Z at the grid
pub fn view_projection(extent: TargetExtent, world: Mat4) -> Mat4 {
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, camera::DISTANCE), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(
        camera::FOV_Y,
        extent.aspect(),
        camera::NEAR_PLANE,
        camera::FAR_PLANE,
    );
    proj * view * world
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;

    #[test]
    fn test_advance_only_while_rotating() {
        let mut animation = SceneAnimation::new(&SceneConfig::default());
        animation.advance(0.5);
        assert_eq!(animation.time(), 0.5);

        animation.rotate = false;
        animation.advance(1.0);
        assert_eq!(animation.time(), 0.5);
    }

    #[test]
    fn test_world_rotation() {
        let mut animation = SceneAnimation::new(&SceneConfig {
            rotation_speed: 1.0,
            ..Default::default()
        });
        animation.advance(std::f32::consts::FRAC_PI_2);
        let p = animation.world().transform_point3(Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let m = view_projection(TargetExtent::new(1280, 720), Mat4::IDENTITY);
        let clip = m * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_grid_corner_visible() {
        let m = view_projection(TargetExtent::new(1280, 720), Mat4::IDENTITY);
        let clip = m * Vec4::new(10.0, 10.0, 1.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1.0);
        assert!(ndc.y.abs() < 1.0);
    }

    #[test]
    fn test_zero_extent_projection_finite() {
        let m = view_projection(TargetExtent::new(0, 0), Mat4::IDENTITY);
        assert!(m.is_finite());
    }
}
