// Fixed viewing camera for the tank.
//
// Camera model:
//   - Eye placed in front of and slightly above the tank
//   - Looks at a point a little below eye height, near the tank centre
//   - Only the aspect ratio changes at runtime (window resize)

use glam::{Mat4, Vec3};

use super::config::AquariumConfig;

pub struct TankCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl TankCamera {
    pub fn new(eye: Vec3, target: Vec3, fov_degrees: f32) -> Self {
        Self {
            eye,
            target,
            up: Vec3::Y,
            fov: fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn from_config(config: &AquariumConfig) -> Self {
        Self::new(config.camera_eye, config.camera_target, config.camera_fov_degrees)
    }

    /// View matrix: looks from the eye toward the target.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Perspective projection matrix (wgpu depth range 0..1).
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

/// Width / height, guarded against a minimised (zero-height) window.
pub fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 { 1.0 } else { width as f32 / height as f32 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_is_in_front_of_eye() {
        let camera = TankCamera::from_config(&AquariumConfig::default());
        let view_target = camera.view_matrix().transform_point3(camera.target);
        // Right-handed view space looks down -Z.
        assert!(view_target.z < 0.0);
        assert!(view_target.x.abs() < 1e-5);
    }

    #[test]
    fn test_tank_centre_projects_on_screen() {
        let camera = TankCamera::from_config(&AquariumConfig::default());
        let clip = camera.projection_matrix(aspect_ratio(800, 600))
            * camera.view_matrix()
            * Vec3::new(0.0, 5.0, 0.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn test_aspect_ratio_guards_zero_height() {
        assert_eq!(aspect_ratio(800, 0), 1.0);
        assert!((aspect_ratio(800, 600) - 4.0 / 3.0).abs() < 1e-6);
    }
}
