use bevy::math::Vec3;
use bevy::transform::components::Transform;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Height above the character's feet the camera looks at.
pub const LOOK_HEIGHT: f32 = 1.0;

const MIN_POLAR_ANGLE: f32 = 0.01;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub initial_position: [f32; 3],
    pub min_distance: f32,
    pub max_distance: f32,
    /// Keeps the camera above the ground plane.
    pub max_polar_angle: f32,
    pub orbit_sensitivity: f32,
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            initial_position: [0.0, 5.0, 5.0],
            min_distance: 5.0,
            max_distance: 15.0,
            max_polar_angle: FRAC_PI_2 - 0.05,
            orbit_sensitivity: 0.005,
            zoom_step: 1.0,
        }
    }
}

/// Third-person camera that trails the character.
///
/// The look target sits [`LOOK_HEIGHT`] above the character; the camera body
/// follows planar movement only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowCamera {
    pub position: Vec3,
    pub look_target: Vec3,
}

impl FollowCamera {
    pub fn new(position: Vec3, subject: Vec3) -> Self {
        Self {
            position,
            look_target: subject + Vec3::Y * LOOK_HEIGHT,
        }
    }

    /// World-space view direction; zero if the camera sits on its target.
    pub fn forward(&self) -> Vec3 {
        (self.look_target - self.position).normalize_or_zero()
    }

    pub fn follow(&mut self, subject: Vec3, planar_delta: Vec3) {
        self.position.x += planar_delta.x;
        self.position.z += planar_delta.z;
        self.look_target = subject + Vec3::Y * LOOK_HEIGHT;
    }

    /// Orbits around the look target, clamping distance and polar angle.
    pub fn orbit(
        &mut self,
        yaw_delta: f32,
        pitch_delta: f32,
        zoom_delta: f32,
        config: &CameraConfig,
    ) {
        let offset = self.position - self.look_target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let polar = (offset.y / radius).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);

        let azimuth = azimuth + yaw_delta;
        let polar = (polar + pitch_delta).clamp(MIN_POLAR_ANGLE, config.max_polar_angle);
        let radius = (radius + zoom_delta).clamp(config.min_distance, config.max_distance);

        let offset = Vec3::new(
            polar.sin() * azimuth.sin(),
            polar.cos(),
            polar.sin() * azimuth.cos(),
        ) * radius;
        self.position = self.look_target + offset;
    }

    pub fn transform(&self) -> Transform {
        let transform = Transform::from_translation(self.position);
        if self.forward() == Vec3::ZERO {
            return transform;
        }
        transform.looking_at(self.look_target, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn follow_moves_planar_only() {
        let mut camera = FollowCamera::new(Vec3::new(0.0, 5.0, 5.0), Vec3::ZERO);
        camera.follow(Vec3::new(1.0, 2.0, -1.0), Vec3::new(1.0, 2.0, -1.0));

        assert_eq!(camera.position, Vec3::new(1.0, 5.0, 4.0));
        assert_eq!(camera.look_target, Vec3::new(1.0, 3.0, -1.0));
    }

    #[test]
    fn forward_points_at_the_look_target() {
        let camera = FollowCamera::new(Vec3::new(0.0, 1.0, -5.0), Vec3::ZERO);
        assert!((camera.forward() - Vec3::Z).length() < EPSILON);
    }

    #[test]
    fn orbit_clamps_distance_and_polar_angle() {
        let config = CameraConfig::default();
        let mut camera = FollowCamera::new(Vec3::new(0.0, 5.0, 5.0), Vec3::ZERO);

        camera.orbit(0.0, 10.0, 100.0, &config);
        let offset = camera.position - camera.look_target;
        assert!((offset.length() - config.max_distance).abs() < EPSILON);
        assert!(offset.y > 0.0);

        camera.orbit(0.0, 0.0, -100.0, &config);
        let offset = camera.position - camera.look_target;
        assert!((offset.length() - config.min_distance).abs() < EPSILON);
    }

    #[test]
    fn orbit_yaw_keeps_height() {
        let config = CameraConfig::default();
        let mut camera = FollowCamera::new(Vec3::new(0.0, 5.0, 5.0), Vec3::ZERO);
        let height = camera.position.y;

        camera.orbit(1.0, 0.0, 0.0, &config);
        assert!((camera.position.y - height).abs() < EPSILON);
    }
}
