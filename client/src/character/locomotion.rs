use super::input::{ControlBindings, InputState};
use bevy::math::{Quat, Vec3};
use common::AnimationLabel;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

/// What the character wants to do this tick, derived from input alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocomotionIntent {
    /// Unit planar direction, or zero when no movement key is held.
    pub direction: Vec3,
    pub label: AnimationLabel,
    /// Facing offset relative to camera yaw; `None` when no movement key is held.
    pub direction_offset: Option<f32>,
}

impl LocomotionIntent {
    pub fn is_moving(&self) -> bool {
        self.label.is_locomotion()
    }
}

/// Camera-relative planar basis `(forward, right)` with world up as `+Y`.
///
/// A camera looking straight up or down has no planar forward; `+Z` is used.
pub fn planar_basis(camera_forward: Vec3) -> (Vec3, Vec3) {
    let mut forward = Vec3::new(camera_forward.x, 0.0, camera_forward.z).normalize_or_zero();
    if forward == Vec3::ZERO {
        forward = Vec3::Z;
    }
    let right = forward.cross(Vec3::Y);
    (forward, right)
}

pub fn compute_intent(
    input: &InputState,
    bindings: &ControlBindings,
    camera_forward: Vec3,
    toggle_run: bool,
) -> LocomotionIntent {
    let (forward, right) = planar_basis(camera_forward);

    let mut direction = Vec3::ZERO;
    if input.is_pressed(&bindings.forward) {
        direction += forward;
    }
    if input.is_pressed(&bindings.backward) {
        direction -= forward;
    }
    if input.is_pressed(&bindings.left) {
        direction -= right;
    }
    if input.is_pressed(&bindings.right) {
        direction += right;
    }

    let moving = bindings.any_direction_pressed(input);
    let label = match (moving, toggle_run) {
        (true, true) => AnimationLabel::Run,
        (true, false) => AnimationLabel::Walk,
        (false, _) => AnimationLabel::Idle,
    };

    LocomotionIntent {
        direction: direction.normalize_or_zero(),
        label,
        direction_offset: moving.then(|| direction_offset(input, bindings)),
    }
}

/// Facing offset for the eight canonical key combinations.
///
/// Forward wins over backward when both are held.
pub fn direction_offset(input: &InputState, bindings: &ControlBindings) -> f32 {
    let forward = input.is_pressed(&bindings.forward);
    let backward = input.is_pressed(&bindings.backward);
    let left = input.is_pressed(&bindings.left);
    let right = input.is_pressed(&bindings.right);

    if forward {
        if left {
            FRAC_PI_4
        } else if right {
            -FRAC_PI_4
        } else {
            0.0
        }
    } else if backward {
        if left {
            FRAC_PI_4 + FRAC_PI_2
        } else if right {
            -FRAC_PI_4 - FRAC_PI_2
        } else {
            PI
        }
    } else if left {
        FRAC_PI_2
    } else if right {
        -FRAC_PI_2
    } else {
        0.0
    }
}

/// Yaw of the camera's planar forward, measured from `+Z` towards `+X`.
pub fn camera_yaw(camera_forward: Vec3) -> f32 {
    let (forward, _) = planar_basis(camera_forward);
    forward.x.atan2(forward.z)
}

/// Rotates `current` towards `target` by at most `max_angle` radians.
pub fn rotate_towards(current: Quat, target: Quat, max_angle: f32) -> Quat {
    let angle = current.angle_between(target);
    if angle <= max_angle || angle <= f32::EPSILON {
        return target;
    }
    current.slerp(target, max_angle / angle).normalize()
}
