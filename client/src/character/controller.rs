use super::animation::{AnimationMixer, AnimationStateMachine};
use super::camera::FollowCamera;
use super::config::{LocomotionConfig, VerticalConfig};
use super::input::{ControlBindings, EdgeTrigger, InputState};
use super::locomotion::{camera_yaw, compute_intent, rotate_towards};
use super::vertical::{GROUND_HEIGHT, VerticalMotionModel, VerticalState};
use crate::scheduler::{DeferredTask, TaskScheduler};
use bevy::math::{Quat, Vec3};
use bevy::transform::components::Transform;
use common::AnimationLabel;
use std::time::Duration;

/// Tuning and bindings the controller is built from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerConfig {
    pub bindings: ControlBindings,
    pub locomotion: LocomotionConfig,
    pub vertical: VerticalConfig,
}

/// One-shot actions requested during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickTriggers {
    pub toggle_debug_overlay: bool,
    pub plant_bomb: bool,
}

/// Keyboard-driven third-person character.
///
/// Owns the character transform; physics and rendering only read it.
pub struct CharacterController<M> {
    transform: Transform,
    vertical: VerticalState,
    animation: AnimationStateMachine<M>,
    vertical_model: VerticalMotionModel,
    locomotion: LocomotionConfig,
    bindings: ControlBindings,
    jump_clip_stop_delay: Duration,
    toggle_run: bool,
    frozen: bool,
    debug_overlay_trigger: EdgeTrigger,
    plant_trigger: EdgeTrigger,
}

impl<M: AnimationMixer> CharacterController<M> {
    pub fn new(mixer: M, transform: Transform, config: &ControllerConfig) -> Self {
        let fade = Duration::try_from_secs_f32(config.locomotion.fade_duration)
            .unwrap_or(Duration::ZERO);
        let jump_clip_stop_delay = Duration::try_from_secs_f32(config.vertical.jump_clip_stop_delay)
            .unwrap_or(Duration::ZERO);

        Self {
            transform,
            vertical: VerticalState::default(),
            animation: AnimationStateMachine::new(mixer, AnimationLabel::Idle, fade),
            vertical_model: VerticalMotionModel::new(&config.vertical),
            locomotion: config.locomotion.clone(),
            bindings: config.bindings.clone().normalized(),
            jump_clip_stop_delay,
            toggle_run: config.locomotion.run_by_default,
            frozen: false,
            debug_overlay_trigger: EdgeTrigger::default(),
            plant_trigger: EdgeTrigger::default(),
        }
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn vertical_state(&self) -> VerticalState {
        self.vertical
    }

    pub fn current_label(&self) -> AnimationLabel {
        self.animation.current()
    }

    pub fn animation(&self) -> &AnimationStateMachine<M> {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut AnimationStateMachine<M> {
        &mut self.animation
    }

    /// Horizontal direction the character walks when facing forward, with
    /// the model yaw offset taken back out.
    pub fn facing(&self) -> Vec3 {
        let model = Quat::from_rotation_y(-self.locomotion.model_yaw_offset);
        (self.transform.rotation * model * Vec3::Z)
            .with_y(0.0)
            .normalize_or_zero()
    }

    pub fn bindings(&self) -> &ControlBindings {
        &self.bindings
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn toggle_run(&self) -> bool {
        self.toggle_run
    }

    pub fn switch_run_toggle(&mut self) {
        self.toggle_run = !self.toggle_run;
    }

    /// Stops all further updates. Returns `false` if already frozen.
    pub fn freeze(&mut self) -> bool {
        if self.frozen {
            return false;
        }
        self.frozen = true;
        true
    }

    /// Advances the character by one tick.
    ///
    /// While frozen nothing changes, including the animation clock.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputState,
        camera: &mut FollowCamera,
        tasks: &mut TaskScheduler<DeferredTask>,
    ) -> TickTriggers {
        if self.frozen {
            return TickTriggers::default();
        }

        let camera_forward = camera.forward();
        let intent = compute_intent(input, &self.bindings, camera_forward, self.toggle_run);

        self.animation.drive(intent.label);
        self.animation.advance(dt);

        let mut planar_delta = Vec3::ZERO;
        if intent.is_moving() {
            if let Some(offset) = intent.direction_offset {
                let yaw = camera_yaw(camera_forward) + offset + self.locomotion.model_yaw_offset;
                self.transform.rotation = rotate_towards(
                    self.transform.rotation,
                    Quat::from_rotation_y(yaw),
                    self.locomotion.max_turn_step,
                );
            }

            planar_delta = intent.direction * self.locomotion.velocity_for(intent.label) * dt;
            self.transform.translation += planar_delta;
        }
        camera.follow(self.transform.translation, planar_delta);

        let jump_requested = input.is_pressed(&self.bindings.jump);
        let step = self.vertical_model.integrate(
            self.vertical,
            self.transform.translation.y,
            dt,
            jump_requested,
        );
        self.vertical = step.state;
        self.transform.translation.y = step.y;
        camera.follow(self.transform.translation, Vec3::ZERO);

        if step.jumped {
            self.animation.start_jump_overlay();
        }
        if step.landed {
            tasks.schedule(self.jump_clip_stop_delay, DeferredTask::StopJumpClip);
        }

        TickTriggers {
            toggle_debug_overlay: self
                .debug_overlay_trigger
                .update(input.is_pressed(&self.bindings.debug_overlay)),
            plant_bomb: self.plant_trigger.update(input.is_pressed(&self.bindings.plant)),
        }
    }

    /// Deferred landing check; stops the jump clip only if still grounded.
    pub fn on_jump_clip_timer(&mut self) -> bool {
        if !self.vertical.grounded || self.transform.translation.y > GROUND_HEIGHT {
            return false;
        }
        self.animation.stop_jump_overlay()
    }
}
