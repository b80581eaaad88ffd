//! One macro-tick of the sandbox: deferred tasks, character, physics,
//! reactions. Rendering reads the result afterwards.

use crate::character::{
    AnimationMixer, CameraConfig, CharacterController, ControllerConfig, FollowCamera, InputState,
};
use crate::physics::{
    BombConfig, BodyHandle, CharacterBodyConfig, DEFAULT_GRAVITY, DestroyedBody, EphemeralBody,
    PhysicsProxySync, PhysicsWorld, PropDesc, RapierWorld, ReactionEffect,
};
use crate::scene::{SceneGraph, SceneLedger};
use crate::scheduler::{DeferredTask, TaskScheduler};
use bevy::log::info;
use bevy::math::Vec3;
use bevy::transform::components::Transform;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: [f32; 3],
    /// Seconds the world advances per tick, independent of frame time.
    pub fixed_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY.to_array(),
            fixed_step: 1.0 / 60.0,
        }
    }
}

impl PhysicsConfig {
    pub fn build_world(&self) -> RapierWorld {
        RapierWorld::new(Vec3::from_array(self.gravity))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeConfig {
    pub controller: ControllerConfig,
    pub camera: CameraConfig,
    pub character_body: CharacterBodyConfig,
    pub bombs: BombConfig,
    pub physics: PhysicsConfig,
}

/// What happened during a tick, for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub planted: Vec<EphemeralBody>,
    pub destroyed: Vec<DestroyedBody>,
    /// The character became frozen this tick.
    pub froze: bool,
    pub debug_overlay_toggled: bool,
    pub jump_clip_stopped: bool,
}

impl TickReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub struct SandboxRuntime<M, W = RapierWorld, S = SceneLedger> {
    controller: CharacterController<M>,
    camera: FollowCamera,
    camera_config: CameraConfig,
    proxy: PhysicsProxySync<W, S>,
    tasks: TaskScheduler<DeferredTask>,
    physics_step: f32,
    debug_overlay: bool,
    ticks: u64,
}

impl<M: AnimationMixer> SandboxRuntime<M> {
    /// Runtime backed by a rapier world and a recording scene.
    pub fn with_defaults(mixer: M, spawn: Transform, config: &RuntimeConfig) -> Self {
        let world = config.physics.build_world();
        Self::new(mixer, spawn, config, world, SceneLedger::new())
    }
}

impl<M: AnimationMixer, W: PhysicsWorld, S: SceneGraph> SandboxRuntime<M, W, S> {
    pub fn new(mixer: M, spawn: Transform, config: &RuntimeConfig, world: W, scene: S) -> Self {
        let mut proxy = PhysicsProxySync::new(world, scene, config.bombs.clone());
        proxy.attach_character(spawn.translation, &config.character_body);

        let camera = FollowCamera::new(
            Vec3::from_array(config.camera.initial_position),
            spawn.translation,
        );

        Self {
            controller: CharacterController::new(mixer, spawn, &config.controller),
            camera,
            camera_config: config.camera.clone(),
            proxy,
            tasks: TaskScheduler::new(),
            physics_step: config.physics.fixed_step,
            debug_overlay: false,
            ticks: 0,
        }
    }

    pub fn controller(&self) -> &CharacterController<M> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut CharacterController<M> {
        &mut self.controller
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn camera_config(&self) -> &CameraConfig {
        &self.camera_config
    }

    pub fn proxy(&self) -> &PhysicsProxySync<W, S> {
        &self.proxy
    }

    pub fn proxy_mut(&mut self) -> &mut PhysicsProxySync<W, S> {
        &mut self.proxy
    }

    pub fn tasks(&self) -> &TaskScheduler<DeferredTask> {
        &self.tasks
    }

    pub fn character_body(&self) -> Option<BodyHandle> {
        self.proxy.character_body()
    }

    pub fn debug_overlay(&self) -> bool {
        self.debug_overlay
    }

    pub fn toggle_debug_overlay(&mut self) {
        self.debug_overlay = !self.debug_overlay;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn spawn_prop(&mut self, desc: PropDesc) -> BodyHandle {
        self.proxy.spawn_prop(desc)
    }

    pub fn switch_run_toggle(&mut self) {
        self.controller.switch_run_toggle();
    }

    pub fn orbit_camera(&mut self, yaw_delta: f32, pitch_delta: f32, zoom_delta: f32) {
        self.camera
            .orbit(yaw_delta, pitch_delta, zoom_delta, &self.camera_config);
    }

    pub fn tick(&mut self, dt: f32, input: &InputState) -> TickReport {
        let mut report = TickReport::default();
        self.ticks += 1;

        for task in self.tasks.advance(dt) {
            match task {
                DeferredTask::StopJumpClip => {
                    report.jump_clip_stopped |= self.controller.on_jump_clip_timer();
                }
                DeferredTask::DestroyBody(body) => {
                    if let Some(destroyed) = self.proxy.destroy_body(body, &mut self.tasks) {
                        report.destroyed.push(destroyed);
                    }
                }
            }
        }

        let triggers = self
            .controller
            .update(dt, input, &mut self.camera, &mut self.tasks);
        if triggers.toggle_debug_overlay {
            self.toggle_debug_overlay();
            report.debug_overlay_toggled = true;
        }
        if triggers.plant_bomb {
            let bomb = self.proxy.plant_bomb(
                self.controller.transform().translation,
                self.controller.facing(),
                &mut self.tasks,
            );
            report.planted.push(bomb);
        }

        self.proxy.sync(self.controller.transform());
        let events = self.proxy.step(self.physics_step);
        self.proxy.mirror_dynamic_bodies();

        for effect in self.proxy.resolve(&events) {
            match effect {
                ReactionEffect::FreezeCharacter => {
                    if self.controller.freeze() {
                        info!("Character frozen by collision");
                        report.froze = true;
                    }
                }
                ReactionEffect::Delete { body, delay } => {
                    self.tasks.schedule(delay, DeferredTask::DestroyBody(body));
                }
            }
        }

        report
    }
}
