use crate::character::locomotion::camera_yaw;
use crate::character::{ClipCommandQueue, FollowCamera};
use crate::runtime::SandboxRuntime;
use crate::scene_runtime::pipeline::SandboxPipeline;
use crate::scene_runtime::state::{
    CapturedInput, CharacterAnimationLibrary, SandboxState, SandboxTickReported, VisualEntities,
};
use crate::scene_runtime::systems::{
    apply_character_clip_commands, bind_character_animation_players, capture_keyboard_input,
    character_position_logging_enabled, debug_overlay_visible, draw_debug_overlay,
    init_character_animation_library, log_character_position, log_tick_reports,
    orbit_camera_with_mouse, populate_demo_scene, reconcile_scene_visuals, spawn_sandbox_scene,
    tick_sandbox_runtime, toggle_run_with_modifier, write_back_camera_transform,
    write_back_character_transform,
};
use crate::settings::{SandboxSettings, SettingsResource};
use bevy::light::GlobalAmbientLight;
use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

/// Full sandbox: simulation plus scene, animation and overlay presentation.
pub struct SandboxPlugin {
    settings: SandboxSettings,
}

impl SandboxPlugin {
    pub fn new(settings: SandboxSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for SandboxPlugin {
    fn build(&self, app: &mut App) {
        register_sandbox_simulation(app, &self.settings);

        app.insert_resource(GlobalAmbientLight {
            color: Color::WHITE,
            brightness: 300.0,
            affects_lightmapped_meshes: true,
        })
        .add_systems(Startup, spawn_sandbox_scene)
        .add_systems(
            Update,
            (
                init_character_animation_library,
                bind_character_animation_players,
                apply_character_clip_commands,
            )
                .chain()
                .in_set(SandboxPipeline::Present)
                .run_if(resource_exists::<CharacterAnimationLibrary>),
        )
        .add_systems(
            Update,
            (
                reconcile_scene_visuals,
                write_back_character_transform,
                write_back_camera_transform,
            )
                .in_set(SandboxPipeline::Present),
        )
        .add_systems(
            EguiPrimaryContextPass,
            draw_debug_overlay.run_if(debug_overlay_visible),
        );
    }
}

/// Builds the runtime from settings and registers input capture and the
/// per-frame tick. Needs only input and time, so it runs headless.
pub fn register_sandbox_simulation(app: &mut App, settings: &SandboxSettings) {
    let config = settings.runtime_config();
    let initial_camera = FollowCamera::new(
        Vec3::from_array(settings.camera.initial_position),
        Vec3::ZERO,
    );
    let spawn = Transform::from_rotation(Quat::from_rotation_y(
        camera_yaw(initial_camera.forward()) + settings.locomotion.model_yaw_offset,
    ));

    let mut runtime = SandboxRuntime::with_defaults(ClipCommandQueue::default(), spawn, &config);
    populate_demo_scene(&mut runtime);
    if settings.debug.show_overlay_on_start {
        runtime.toggle_debug_overlay();
    }

    if !app.world().contains_resource::<SettingsResource>() {
        app.insert_resource(SettingsResource::new(settings.clone()));
    }

    app.insert_resource(SandboxState { runtime })
        .init_resource::<CapturedInput>()
        .init_resource::<VisualEntities>()
        .add_message::<SandboxTickReported>()
        .configure_sets(
            Update,
            (
                SandboxPipeline::Input,
                SandboxPipeline::Simulate,
                SandboxPipeline::Present,
            )
                .chain(),
        )
        .add_systems(
            Update,
            (
                capture_keyboard_input,
                toggle_run_with_modifier,
                orbit_camera_with_mouse,
            )
                .in_set(SandboxPipeline::Input),
        )
        .add_systems(
            Update,
            (
                tick_sandbox_runtime,
                log_tick_reports,
                log_character_position.run_if(character_position_logging_enabled),
            )
                .chain()
                .in_set(SandboxPipeline::Simulate),
        );
}
