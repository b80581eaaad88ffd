pub mod animations;
pub mod character;
pub mod debug_overlay;
pub mod input;
pub mod scene_setup;
pub mod simulation;
pub mod visuals;

pub use animations::{
    apply_character_clip_commands, bind_character_animation_players,
    init_character_animation_library,
};
pub use character::{write_back_camera_transform, write_back_character_transform};
pub use debug_overlay::{debug_overlay_visible, draw_debug_overlay};
pub use input::{
    capture_keyboard_input, key_codes_for, orbit_camera_with_mouse, toggle_run_with_modifier,
};
pub use scene_setup::{TEST_BOX_NAME, populate_demo_scene, spawn_sandbox_scene};
pub use simulation::{
    character_position_logging_enabled, log_character_position, log_tick_reports,
    tick_sandbox_runtime,
};
pub use visuals::reconcile_scene_visuals;
