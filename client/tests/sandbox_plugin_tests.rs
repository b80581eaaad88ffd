use bevy::input::InputPlugin;
use bevy::prelude::*;
use common::AnimationLabel;
use sandbox_client::scene_runtime::registration::register_sandbox_simulation;
use sandbox_client::scene_runtime::state::{CapturedInput, SandboxState};
use sandbox_client::scene_runtime::systems::TEST_BOX_NAME;
use sandbox_client::settings::{SandboxSettings, SettingsResource};

fn headless_app(settings: SandboxSettings) -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, InputPlugin));
    register_sandbox_simulation(&mut app, &settings);
    app
}

fn press(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
}

fn release(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .release(key);
}

#[test]
fn registration_builds_runtime_with_demo_props() {
    let mut app = headless_app(SandboxSettings::default());
    app.update();

    assert!(app.world().contains_resource::<SettingsResource>());
    assert!(app.world().contains_resource::<CapturedInput>());

    let state = app.world().resource::<SandboxState>();
    let names: Vec<_> = state
        .runtime
        .proxy()
        .props()
        .map(|prop| prop.name.as_str())
        .collect();
    assert_eq!(names, vec![TEST_BOX_NAME]);
    assert!(state.runtime.character_body().is_some());
    assert_eq!(state.runtime.ticks(), 1);
}

#[test]
fn plant_key_spawns_one_bomb_per_press() {
    let mut app = headless_app(SandboxSettings::default());
    app.update();

    press(&mut app, KeyCode::KeyJ);
    app.update();
    app.update();
    assert_eq!(
        app.world()
            .resource::<SandboxState>()
            .runtime
            .proxy()
            .ephemerals()
            .count(),
        1
    );

    release(&mut app, KeyCode::KeyJ);
    app.update();
    press(&mut app, KeyCode::KeyJ);
    app.update();
    assert_eq!(
        app.world()
            .resource::<SandboxState>()
            .runtime
            .proxy()
            .ephemerals()
            .count(),
        2
    );
}

#[test]
fn debug_key_toggles_overlay_and_start_flag_is_honored() {
    let mut settings = SandboxSettings::default();
    settings.debug.show_overlay_on_start = true;
    let mut app = headless_app(settings);
    app.update();
    assert!(app.world().resource::<SandboxState>().runtime.debug_overlay());

    press(&mut app, KeyCode::Digit9);
    app.update();
    assert!(!app.world().resource::<SandboxState>().runtime.debug_overlay());
}

#[test]
fn captured_input_tracks_bound_keys() {
    let mut app = headless_app(SandboxSettings::default());
    press(&mut app, KeyCode::KeyW);
    press(&mut app, KeyCode::ShiftLeft);
    app.update();

    let input = &app.world().resource::<CapturedInput>().0;
    assert!(input.is_pressed("w"));
    assert!(input.is_pressed("shift"));
    assert!(!input.is_pressed("s"));
}

#[test]
fn existing_settings_resource_is_kept() {
    let mut settings = SandboxSettings::default();
    settings.window.title = "custom".to_string();

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, InputPlugin))
        .insert_resource(SettingsResource::new(settings.clone()));
    register_sandbox_simulation(&mut app, &SandboxSettings::default());

    assert_eq!(
        app.world().resource::<SettingsResource>().current.window.title,
        "custom"
    );
}

#[test]
fn clip_requests_stay_bounded_without_animation_players() {
    let mut app = headless_app(SandboxSettings::default());

    for frame in 0..200 {
        if frame % 2 == 0 {
            press(&mut app, KeyCode::KeyW);
        } else {
            release(&mut app, KeyCode::KeyW);
        }
        app.update();
    }

    let commands = app
        .world()
        .resource::<SandboxState>()
        .runtime
        .controller()
        .animation()
        .mixer()
        .commands()
        .len();
    assert!(commands <= AnimationLabel::ALL.len(), "{commands} queued");
}
