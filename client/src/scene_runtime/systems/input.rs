use crate::scene_runtime::state::{CapturedInput, SandboxState};
use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

/// Physical keys a binding name refers to. Names are the lower-case key
/// labels used in the settings file (`w`, `shift`, `space`, `9`, ...).
pub fn key_codes_for(name: &str) -> &'static [KeyCode] {
    match name {
        "a" => &[KeyCode::KeyA],
        "b" => &[KeyCode::KeyB],
        "c" => &[KeyCode::KeyC],
        "d" => &[KeyCode::KeyD],
        "e" => &[KeyCode::KeyE],
        "f" => &[KeyCode::KeyF],
        "g" => &[KeyCode::KeyG],
        "h" => &[KeyCode::KeyH],
        "i" => &[KeyCode::KeyI],
        "j" => &[KeyCode::KeyJ],
        "k" => &[KeyCode::KeyK],
        "l" => &[KeyCode::KeyL],
        "m" => &[KeyCode::KeyM],
        "n" => &[KeyCode::KeyN],
        "o" => &[KeyCode::KeyO],
        "p" => &[KeyCode::KeyP],
        "q" => &[KeyCode::KeyQ],
        "r" => &[KeyCode::KeyR],
        "s" => &[KeyCode::KeyS],
        "t" => &[KeyCode::KeyT],
        "u" => &[KeyCode::KeyU],
        "v" => &[KeyCode::KeyV],
        "w" => &[KeyCode::KeyW],
        "x" => &[KeyCode::KeyX],
        "y" => &[KeyCode::KeyY],
        "z" => &[KeyCode::KeyZ],
        "0" => &[KeyCode::Digit0, KeyCode::Numpad0],
        "1" => &[KeyCode::Digit1, KeyCode::Numpad1],
        "2" => &[KeyCode::Digit2, KeyCode::Numpad2],
        "3" => &[KeyCode::Digit3, KeyCode::Numpad3],
        "4" => &[KeyCode::Digit4, KeyCode::Numpad4],
        "5" => &[KeyCode::Digit5, KeyCode::Numpad5],
        "6" => &[KeyCode::Digit6, KeyCode::Numpad6],
        "7" => &[KeyCode::Digit7, KeyCode::Numpad7],
        "8" => &[KeyCode::Digit8, KeyCode::Numpad8],
        "9" => &[KeyCode::Digit9, KeyCode::Numpad9],
        "space" | " " => &[KeyCode::Space],
        "shift" => &[KeyCode::ShiftLeft, KeyCode::ShiftRight],
        "control" | "ctrl" => &[KeyCode::ControlLeft, KeyCode::ControlRight],
        "alt" => &[KeyCode::AltLeft, KeyCode::AltRight],
        "enter" => &[KeyCode::Enter, KeyCode::NumpadEnter],
        "tab" => &[KeyCode::Tab],
        "escape" => &[KeyCode::Escape],
        "arrowup" => &[KeyCode::ArrowUp],
        "arrowdown" => &[KeyCode::ArrowDown],
        "arrowleft" => &[KeyCode::ArrowLeft],
        "arrowright" => &[KeyCode::ArrowRight],
        _ => &[],
    }
}

fn any_pressed(keys: &ButtonInput<KeyCode>, name: &str) -> bool {
    keys.any_pressed(key_codes_for(name).iter().copied())
}

fn any_just_pressed(keys: &ButtonInput<KeyCode>, name: &str) -> bool {
    keys.any_just_pressed(key_codes_for(name).iter().copied())
}

/// Copies the bound keys into the input snapshot read by the runtime.
pub fn capture_keyboard_input(
    keys: Res<ButtonInput<KeyCode>>,
    state: Res<SandboxState>,
    mut input: ResMut<CapturedInput>,
) {
    let bindings = state.runtime.controller().bindings();
    for name in bindings.all() {
        input.0.set(name, any_pressed(&keys, name));
    }
}

/// Flips walk/run on each press of the run-toggle key, frozen or not.
pub fn toggle_run_with_modifier(keys: Res<ButtonInput<KeyCode>>, mut state: ResMut<SandboxState>) {
    let run_toggle = state.runtime.controller().bindings().run_toggle.clone();
    if !any_just_pressed(&keys, &run_toggle) {
        return;
    }

    state.runtime.switch_run_toggle();
    info!(
        "Locomotion set to {}",
        if state.runtime.controller().toggle_run() {
            "run"
        } else {
            "walk"
        }
    );
}

/// Orbits the follow camera with the right mouse button and zooms with the
/// wheel.
pub fn orbit_camera_with_mouse(
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mut state: ResMut<SandboxState>,
) {
    let mut mouse_delta = Vec2::ZERO;
    for motion in mouse_motion.read() {
        mouse_delta += motion.delta;
    }

    let mut zoom_units = 0.0;
    for wheel in mouse_wheel.read() {
        let unit_scale = match wheel.unit {
            MouseScrollUnit::Line => 1.0,
            MouseScrollUnit::Pixel => 0.03,
        };
        zoom_units += wheel.y * unit_scale;
    }

    let camera_config = state.runtime.camera_config();
    let (yaw, pitch) = if mouse_buttons.pressed(MouseButton::Right) {
        (
            -mouse_delta.x * camera_config.orbit_sensitivity,
            -mouse_delta.y * camera_config.orbit_sensitivity,
        )
    } else {
        (0.0, 0.0)
    };
    let zoom = -zoom_units * camera_config.zoom_step;

    if yaw == 0.0 && pitch == 0.0 && zoom == 0.0 {
        return;
    }
    state.runtime.orbit_camera(yaw, pitch, zoom);
}
