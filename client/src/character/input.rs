use common::keys;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of pressed keys, keyed by lower-case key name.
///
/// Populated by the input layer; the controller only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pressed: HashMap<String, bool>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pressed<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let mut input = Self::new();
        for key in keys {
            input.set(key, true);
        }
        input
    }

    pub fn set(&mut self, key: &str, pressed: bool) {
        if let Some(slot) = self.pressed.get_mut(key) {
            *slot = pressed;
        } else {
            self.pressed.insert(key.to_ascii_lowercase(), pressed);
        }
    }

    /// Lower-case names hit the map directly; others fall back to a
    /// case-insensitive scan.
    pub fn is_pressed(&self, key: &str) -> bool {
        if let Some(&pressed) = self.pressed.get(key) {
            return pressed;
        }
        if !key.bytes().any(|byte| byte.is_ascii_uppercase()) {
            return false;
        }
        self.pressed
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .is_some_and(|(_, &pressed)| pressed)
    }

    pub fn clear(&mut self) {
        self.pressed.clear();
    }
}

/// Fires once on the released -> pressed transition of a key.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTrigger {
    was_pressed: bool,
}

impl EdgeTrigger {
    pub fn update(&mut self, pressed: bool) -> bool {
        let fired = pressed && !self.was_pressed;
        self.was_pressed = pressed;
        fired
    }
}

/// Key names bound to each control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlBindings {
    pub forward: String,
    pub backward: String,
    pub left: String,
    pub right: String,
    pub run_toggle: String,
    pub jump: String,
    pub debug_overlay: String,
    pub plant: String,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            forward: keys::FORWARD.to_string(),
            backward: keys::BACKWARD.to_string(),
            left: keys::LEFT.to_string(),
            right: keys::RIGHT.to_string(),
            run_toggle: keys::RUN_TOGGLE.to_string(),
            jump: keys::JUMP.to_string(),
            debug_overlay: keys::DEBUG_OVERLAY.to_string(),
            plant: keys::PLANT.to_string(),
        }
    }
}

impl ControlBindings {
    /// Lower-cases every key name so lookups hit the snapshot directly.
    pub fn normalized(mut self) -> Self {
        for key in [
            &mut self.forward,
            &mut self.backward,
            &mut self.left,
            &mut self.right,
            &mut self.run_toggle,
            &mut self.jump,
            &mut self.debug_overlay,
            &mut self.plant,
        ] {
            key.make_ascii_lowercase();
        }
        self
    }

    /// Every bound key, in a stable order.
    pub fn all(&self) -> [&str; 8] {
        [
            self.forward.as_str(),
            self.backward.as_str(),
            self.left.as_str(),
            self.right.as_str(),
            self.run_toggle.as_str(),
            self.jump.as_str(),
            self.debug_overlay.as_str(),
            self.plant.as_str(),
        ]
    }

    pub fn any_direction_pressed(&self, input: &InputState) -> bool {
        [&self.forward, &self.backward, &self.left, &self.right]
            .into_iter()
            .any(|key| input.is_pressed(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_read_as_released() {
        let input = InputState::new();
        assert!(!input.is_pressed("w"));
    }

    #[test]
    fn key_names_are_case_insensitive() {
        let mut input = InputState::new();
        input.set("W", true);
        assert!(input.is_pressed("w"));
        assert!(input.is_pressed("W"));

        input.set("w", false);
        assert!(!input.is_pressed("W"));
    }

    #[test]
    fn snapshot_keys_are_stored_lower_case() {
        let mut input = InputState::new();
        input.set("Shift", true);
        input.set("SHIFT", false);
        input.set("j", true);

        assert_eq!(input.pressed.len(), 2);
        assert_eq!(input.pressed.get("shift"), Some(&false));
        assert!(input.is_pressed("J"));
        assert!(!input.is_pressed("K"));
    }

    #[test]
    fn normalized_bindings_are_lower_case() {
        let bindings = ControlBindings {
            forward: "W".to_string(),
            run_toggle: "Shift".to_string(),
            ..ControlBindings::default()
        }
        .normalized();

        assert_eq!(bindings.forward, "w");
        assert_eq!(bindings.run_toggle, "shift");
        assert_eq!(bindings.jump, keys::JUMP);
    }

    #[test]
    fn edge_trigger_fires_once_per_press() {
        let mut trigger = EdgeTrigger::default();
        let fired: Vec<bool> = [false, true, true, true, false, true]
            .into_iter()
            .map(|pressed| trigger.update(pressed))
            .collect();
        assert_eq!(fired, vec![false, true, false, false, false, true]);
    }

    #[test]
    fn triggers_do_not_share_state() {
        let mut first = EdgeTrigger::default();
        let mut second = EdgeTrigger::default();

        assert!(first.update(true));
        assert!(second.update(true));
    }

    #[test]
    fn direction_check_ignores_non_movement_keys() {
        let bindings = ControlBindings::default();
        let input = InputState::with_pressed(["space", "j"]);
        assert!(!bindings.any_direction_pressed(&input));

        let input = InputState::with_pressed(["d"]);
        assert!(bindings.any_direction_pressed(&input));
    }
}
