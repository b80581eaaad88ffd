use common::AnimationLabel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Horizontal movement and facing tuning.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LocomotionConfig {
    pub walk_velocity: f32,
    pub run_velocity: f32,
    /// Cross-fade window for label transitions, in seconds.
    pub fade_duration: f32,
    /// Largest facing change applied in a single tick, in radians.
    pub max_turn_step: f32,
    /// Added to the facing yaw so models authored facing another axis line up.
    pub model_yaw_offset: f32,
    /// Run is the default gait; the toggle key switches to walking.
    pub run_by_default: bool,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_velocity: 2.0,
            run_velocity: 5.0,
            fade_duration: 0.2,
            max_turn_step: 0.2,
            model_yaw_offset: 0.0,
            run_by_default: true,
        }
    }
}

impl LocomotionConfig {
    pub fn velocity_for(&self, label: AnimationLabel) -> f32 {
        match label {
            AnimationLabel::Run => self.run_velocity,
            AnimationLabel::Walk => self.walk_velocity,
            AnimationLabel::Idle | AnimationLabel::Jump => 0.0,
        }
    }
}

/// Jump and gravity tuning.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct VerticalConfig {
    pub jump_impulse: f32,
    pub gravity: f32,
    /// Delay between landing and stopping the jump clip, in seconds.
    pub jump_clip_stop_delay: f32,
}

impl Default for VerticalConfig {
    fn default() -> Self {
        Self {
            jump_impulse: 5.0,
            gravity: 9.8,
            jump_clip_stop_delay: 1.0,
        }
    }
}

/// Maps animation labels to clip names inside the character GLB.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnimationClipsConfig {
    pub model_path: String,
    pub clips: HashMap<String, String>,
    /// Clips present in the file that are never bound (e.g. a bind pose).
    pub ignored: Vec<String>,
}

impl Default for AnimationClipsConfig {
    fn default() -> Self {
        let clips = AnimationLabel::ALL
            .iter()
            .map(|label| {
                (
                    label.name().to_string(),
                    label.default_clip_name().to_string(),
                )
            })
            .collect();
        Self {
            model_path: "models/model.glb".to_string(),
            clips,
            ignored: vec!["t-pose".to_string()],
        }
    }
}

impl AnimationClipsConfig {
    pub fn clip_name(&self, label: AnimationLabel) -> &str {
        self.clips
            .get(label.name())
            .map(|name| name.as_str())
            .unwrap_or_else(|| label.default_clip_name())
    }

    /// Reverse lookup used when binding named clips from a loaded model.
    pub fn label_for_clip(&self, clip_name: &str) -> Option<AnimationLabel> {
        if self.ignored.iter().any(|ignored| ignored == clip_name) {
            return None;
        }
        AnimationLabel::ALL
            .iter()
            .copied()
            .find(|label| self.clip_name(*label).eq_ignore_ascii_case(clip_name))
    }
}
