//! Shared sandbox definitions.
//!
//! This crate holds the plain vocabulary used by the character runtime:
//! the animation labels the locomotion policy selects between and the
//! canonical key names the input layer writes into the key-state table.

/// Animation intents the character can be in.
///
/// `Jump` is played as an overlay on top of the locomotion label and is
/// never selected by the locomotion policy itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationLabel {
    #[default]
    Idle,
    Walk,
    Run,
    Jump,
}

impl AnimationLabel {
    pub const ALL: &'static [AnimationLabel] = &[
        AnimationLabel::Idle,
        AnimationLabel::Walk,
        AnimationLabel::Run,
        AnimationLabel::Jump,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnimationLabel::Idle => "Idle",
            AnimationLabel::Walk => "Walk",
            AnimationLabel::Run => "Run",
            AnimationLabel::Jump => "Jump",
        }
    }

    /// Default clip name inside the character GLB.
    pub fn default_clip_name(&self) -> &'static str {
        match self {
            AnimationLabel::Idle => "idle",
            AnimationLabel::Walk => "walk",
            AnimationLabel::Run => "run",
            AnimationLabel::Jump => "jump",
        }
    }

    /// Whether the label moves the character horizontally.
    pub fn is_locomotion(&self) -> bool {
        matches!(self, AnimationLabel::Walk | AnimationLabel::Run)
    }
}

/// Canonical key names written into the key-state table by the input layer.
///
/// Names are lower-case, matching how key events are normalized before
/// being stored.
pub mod keys {
    pub const FORWARD: &str = "w";
    pub const BACKWARD: &str = "s";
    pub const LEFT: &str = "a";
    pub const RIGHT: &str = "d";

    /// Modifier that flips between running and walking.
    pub const RUN_TOGGLE: &str = "shift";
    pub const JUMP: &str = "space";

    pub const DEBUG_OVERLAY: &str = "9";
    /// Plants a bomb at the character's feet.
    pub const PLANT: &str = "j";

    pub const DIRECTIONS: [&str; 4] = [FORWARD, LEFT, BACKWARD, RIGHT];
}
