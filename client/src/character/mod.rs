pub mod animation;
pub mod camera;
pub mod config;
pub mod controller;
pub mod input;
pub mod locomotion;
pub mod vertical;

pub use animation::{AnimationMixer, AnimationStateMachine, ClipCommand, ClipCommandQueue};
pub use camera::{CameraConfig, FollowCamera};
pub use config::{AnimationClipsConfig, LocomotionConfig, VerticalConfig};
pub use controller::{CharacterController, ControllerConfig, TickTriggers};
pub use input::{ControlBindings, EdgeTrigger, InputState};
pub use locomotion::{LocomotionIntent, compute_intent, direction_offset};
pub use vertical::{VerticalMotionModel, VerticalState, VerticalStep};
