#![allow(clippy::too_many_arguments, clippy::type_complexity)]

pub mod character;
pub mod physics;
pub mod runtime;
pub mod scene;
pub mod scene_runtime;
pub mod scheduler;
pub mod settings;

pub use runtime::{RuntimeConfig, SandboxRuntime, TickReport};
pub use scene_runtime::registration::SandboxPlugin;
