use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum SandboxPipeline {
    Input,
    Simulate,
    Present,
}
