use crate::scene_runtime::components::{SandboxCamera, SandboxCharacter};
use crate::scene_runtime::state::SandboxState;
use bevy::prelude::*;

/// Copies the controller's transform onto the character model.
pub fn write_back_character_transform(
    state: Res<SandboxState>,
    mut characters: Query<&mut Transform, (With<SandboxCharacter>, Without<SandboxCamera>)>,
) {
    let source = state.runtime.controller().transform();
    for mut transform in &mut characters {
        transform.translation = source.translation;
        transform.rotation = source.rotation;
    }
}

pub fn write_back_camera_transform(
    state: Res<SandboxState>,
    mut cameras: Query<&mut Transform, (With<SandboxCamera>, Without<SandboxCharacter>)>,
) {
    let rig = state.runtime.camera().transform();
    for mut transform in &mut cameras {
        *transform = rig;
    }
}
