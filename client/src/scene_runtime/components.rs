use crate::scene::VisualHandle;
use bevy::prelude::*;

/// Root of the animated character model.
#[derive(Component)]
pub struct SandboxCharacter;

/// Camera driven by the runtime's follow rig.
#[derive(Component)]
pub struct SandboxCamera;

/// Entity rendering a visual owned by the runtime's scene ledger.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneVisual(pub VisualHandle);

/// Animation player already wired to the character animation graph.
#[derive(Component)]
pub struct CharacterAnimationBound;
