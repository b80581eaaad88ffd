use crate::character::{ClipCommandQueue, InputState};
use crate::runtime::{SandboxRuntime, TickReport};
use crate::scene::VisualHandle;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use common::AnimationLabel;
use std::collections::HashMap;

pub type SandboxSimulation = SandboxRuntime<ClipCommandQueue>;

/// The simulation core, ticked once per frame.
#[derive(Resource)]
pub struct SandboxState {
    pub runtime: SandboxSimulation,
}

/// Key snapshot captured from the window this frame, keyed by binding name.
#[derive(Resource, Default)]
pub struct CapturedInput(pub InputState);

/// Entities spawned for scene-ledger visuals.
#[derive(Resource, Default)]
pub struct VisualEntities {
    pub by_handle: HashMap<VisualHandle, Entity>,
}

/// Animation graph built from the character GLB's named clips.
#[derive(Resource)]
pub struct CharacterAnimationLibrary {
    pub gltf_handle: Handle<Gltf>,
    pub graph_handle: Option<Handle<AnimationGraph>>,
    pub nodes: HashMap<AnimationLabel, AnimationNodeIndex>,
    pub initialized: bool,
}

impl CharacterAnimationLibrary {
    pub fn new(gltf_handle: Handle<Gltf>) -> Self {
        Self {
            gltf_handle,
            graph_handle: None,
            nodes: HashMap::new(),
            initialized: false,
        }
    }

    pub fn node(&self, label: AnimationLabel) -> Option<AnimationNodeIndex> {
        self.nodes.get(&label).copied()
    }
}

/// Non-empty tick outcome, published for logging and UI.
#[derive(Message, Debug, Clone)]
pub struct SandboxTickReported(pub TickReport);
