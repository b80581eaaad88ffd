use crate::character::ClipCommand;
use crate::scene_runtime::components::{CharacterAnimationBound, SandboxCharacter};
use crate::scene_runtime::state::{CharacterAnimationLibrary, SandboxState};
use crate::settings::SettingsResource;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use common::AnimationLabel;
use std::time::Duration;

/// Builds the character animation graph once the GLB metadata is loaded.
///
/// Only clips named in the settings are bound; the rest (bind poses and the
/// like) are skipped. The runtime's mixer learns which labels exist so that
/// missing ones are reported once and then ignored.
pub fn init_character_animation_library(
    mut library: ResMut<CharacterAnimationLibrary>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    settings: Res<SettingsResource>,
    mut state: ResMut<SandboxState>,
) {
    if library.initialized {
        return;
    }

    let Some(gltf) = gltfs.get(&library.gltf_handle) else {
        return;
    };

    library.initialized = true;

    let clips = &settings.current.animations;
    let mut graph = AnimationGraph::new();
    let root = graph.root;
    for (name, handle) in &gltf.named_animations {
        let Some(label) = clips.label_for_clip(name) else {
            continue;
        };
        let node = graph.add_clip(handle.clone(), 1.0, root);
        library.nodes.insert(label, node);
    }

    if library.nodes.is_empty() {
        warn!(
            "'{}' has no animations matching {:?}",
            clips.model_path, clips.clips
        );
    } else {
        info!(
            "Character animation library ready: {} of {} clips bound",
            library.nodes.len(),
            AnimationLabel::ALL.len()
        );
    }

    library.graph_handle = Some(graphs.add(graph));
    let available: Vec<AnimationLabel> = library.nodes.keys().copied().collect();
    state
        .runtime
        .controller_mut()
        .animation_mut()
        .mixer_mut()
        .set_available(available);
}

/// Wires animation players under the character model to the graph and starts
/// whatever the state machine currently wants to play.
pub fn bind_character_animation_players(
    mut commands: Commands,
    library: Res<CharacterAnimationLibrary>,
    mut state: ResMut<SandboxState>,
    characters: Query<Entity, With<SandboxCharacter>>,
    children_query: Query<&Children>,
    mut players: Query<(Entity, &mut AnimationPlayer), Without<CharacterAnimationBound>>,
) {
    let Some(graph_handle) = library.graph_handle.clone() else {
        return;
    };

    let mut unbound = Vec::new();
    for root in &characters {
        unbound.extend(find_unbound_players(root, &children_query, &players));
    }
    if unbound.is_empty() {
        return;
    }

    let machine = state.runtime.controller_mut().animation_mut();
    let current = machine.current();
    let jump_overlay = machine.jump_overlay_active();
    // Replaying the current state supersedes anything recorded before binding.
    machine.mixer_mut().drain();

    for player_entity in unbound {
        let Ok((entity, mut player)) = players.get_mut(player_entity) else {
            continue;
        };

        let mut transitions = AnimationTransitions::new();
        if let Some(node) = library.node(current) {
            transitions
                .play(&mut player, node, Duration::ZERO)
                .repeat();
        }
        if jump_overlay {
            if let Some(node) = library.node(AnimationLabel::Jump) {
                player.play(node);
            }
        }

        commands.entity(entity).insert((
            AnimationGraphHandle(graph_handle.clone()),
            transitions,
            CharacterAnimationBound,
        ));
    }
}

fn find_unbound_players(
    root: Entity,
    children_query: &Query<&Children>,
    players: &Query<(Entity, &mut AnimationPlayer), Without<CharacterAnimationBound>>,
) -> Vec<Entity> {
    let mut result = Vec::new();
    let mut queue = vec![root];
    while let Some(entity) = queue.pop() {
        if players.contains(entity) {
            result.push(entity);
        }
        if let Ok(children) = children_query.get(entity) {
            queue.extend(children.iter());
        }
    }
    result
}

/// Applies recorded clip requests to the bound players.
///
/// Locomotion clips go through `AnimationTransitions` so fades replace the
/// previous clip; the jump clip plays on top of them. Players pause on frames
/// where the state machine did not advance (e.g. while frozen).
pub fn apply_character_clip_commands(
    library: Res<CharacterAnimationLibrary>,
    mut state: ResMut<SandboxState>,
    mut players: Query<(&mut AnimationPlayer, &mut AnimationTransitions), With<CharacterAnimationBound>>,
) {
    if players.is_empty() {
        return;
    }

    let mixer = state.runtime.controller_mut().animation_mut().mixer_mut();
    let commands = mixer.drain();
    let advanced = mixer.take_advance();

    for (mut player, mut transitions) in &mut players {
        for command in &commands {
            apply_clip_command(&library, *command, &mut player, &mut transitions);
        }

        if advanced > 0.0 {
            player.resume_all();
        } else {
            player.pause_all();
        }
    }
}

fn apply_clip_command(
    library: &CharacterAnimationLibrary,
    command: ClipCommand,
    player: &mut AnimationPlayer,
    transitions: &mut AnimationTransitions,
) {
    match command {
        // Fading out is implied by the next transition.
        ClipCommand::FadeOut(..) => {}
        ClipCommand::FadeIn(AnimationLabel::Jump, _) | ClipCommand::Play(AnimationLabel::Jump) => {
            if let Some(node) = library.node(AnimationLabel::Jump) {
                player.play(node).replay();
            }
        }
        ClipCommand::FadeIn(label, fade) => {
            if let Some(node) = library.node(label) {
                transitions.play(player, node, fade).repeat();
            }
        }
        ClipCommand::Play(label) => {
            if let Some(node) = library.node(label) {
                transitions.play(player, node, Duration::ZERO).repeat();
            }
        }
        ClipCommand::Stop(label) => {
            if let Some(node) = library.node(label) {
                player.stop(node);
            }
        }
    }
}
