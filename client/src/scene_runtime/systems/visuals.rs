use crate::scene::{SceneChange, VisualDesc, VisualHandle, VisualShape};
use crate::scene_runtime::components::SceneVisual;
use crate::scene_runtime::state::{SandboxState, VisualEntities};
use bevy::prelude::*;

/// Replays scene-ledger changes onto entities: spawns new visuals, moves
/// world-driven ones and despawns removed ones.
pub fn reconcile_scene_visuals(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut state: ResMut<SandboxState>,
    mut visuals: ResMut<VisualEntities>,
    mut transforms: Query<&mut Transform, With<SceneVisual>>,
) {
    for change in state.runtime.proxy_mut().scene_mut().drain_changes() {
        match change {
            SceneChange::Added(handle, desc) => {
                let entity = spawn_visual(
                    &mut commands,
                    &asset_server,
                    &mut meshes,
                    &mut materials,
                    handle,
                    &desc,
                );
                visuals.by_handle.insert(handle, entity);
            }
            SceneChange::Moved(handle, position) => {
                let Some(entity) = visuals.by_handle.get(&handle).copied() else {
                    continue;
                };
                if let Ok(mut transform) = transforms.get_mut(entity) {
                    transform.translation = position;
                }
            }
            SceneChange::Removed(handle) => {
                if let Some(entity) = visuals.by_handle.remove(&handle) {
                    commands.entity(entity).try_despawn();
                }
            }
        }
    }
}

fn spawn_visual(
    commands: &mut Commands,
    asset_server: &AssetServer,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    handle: VisualHandle,
    desc: &VisualDesc,
) -> Entity {
    let [red, green, blue] = desc.color;
    let material = StandardMaterial {
        base_color: Color::srgb(red, green, blue),
        unlit: desc.unlit,
        ..default()
    };

    match &desc.shape {
        VisualShape::Sphere { radius } => commands
            .spawn((
                Mesh3d(meshes.add(Sphere::new(*radius))),
                MeshMaterial3d(materials.add(material)),
                Transform::from_translation(desc.position),
                SceneVisual(handle),
            ))
            .id(),
        VisualShape::Cuboid { size } => commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::from_size(*size))),
                MeshMaterial3d(materials.add(material)),
                Transform::from_translation(desc.position),
                SceneVisual(handle),
            ))
            .id(),
        VisualShape::Model { path, scale, yaw } => {
            let scene_handle: Handle<Scene> = asset_server.load(format!("{path}#Scene0"));
            commands
                .spawn((
                    SceneRoot(scene_handle),
                    Transform::from_translation(desc.position)
                        .with_rotation(Quat::from_rotation_y(*yaw))
                        .with_scale(*scale),
                    SceneVisual(handle),
                ))
                .id()
        }
    }
}
