use crate::physics::{BodyKind, Collider, PropDesc, Reaction};
use crate::scene::{SceneGraph, VisualDesc};
use crate::scene_runtime::components::{SandboxCamera, SandboxCharacter};
use crate::scene_runtime::state::{CharacterAnimationLibrary, SandboxSimulation, SandboxState};
use crate::settings::SettingsResource;
use bevy::camera::{ClearColorConfig, PerspectiveProjection, Projection};
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::gltf::Gltf;
use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

const FLOOR_SIZE: f32 = 80.0;
const SKY_COLOR: Color = Color::srgb(0.55, 0.72, 0.9);
const FLOOR_TEXTURE_PATH: &str = "textures/ground/t_ground_cement.png";

/// Name of the collidable box that freezes the character.
pub const TEST_BOX_NAME: &str = "test box";

/// Registers the sandbox props with the runtime: a red box that freezes the
/// character and removes itself on contact, plus decorative models.
pub fn populate_demo_scene(runtime: &mut SandboxSimulation) {
    runtime.spawn_prop(PropDesc {
        name: TEST_BOX_NAME.to_string(),
        visual: VisualDesc::cuboid(Vec3::ONE, Vec3::new(1.0, 1.0, 3.0))
            .with_color([1.0, 0.0, 0.0])
            .unlit(),
        kind: BodyKind::Static,
        collider: Collider::Cuboid {
            half_extents: Vec3::splat(0.25),
        },
        reactions: vec![
            Reaction::FreezeCharacter,
            Reaction::DeleteAfterDelay(Duration::ZERO),
        ],
    });

    let scene = runtime.proxy_mut().scene_mut();
    scene.add_visual(VisualDesc::model(
        "models/scene.gltf",
        Vec3::new(23.94, 0.05, -5.16),
    ));
    scene.add_visual(
        VisualDesc::model("models/couch.glb", Vec3::new(4.93, 0.5, -10.36))
            .with_transform(Vec3::splat(2.5), 0.0),
    );
    scene.add_visual(
        VisualDesc::model("models/house.glb", Vec3::new(4.91, 0.5, 15.18))
            .with_transform(Vec3::ONE, FRAC_PI_2),
    );
}

/// Spawns the camera, floor, lights and character model.
pub fn spawn_sandbox_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<SettingsResource>,
    state: Res<SandboxState>,
) {
    commands.spawn((
        SandboxCamera,
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(SKY_COLOR),
            ..default()
        },
        Tonemapping::None,
        Projection::Perspective(PerspectiveProjection {
            fov: 45.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            ..default()
        }),
        state.runtime.camera().transform(),
    ));

    let floor_texture: Handle<Image> = asset_server.load(FLOOR_TEXTURE_PATH);
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(FLOOR_SIZE, FLOOR_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color_texture: Some(floor_texture),
            perceptual_roughness: 1.0,
            ..default()
        })),
        Transform::default(),
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::WHITE,
            illuminance: 5000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(-60.0, 100.0, -10.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let model_path = settings.current.animations.model_path.clone();
    let scene_handle: Handle<Scene> = asset_server.load(format!("{model_path}#Scene0"));
    let gltf_handle: Handle<Gltf> = asset_server.load(model_path.clone());
    commands.spawn((
        SandboxCharacter,
        SceneRoot(scene_handle),
        *state.runtime.controller().transform(),
    ));
    commands.insert_resource(CharacterAnimationLibrary::new(gltf_handle));

    info!("Sandbox scene spawned with character '{}'", model_path);
}
