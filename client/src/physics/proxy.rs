use super::reactions::{CollisionReactionTable, Reaction, ReactionEffect};
use super::world::{
    BodyDesc, BodyHandle, BodyKind, Collider, CollisionEvent, CollisionGroups, PhysicsWorld,
};
use crate::scene::{SceneGraph, VisualDesc, VisualHandle};
use crate::scheduler::{DeferredTask, TaskScheduler, TaskToken};
use bevy::log::{debug, info};
use bevy::math::Vec3;
use bevy::transform::components::Transform;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Collider used for the character proxy.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CharacterBodyConfig {
    pub radius: f32,
    pub height: f32,
    pub mass: f32,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            radius: 0.2,
            height: 1.2,
            mass: 5.0,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BombConfig {
    pub ttl_secs: f32,
    pub radius: f32,
    pub mass: f32,
    /// Speed along the direction the character faces.
    pub place_speed: f32,
    /// Added to the launch velocity after `place_speed` is applied.
    pub launch_boost: [f32; 3],
    pub color: [f32; 3],
}

impl Default for BombConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 2.0,
            radius: 0.3,
            mass: 1.0,
            place_speed: 10.0,
            launch_boost: [5.0, 100.0, 0.0],
            color: [0.22, 0.24, 0.2],
        }
    }
}

impl BombConfig {
    pub fn ttl(&self) -> Duration {
        Duration::try_from_secs_f32(self.ttl_secs).unwrap_or(Duration::ZERO)
    }

    /// Launch velocity for a bomb thrown along `facing`, the character's
    /// walk direction.
    pub fn launch_velocity(&self, facing: Vec3) -> Vec3 {
        facing.normalize_or_zero() * self.place_speed + Vec3::from_array(self.launch_boost)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EphemeralKind {
    Bomb,
}

/// Visual and body pair with a bounded lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EphemeralBody {
    pub visual: VisualHandle,
    pub body: BodyHandle,
    pub kind: EphemeralKind,
    pub spawn_time: Duration,
    pub ttl: Duration,
    pub ttl_task: TaskToken,
}

/// Collidable scene object that lives until a reaction removes it.
#[derive(Debug, Clone, PartialEq)]
pub struct PropDesc {
    pub name: String,
    pub visual: VisualDesc,
    pub kind: BodyKind,
    pub collider: Collider,
    pub reactions: Vec<Reaction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropBody {
    pub name: String,
    pub visual: VisualHandle,
    pub body: BodyHandle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyedBody {
    Ephemeral(EphemeralBody),
    Prop(PropBody),
}

/// Keeps the physics world in step with the render side.
///
/// Owns the character proxy, every ephemeral body and prop, and the reaction
/// table keyed by their bodies. Visual and body handles are created and
/// removed together; nothing else may remove them.
pub struct PhysicsProxySync<W, S> {
    world: W,
    scene: S,
    reactions: CollisionReactionTable,
    bombs: BombConfig,
    character: Option<BodyHandle>,
    ephemerals: BTreeMap<BodyHandle, EphemeralBody>,
    props: BTreeMap<BodyHandle, PropBody>,
}

impl<W: PhysicsWorld, S: SceneGraph> PhysicsProxySync<W, S> {
    pub fn new(world: W, scene: S, bombs: BombConfig) -> Self {
        Self {
            world,
            scene,
            reactions: CollisionReactionTable::new(),
            bombs,
            character: None,
            ephemerals: BTreeMap::new(),
            props: BTreeMap::new(),
        }
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn reactions(&self) -> &CollisionReactionTable {
        &self.reactions
    }

    pub fn bombs(&self) -> &BombConfig {
        &self.bombs
    }

    pub fn character_body(&self) -> Option<BodyHandle> {
        self.character
    }

    pub fn ephemeral(&self, body: BodyHandle) -> Option<&EphemeralBody> {
        self.ephemerals.get(&body)
    }

    pub fn ephemerals(&self) -> impl Iterator<Item = &EphemeralBody> {
        self.ephemerals.values()
    }

    pub fn prop(&self, body: BodyHandle) -> Option<&PropBody> {
        self.props.get(&body)
    }

    pub fn props(&self) -> impl Iterator<Item = &PropBody> {
        self.props.values()
    }

    /// Creates the kinematic character proxy, replacing any previous one.
    pub fn attach_character(&mut self, position: Vec3, config: &CharacterBodyConfig) -> BodyHandle {
        if let Some(previous) = self.character.take() {
            self.world.remove_body(previous);
        }

        let desc = BodyDesc::new(
            BodyKind::Kinematic,
            Collider::Cylinder {
                radius: config.radius,
                height: config.height,
            },
            position,
        )
        .with_mass(config.mass)
        .with_groups(CollisionGroups::new(
            CollisionGroups::CHARACTER,
            CollisionGroups::ALL,
        ));
        let handle = self.world.add_body(desc);
        self.world.subscribe(handle);
        self.character = Some(handle);
        handle
    }

    /// Copies the character position into its proxy. One-way: the proxy
    /// never moves the character.
    pub fn sync(&mut self, transform: &Transform) {
        if let Some(handle) = self.character {
            self.world.set_position(handle, transform.translation);
        }
    }

    pub fn spawn_ephemeral(
        &mut self,
        kind: EphemeralKind,
        origin: Vec3,
        velocity: Vec3,
        tasks: &mut TaskScheduler<DeferredTask>,
    ) -> EphemeralBody {
        let (visual_desc, body_desc, ttl) = match kind {
            EphemeralKind::Bomb => (
                VisualDesc::sphere(self.bombs.radius, origin).with_color(self.bombs.color),
                BodyDesc::new(
                    BodyKind::Dynamic,
                    Collider::Sphere {
                        radius: self.bombs.radius,
                    },
                    origin,
                )
                .with_velocity(velocity)
                .with_mass(self.bombs.mass)
                .with_groups(CollisionGroups::new(
                    CollisionGroups::PROJECTILE,
                    CollisionGroups::PROP | CollisionGroups::GROUND,
                )),
                self.bombs.ttl(),
            ),
        };

        let visual = self.scene.add_visual(visual_desc);
        let body = self.world.add_body(body_desc);
        self.world.subscribe(body);
        self.reactions
            .register(body, Reaction::DeleteAfterDelay(Duration::ZERO));
        let ttl_task = tasks.schedule(ttl, DeferredTask::DestroyBody(body));

        let ephemeral = EphemeralBody {
            visual,
            body,
            kind,
            spawn_time: tasks.now(),
            ttl,
            ttl_task,
        };
        self.ephemerals.insert(body, ephemeral);
        ephemeral
    }

    /// Launches a bomb from `origin`, forwards along `facing` and upwards.
    pub fn plant_bomb(
        &mut self,
        origin: Vec3,
        facing: Vec3,
        tasks: &mut TaskScheduler<DeferredTask>,
    ) -> EphemeralBody {
        let velocity = self.bombs.launch_velocity(facing);
        let bomb = self.spawn_ephemeral(EphemeralKind::Bomb, origin, velocity, tasks);
        info!("Bomb planted at {:?} heading {:?}", origin, velocity);
        bomb
    }

    pub fn spawn_prop(&mut self, desc: PropDesc) -> BodyHandle {
        let body_desc = BodyDesc::new(desc.kind, desc.collider, desc.visual.position).with_groups(
            CollisionGroups::new(CollisionGroups::PROP, CollisionGroups::ALL),
        );
        let visual = self.scene.add_visual(desc.visual);
        let body = self.world.add_body(body_desc);
        if !desc.reactions.is_empty() {
            self.world.subscribe(body);
        }
        for reaction in desc.reactions {
            self.reactions.register(body, reaction);
        }
        self.props.insert(
            body,
            PropBody {
                name: desc.name,
                visual,
                body,
            },
        );
        body
    }

    /// Removes an ephemeral body and its visual. Safe to call again; later
    /// calls return `None`. A pending TTL task is cancelled.
    pub fn destroy_ephemeral(
        &mut self,
        body: BodyHandle,
        tasks: &mut TaskScheduler<DeferredTask>,
    ) -> Option<EphemeralBody> {
        let ephemeral = self.ephemerals.remove(&body)?;
        tasks.cancel(ephemeral.ttl_task);
        self.world.remove_body(ephemeral.body);
        self.scene.remove_visual(ephemeral.visual);
        self.reactions.unregister(ephemeral.body);
        debug!("Destroyed {:?} {:?}", ephemeral.kind, ephemeral.body);
        Some(ephemeral)
    }

    pub fn destroy_prop(&mut self, body: BodyHandle) -> Option<PropBody> {
        let prop = self.props.remove(&body)?;
        self.world.remove_body(prop.body);
        self.scene.remove_visual(prop.visual);
        self.reactions.unregister(prop.body);
        info!("Removed prop '{}'", prop.name);
        Some(prop)
    }

    /// Destroys whatever the handle belongs to; `None` if nothing did.
    pub fn destroy_body(
        &mut self,
        body: BodyHandle,
        tasks: &mut TaskScheduler<DeferredTask>,
    ) -> Option<DestroyedBody> {
        if let Some(ephemeral) = self.destroy_ephemeral(body, tasks) {
            return Some(DestroyedBody::Ephemeral(ephemeral));
        }
        self.destroy_prop(body).map(DestroyedBody::Prop)
    }

    pub fn step(&mut self, dt: f32) -> Vec<CollisionEvent> {
        self.world.step(dt)
    }

    pub fn resolve(&mut self, events: &[CollisionEvent]) -> Vec<ReactionEffect> {
        self.reactions.resolve(events, self.character)
    }

    /// Moves visuals of world-driven bodies to where the world put them.
    pub fn mirror_dynamic_bodies(&mut self) {
        let pairs = self
            .ephemerals
            .values()
            .map(|ephemeral| (ephemeral.body, ephemeral.visual))
            .chain(self.props.values().map(|prop| (prop.body, prop.visual)));

        for (body, visual) in pairs {
            if self.world.kind(body) != Some(BodyKind::Dynamic) {
                continue;
            }
            if let Some(position) = self.world.position(body) {
                self.scene.set_visual_position(visual, position);
            }
        }
    }
}
