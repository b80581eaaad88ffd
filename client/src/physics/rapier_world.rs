use super::world::{
    BodyDesc, BodyHandle, BodyKind, Collider, CollisionEvent, CollisionGroups, PhysicsWorld,
};
use bevy::log::trace;
use bevy::math::Vec3;
use rapier3d::crossbeam::channel::{Receiver, unbounded};
use rapier3d::prelude::{
    ActiveCollisionTypes, ActiveEvents, CCDSolver, ChannelEventCollector, ColliderBuilder,
    ColliderHandle, ColliderSet, CollisionEvent as ContactEvent, DefaultBroadPhase, Group,
    ImpulseJointSet, IntegrationParameters, InteractionGroups, IslandManager, MultibodyJointSet,
    NarrowPhase, PhysicsPipeline, QueryPipeline, Real, RigidBodyBuilder, RigidBodyHandle,
    RigidBodySet, Vector, vector,
};
use std::collections::{BTreeMap, HashMap};

/// Gravity applied to dynamic bodies by default.
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.82, 0.0);

/// Half extents of the fixed floor slab whose top face sits at `y = 0`.
const GROUND_HALF_EXTENTS: Vec3 = Vec3::new(500.0, 0.5, 500.0);

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn interaction_groups(groups: CollisionGroups) -> InteractionGroups {
    InteractionGroups::new(
        Group::from_bits_truncate(groups.memberships),
        Group::from_bits_truncate(groups.filter),
    )
}

#[derive(Debug, Clone, Copy)]
struct BodyEntry {
    rigid_body: RigidBodyHandle,
    collider: ColliderHandle,
    kind: BodyKind,
    subscribed: bool,
}

/// Rigid-body world backed by rapier, with a fixed floor at `y = 0`.
///
/// Contacts are reported once, on the step where they begin.
pub struct RapierWorld {
    gravity: Vector<Real>,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: ChannelEventCollector,
    contact_events: Receiver<ContactEvent>,

    next_handle: u32,
    bodies: BTreeMap<BodyHandle, BodyEntry>,
    by_collider: HashMap<ColliderHandle, BodyHandle>,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new(DEFAULT_GRAVITY)
    }
}

impl RapierWorld {
    pub fn new(gravity: Vec3) -> Self {
        let (contact_send, contact_events) = unbounded();
        let (force_send, _) = unbounded();

        let mut world = Self {
            gravity: to_vector(gravity),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: ChannelEventCollector::new(contact_send, force_send),
            contact_events,
            next_handle: 0,
            bodies: BTreeMap::new(),
            by_collider: HashMap::new(),
        };
        world.insert_ground();
        world
    }

    /// The floor has no [`BodyHandle`]; contacts with it are never reported.
    fn insert_ground(&mut self) {
        let ground = ColliderBuilder::cuboid(
            GROUND_HALF_EXTENTS.x,
            GROUND_HALF_EXTENTS.y,
            GROUND_HALF_EXTENTS.z,
        )
        .translation(vector![0.0, -GROUND_HALF_EXTENTS.y, 0.0])
        .collision_groups(interaction_groups(CollisionGroups::new(
            CollisionGroups::GROUND,
            CollisionGroups::PROP | CollisionGroups::PROJECTILE,
        )))
        .build();
        self.collider_set.insert(ground);
    }

    pub fn gravity(&self) -> Vec3 {
        to_vec3(&self.gravity)
    }

    pub fn velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        let entry = self.bodies.get(&handle)?;
        self.rigid_body_set
            .get(entry.rigid_body)
            .map(|body| to_vec3(body.linvel()))
    }

    pub fn handles(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies.keys().copied()
    }

    fn started_contacts(&self) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.contact_events.try_recv() {
            if !event.started() {
                continue;
            }
            let (Some(first), Some(second)) = (
                self.by_collider.get(&event.collider1()),
                self.by_collider.get(&event.collider2()),
            ) else {
                continue;
            };

            for (body, other) in [(*first, *second), (*second, *first)] {
                if self.bodies.get(&body).is_some_and(|entry| entry.subscribed) {
                    events.push(CollisionEvent { body, other });
                }
            }
        }
        events
    }
}

impl PhysicsWorld for RapierWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let builder = match desc.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let rigid_body = self.rigid_body_set.insert(
            builder
                .translation(to_vector(desc.position))
                .linvel(to_vector(desc.velocity))
                .build(),
        );

        let mut collider = match desc.collider {
            Collider::Sphere { radius } => ColliderBuilder::ball(radius),
            Collider::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            Collider::Cylinder { radius, height } => {
                ColliderBuilder::cylinder(height * 0.5, radius)
            }
        }
        .collision_groups(interaction_groups(desc.groups))
        .active_collision_types(
            ActiveCollisionTypes::default() | ActiveCollisionTypes::KINEMATIC_FIXED,
        );
        if desc.mass.is_finite() && desc.mass > 0.0 {
            collider = collider.mass(desc.mass);
        }
        let collider = self.collider_set.insert_with_parent(
            collider.build(),
            rigid_body,
            &mut self.rigid_body_set,
        );

        let handle = BodyHandle(self.next_handle);
        self.next_handle += 1;
        self.bodies.insert(
            handle,
            BodyEntry {
                rigid_body,
                collider,
                kind: desc.kind,
                subscribed: false,
            },
        );
        self.by_collider.insert(collider, handle);
        trace!("Added {:?} body {:?}", desc.kind, handle);
        handle
    }

    fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Some(entry) = self.bodies.remove(&handle) else {
            return false;
        };
        self.by_collider.remove(&entry.collider);
        self.rigid_body_set.remove(
            entry.rigid_body,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        true
    }

    fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains_key(&handle)
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn set_position(&mut self, handle: BodyHandle, position: Vec3) {
        let Some(entry) = self.bodies.get(&handle) else {
            return;
        };
        if let Some(body) = self.rigid_body_set.get_mut(entry.rigid_body) {
            body.set_translation(to_vector(position), true);
        }
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec3> {
        let entry = self.bodies.get(&handle)?;
        self.rigid_body_set
            .get(entry.rigid_body)
            .map(|body| to_vec3(body.translation()))
    }

    fn kind(&self, handle: BodyHandle) -> Option<BodyKind> {
        self.bodies.get(&handle).map(|entry| entry.kind)
    }

    fn subscribe(&mut self, handle: BodyHandle) {
        let Some(entry) = self.bodies.get_mut(&handle) else {
            return;
        };
        entry.subscribed = true;
        if let Some(collider) = self.collider_set.get_mut(entry.collider) {
            collider.set_active_events(ActiveEvents::COLLISION_EVENTS);
        }
    }

    fn step(&mut self, dt: f32) -> Vec<CollisionEvent> {
        if !dt.is_finite() || dt <= 0.0 {
            return Vec::new();
        }

        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );
        self.started_contacts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn sphere(position: Vec3) -> BodyDesc {
        BodyDesc::new(BodyKind::Dynamic, Collider::Sphere { radius: 0.5 }, position)
    }

    fn character(position: Vec3) -> BodyDesc {
        BodyDesc::new(
            BodyKind::Kinematic,
            Collider::Cylinder {
                radius: 0.2,
                height: 1.2,
            },
            position,
        )
        .with_groups(CollisionGroups::new(
            CollisionGroups::CHARACTER,
            CollisionGroups::ALL,
        ))
    }

    fn crate_box(position: Vec3) -> BodyDesc {
        BodyDesc::new(
            BodyKind::Static,
            Collider::Cuboid {
                half_extents: Vec3::splat(0.25),
            },
            position,
        )
        .with_groups(CollisionGroups::new(
            CollisionGroups::PROP,
            CollisionGroups::ALL,
        ))
    }

    #[test]
    fn handles_are_unique_and_removal_is_idempotent() {
        let mut world = RapierWorld::default();
        let a = world.add_body(sphere(Vec3::new(0.0, 2.0, 0.0)));
        let b = world.add_body(sphere(Vec3::new(10.0, 2.0, 0.0)));
        assert_ne!(a, b);

        assert!(world.remove_body(a));
        assert!(!world.remove_body(a));
        assert!(!world.contains(a));
        assert_eq!(world.body_count(), 1);
        assert_eq!(world.handles().collect::<Vec<_>>(), vec![b]);
    }

    #[test]
    fn dynamic_bodies_fall_and_rest_on_the_floor() {
        let mut world = RapierWorld::default();
        let ball = world.add_body(
            sphere(Vec3::new(0.0, 3.0, 0.0)).with_groups(CollisionGroups::new(
                CollisionGroups::PROP,
                CollisionGroups::ALL,
            )),
        );

        for _ in 0..240 {
            world.step(DT);
        }

        let resting = world.position(ball).unwrap();
        assert!((resting.y - 0.5).abs() < 0.05, "rested at {resting:?}");
        assert!(world.velocity(ball).unwrap().y.abs() < 0.1);
    }

    #[test]
    fn kinematic_and_static_bodies_stay_put() {
        let mut world = RapierWorld::default();
        let kinematic = world.add_body(character(Vec3::new(0.0, 4.0, 0.0)));
        let fixed = world.add_body(crate_box(Vec3::new(5.0, 1.0, 0.0)));

        world.step(1.0);
        assert_eq!(world.position(kinematic), Some(Vec3::new(0.0, 4.0, 0.0)));
        assert_eq!(world.position(fixed), Some(Vec3::new(5.0, 1.0, 0.0)));

        world.set_position(kinematic, Vec3::ONE);
        assert_eq!(world.position(kinematic), Some(Vec3::ONE));
        assert_eq!(world.kind(kinematic), Some(BodyKind::Kinematic));
    }

    #[test]
    fn contact_is_reported_once_when_it_begins() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        let prop = world.add_body(crate_box(Vec3::new(0.0, 1.0, -1.0)));
        let player = world.add_body(character(Vec3::new(0.0, 1.0, 3.0)));
        world.subscribe(prop);

        assert!(world.step(DT).is_empty());

        world.set_position(player, Vec3::new(0.0, 1.0, -0.9));
        assert_eq!(
            world.step(DT),
            vec![CollisionEvent {
                body: prop,
                other: player
            }]
        );
        assert!(world.step(DT).is_empty());

        world.set_position(player, Vec3::new(0.0, 1.0, 3.0));
        world.step(DT);
        world.set_position(player, Vec3::new(0.0, 1.0, -0.9));
        assert_eq!(world.step(DT).len(), 1);
    }

    #[test]
    fn filtered_groups_never_touch() {
        let mut world = RapierWorld::new(Vec3::ZERO);
        let player = world.add_body(character(Vec3::new(0.0, 1.0, 0.0)));
        let bomb = world.add_body(sphere(Vec3::new(0.0, 1.0, 0.0)).with_groups(
            CollisionGroups::new(CollisionGroups::PROJECTILE, CollisionGroups::PROP),
        ));
        world.subscribe(player);
        world.subscribe(bomb);

        assert!(world.step(DT).is_empty());
    }

    #[test]
    fn floor_contacts_are_not_reported() {
        let mut world = RapierWorld::default();
        let bomb = world.add_body(sphere(Vec3::new(0.0, 0.6, 0.0)).with_groups(
            CollisionGroups::new(
                CollisionGroups::PROJECTILE,
                CollisionGroups::PROP | CollisionGroups::GROUND,
            ),
        ));
        world.subscribe(bomb);

        for _ in 0..60 {
            assert!(world.step(DT).is_empty());
        }
        assert!(world.position(bomb).unwrap().y > 0.3);
    }

    #[test]
    fn non_positive_step_does_nothing() {
        let mut world = RapierWorld::default();
        let ball = world.add_body(sphere(Vec3::new(0.0, 3.0, 0.0)));

        assert!(world.step(0.0).is_empty());
        assert!(world.step(f32::NAN).is_empty());
        assert_eq!(world.position(ball), Some(Vec3::new(0.0, 3.0, 0.0)));
    }
}
