use bevy::math::Vec3;

/// Opaque handle to a body owned by a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves.
    Static,
    /// Integrated by the world.
    Dynamic,
    /// Moved only through [`PhysicsWorld::set_position`].
    Kinematic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
    /// Upright cylinder centred on the body position.
    Cylinder { radius: f32, height: f32 },
}

impl Collider {
    /// Distance from the body centre to the bottom of the shape.
    pub fn half_height(&self) -> f32 {
        match *self {
            Collider::Sphere { radius } => radius,
            Collider::Cuboid { half_extents } => half_extents.y,
            Collider::Cylinder { height, .. } => height * 0.5,
        }
    }
}

/// Membership/filter bitmasks deciding which bodies can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionGroups {
    pub memberships: u32,
    pub filter: u32,
}

impl CollisionGroups {
    pub const CHARACTER: u32 = 1 << 0;
    pub const PROP: u32 = 1 << 1;
    pub const PROJECTILE: u32 = 1 << 2;
    pub const GROUND: u32 = 1 << 3;
    pub const ALL: u32 = u32::MAX;

    pub const fn new(memberships: u32, filter: u32) -> Self {
        Self {
            memberships,
            filter,
        }
    }

    pub fn interacts_with(&self, other: &CollisionGroups) -> bool {
        self.memberships & other.filter != 0 && other.memberships & self.filter != 0
    }
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::new(Self::ALL, Self::ALL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub collider: Collider,
    pub position: Vec3,
    pub velocity: Vec3,
    pub mass: f32,
    pub groups: CollisionGroups,
}

impl BodyDesc {
    pub fn new(kind: BodyKind, collider: Collider, position: Vec3) -> Self {
        Self {
            kind,
            collider,
            position,
            velocity: Vec3::ZERO,
            mass: 1.0,
            groups: CollisionGroups::default(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_groups(mut self, groups: CollisionGroups) -> Self {
        self.groups = groups;
        self
    }
}

/// A contact reported to a subscribed `body`; `other` is its partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionEvent {
    pub body: BodyHandle,
    pub other: BodyHandle,
}

/// Rigid-body world the runtime drives but never implements physics for.
///
/// Collision events are delivered synchronously from [`PhysicsWorld::step`]
/// for subscribed bodies, once per pair on the step their contact begins.
pub trait PhysicsWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;
    /// Returns `false` if the body was already gone.
    fn remove_body(&mut self, handle: BodyHandle) -> bool;
    fn contains(&self, handle: BodyHandle) -> bool;
    fn body_count(&self) -> usize;
    fn set_position(&mut self, handle: BodyHandle, position: Vec3);
    fn position(&self, handle: BodyHandle) -> Option<Vec3>;
    fn kind(&self, handle: BodyHandle) -> Option<BodyKind>;
    fn subscribe(&mut self, handle: BodyHandle);
    fn step(&mut self, dt: f32) -> Vec<CollisionEvent>;
}
