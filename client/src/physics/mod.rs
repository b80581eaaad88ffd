pub mod proxy;
pub mod rapier_world;
pub mod reactions;
pub mod world;

pub use proxy::{
    BombConfig, CharacterBodyConfig, DestroyedBody, EphemeralBody, EphemeralKind,
    PhysicsProxySync, PropBody, PropDesc,
};
pub use reactions::{CollisionReactionTable, Reaction, ReactionEffect};
pub use rapier_world::{DEFAULT_GRAVITY, RapierWorld};
pub use world::{
    BodyDesc, BodyHandle, BodyKind, Collider, CollisionEvent, CollisionGroups, PhysicsWorld,
};
