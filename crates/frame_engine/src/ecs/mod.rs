//! Entities, components and their lifecycle
//!
//! Entities and components live in generational arenas owned by a
//! [`Scene`]. Behavior is supplied through the [`Entity`] and [`Component`]
//! traits; hooks receive an [`EntityCtx`] that exposes the scene.

pub mod component;
pub mod counter;
pub mod entity;
pub mod lifecycle;
pub mod scene;

pub use component::{Component, ComponentId};
pub use counter::InstanceCounter;
pub use entity::{Entity, EntityCtx, EntityId};
pub use scene::{ActorRef, Scene};
