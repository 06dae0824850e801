//! keel ECS - entity identity, component storage, cascading destruction.
//!
//! # Key Concepts
//!
//! - **Entity**: a lightweight `u32` identifier; carries no data itself
//! - **Signature**: per-entity bitset of the component kinds it currently has
//! - **ComponentStore**: sparse-set storage mapping entities to one typed value
//! - **EntityCompactor**: fans a single destruction event out to every
//!   registered store, then retires the id
//!
//! Destruction is deliberately indirect: systems emit an [`EntityDestroyed`]
//! event into a double-buffered channel, and the compactor drains the
//! channel one tick later. Removal is a no-op for stores that never held
//! data for the entity, which is what makes the cascade safe to run
//! unconditionally.

mod compactor;
mod signature;
mod store;
mod table;

pub use compactor::{EntityCompactor, EntityDestroyed};
pub use signature::{ComponentKind, Signature};
pub use store::{ComponentStore, RemoveComponent};
pub use table::{Entity, EntityTable};
