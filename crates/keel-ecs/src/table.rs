//! The entity table: id allocation, liveness, and signature queries.

use tracing::trace;

use crate::signature::{ComponentKind, Signature};

/// A 32-bit entity identifier.
///
/// Identifiers are unique among currently-alive entities; retired ids are
/// recycled by later creations.
pub type Entity = u32;

/// Owns entity identifiers, liveness flags, and component signatures.
///
/// Retired ids go onto a LIFO free list, so destroying an entity and
/// creating a new one yields the just-retired id.
#[derive(Default)]
pub struct EntityTable {
    /// Signature per slot, indexed by entity id.
    signatures: Vec<Signature>,
    /// Liveness per slot, indexed by entity id.
    alive: Vec<bool>,
    /// Retired ids available for reuse.
    free_list: Vec<Entity>,
}

impl EntityTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an entity: the most recently retired id if one exists,
    /// otherwise the next unused integer. The entity starts alive with an
    /// empty signature.
    pub fn create(&mut self) -> Entity {
        let entity = if let Some(recycled) = self.free_list.pop() {
            let slot = recycled as usize;
            self.alive[slot] = true;
            self.signatures[slot] = Signature::empty();
            recycled
        } else {
            let id = self.signatures.len() as Entity;
            self.signatures.push(Signature::empty());
            self.alive.push(true);
            id
        };
        trace!(entity, "created entity");
        entity
    }

    /// Retire an entity: mark it dead, clear its signature, and make its id
    /// available for reuse.
    ///
    /// Destroying an already-dead or unknown id is a no-op, so cascading
    /// cleanup paths may call this more than once.
    pub fn destroy(&mut self, entity: Entity) {
        let slot = entity as usize;
        if slot >= self.alive.len() || !self.alive[slot] {
            return;
        }
        self.alive[slot] = false;
        self.signatures[slot] = Signature::empty();
        self.free_list.push(entity);
        trace!(entity, "destroyed entity");
    }

    /// Whether the id currently denotes a live entity.
    #[must_use]
    pub fn alive(&self, entity: Entity) -> bool {
        let slot = entity as usize;
        slot < self.alive.len() && self.alive[slot]
    }

    /// Set the signature bit for a component kind on a live entity.
    pub fn add_component(&mut self, entity: Entity, kind: ComponentKind) {
        if self.alive(entity) {
            self.signatures[entity as usize].set(kind);
        }
    }

    /// Clear the signature bit for a component kind on a live entity.
    pub fn remove_component(&mut self, entity: Entity, kind: ComponentKind) {
        if self.alive(entity) {
            self.signatures[entity as usize].clear(kind);
        }
    }

    /// The signature of a live entity, or `None` if the id is dead/unknown.
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Option<Signature> {
        self.alive(entity)
            .then(|| self.signatures[entity as usize])
    }

    /// Every live entity whose signature is a superset of `mask`.
    ///
    /// Linear scan in id order; no ordering guarantee is part of the
    /// contract.
    #[must_use]
    pub fn query(&self, mask: Signature) -> Vec<Entity> {
        let mut matches = Vec::new();
        for (id, signature) in self.signatures.iter().enumerate() {
            if self.alive[id] && signature.contains_all(mask) {
                matches.push(id as Entity);
            }
        }
        matches
    }

    /// Number of currently-alive entities.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }
}
