//! Cascading entity destruction.

use std::sync::Arc;

use keel_event::EventChannel;
use parking_lot::Mutex;
use tracing::debug;

use crate::store::RemoveComponent;
use crate::table::{Entity, EntityTable};

/// Notification that an entity should be destroyed.
///
/// Emitted by gameplay systems into a double-buffered channel and consumed
/// by the [`EntityCompactor`] one tick later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDestroyed {
    /// The entity to destroy.
    pub entity: Entity,
}

/// Cascades destruction events into removal across every registered store.
///
/// Each registered store is invoked unconditionally per destroyed entity;
/// removal is a no-op for stores that never held data for it. Iteration
/// order across stores is unspecified (the stores are independent). After
/// the cascade the id is retired in the entity table, which restores the
/// signature invariant: no store holds data for a dead entity.
pub struct EntityCompactor {
    table: Arc<Mutex<EntityTable>>,
    stores: Vec<Arc<Mutex<dyn RemoveComponent>>>,
}

impl EntityCompactor {
    /// Create a compactor retiring ids into the given table.
    #[must_use]
    pub fn new(table: Arc<Mutex<EntityTable>>) -> Self {
        Self {
            table,
            stores: Vec::new(),
        }
    }

    /// Register a component store to participate in the cascade.
    pub fn add(&mut self, store: Arc<Mutex<dyn RemoveComponent>>) {
        self.stores.push(store);
    }

    /// Drain the readable buffer of the destruction channel: for every
    /// event, remove the entity's data from all registered stores, then
    /// retire its id.
    pub fn compact(&mut self, channel: &EventChannel<EntityDestroyed>) {
        for event in channel.poll() {
            for store in &self.stores {
                store.lock().remove_entity(event.entity);
            }
            self.table.lock().destroy(event.entity);
            debug!(entity = event.entity, "compacted destroyed entity");
        }
    }

    /// Number of registered stores.
    #[must_use]
    pub fn store_count(&self) -> usize {
        self.stores.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ComponentStore;

    #[derive(Debug, Clone, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[test]
    fn test_compact_removes_entity_from_all_stores() {
        let table = Arc::new(Mutex::new(EntityTable::new()));
        let (entity_a, entity_b, entity_c) = {
            let mut table = table.lock();
            (table.create(), table.create(), table.create())
        };

        let positions = Arc::new(Mutex::new(ComponentStore::new()));
        {
            let mut positions = positions.lock();
            positions.insert(entity_a, Position { x: 1.0, y: 2.0 });
            positions.insert(entity_b, Position { x: 3.0, y: 4.0 });
            positions.insert(entity_c, Position { x: 5.0, y: 6.0 });
        }

        let velocities = Arc::new(Mutex::new(ComponentStore::new()));
        {
            let mut velocities = velocities.lock();
            velocities.insert(entity_a, Velocity { dx: 0.1, dy: 0.2 });
            velocities.insert(entity_b, Velocity { dx: 0.3, dy: 0.4 });
            velocities.insert(entity_c, Velocity { dx: 0.5, dy: 0.6 });
        }

        let mut channel = EventChannel::new();
        channel.emit(EntityDestroyed { entity: entity_b });
        channel.swap();

        let mut compactor = EntityCompactor::new(table.clone());
        compactor.add(positions.clone());
        compactor.add(velocities.clone());
        assert_eq!(compactor.store_count(), 2);

        compactor.compact(&channel);

        assert_eq!(positions.lock().len(), 2);
        assert_eq!(velocities.lock().len(), 2);
        assert!(!table.lock().alive(entity_b));

        let positions = positions.lock();
        assert_eq!(positions.get(entity_a), &Position { x: 1.0, y: 2.0 });
        assert_eq!(positions.get(entity_c), &Position { x: 5.0, y: 6.0 });

        let velocities = velocities.lock();
        assert_eq!(velocities.get(entity_a), &Velocity { dx: 0.1, dy: 0.2 });
        assert_eq!(velocities.get(entity_c), &Velocity { dx: 0.5, dy: 0.6 });
    }

    #[test]
    fn test_compact_tolerates_stores_without_the_entity() {
        let table = Arc::new(Mutex::new(EntityTable::new()));
        let entity = table.lock().create();

        // This store never held data for the entity.
        let healths: Arc<Mutex<ComponentStore<u32>>> = Arc::new(Mutex::new(ComponentStore::new()));

        let mut channel = EventChannel::new();
        channel.emit(EntityDestroyed { entity });
        channel.swap();

        let mut compactor = EntityCompactor::new(table.clone());
        compactor.add(healths.clone());
        compactor.compact(&channel);

        assert!(healths.lock().is_empty());
        assert!(!table.lock().alive(entity));
    }

    #[test]
    fn test_compact_on_empty_channel_is_noop() {
        let table = Arc::new(Mutex::new(EntityTable::new()));
        let entity = table.lock().create();

        let channel = EventChannel::new();
        let mut compactor = EntityCompactor::new(table.clone());
        compactor.compact(&channel);

        assert!(table.lock().alive(entity));
    }

    #[test]
    fn test_duplicate_destruction_events_are_harmless() {
        let table = Arc::new(Mutex::new(EntityTable::new()));
        let entity = table.lock().create();

        let positions = Arc::new(Mutex::new(ComponentStore::new()));
        positions.lock().insert(entity, Position { x: 0.0, y: 0.0 });

        let mut channel = EventChannel::new();
        channel.emit(EntityDestroyed { entity });
        channel.emit(EntityDestroyed { entity });
        channel.swap();

        let mut compactor = EntityCompactor::new(table.clone());
        compactor.add(positions.clone());
        compactor.compact(&channel);

        assert!(positions.lock().is_empty());
        assert!(!table.lock().alive(entity));
        // The id must not sit on the free list twice.
        let recreated = {
            let mut table = table.lock();
            (table.create(), table.create())
        };
        assert_ne!(recreated.0, recreated.1);
    }
}
