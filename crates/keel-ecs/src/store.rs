//! Sparse-set component storage.

use rustc_hash::FxHashMap;

use crate::table::Entity;

/// Dense, cache-friendly storage mapping entities to values of one type.
///
/// Values live contiguously in a dense array with no holes; a sparse index
/// maps each owning entity to its slot. Insert, remove, and lookup are all
/// O(1); removal swaps the victim's slot with the last occupied slot and
/// truncates, so iteration order is not stable across removals.
pub struct ComponentStore<T> {
    /// Owning entity per dense slot.
    entities: Vec<Entity>,
    /// Component values, parallel to `entities`.
    dense: Vec<T>,
    /// Entity id to dense slot.
    index: FxHashMap<Entity, usize>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            dense: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Insert a value for an entity. If the entity already has one, the old
    /// value is overwritten in place; no duplicate dense slot is created.
    pub fn insert(&mut self, entity: Entity, value: T) {
        if let Some(&slot) = self.index.get(&entity) {
            self.dense[slot] = value;
        } else {
            self.index.insert(entity, self.dense.len());
            self.entities.push(entity);
            self.dense.push(value);
        }
    }

    /// Remove an entity's value, if present. The last occupied slot is
    /// swapped into the vacated position to keep the dense array hole-free.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let slot = self.index.remove(&entity)?;
        let value = self.dense.swap_remove(slot);
        self.entities.swap_remove(slot);
        if let Some(&displaced) = self.entities.get(slot) {
            self.index.insert(displaced, slot);
        }
        Some(value)
    }

    /// The value for an entity.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no value here. Callers are expected to have
    /// checked [`has`](Self::has) or to know the component is present by
    /// construction; absence is a programming error, not a runtime
    /// condition.
    #[must_use]
    pub fn get(&self, entity: Entity) -> &T {
        self.try_get(entity)
            .unwrap_or_else(|| panic!("no component for entity {entity}"))
    }

    /// Mutable variant of [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// Panics if the entity has no value here.
    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> &mut T {
        match self.index.get(&entity) {
            Some(&slot) => &mut self.dense[slot],
            None => panic!("no component for entity {entity}"),
        }
    }

    /// The value for an entity, or `None` if absent.
    #[must_use]
    pub fn try_get(&self, entity: Entity) -> Option<&T> {
        self.index.get(&entity).map(|&slot| &self.dense[slot])
    }

    /// Mutable variant of [`try_get`](Self::try_get).
    #[must_use]
    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = *self.index.get(&entity)?;
        Some(&mut self.dense[slot])
    }

    /// Whether the entity has a value here.
    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Number of entities with a value here.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the store holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Iterate over `(entity, value)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Mutable variant of [`iter`](Self::iter).
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }
}

/// Type-erased removal entry point.
///
/// Implemented for every [`ComponentStore`], so the entity compactor can
/// erase an entity's data from stores of arbitrarily different component
/// types without compile-time knowledge of any of them.
pub trait RemoveComponent: Send {
    /// Remove the entity's value if present; no-op otherwise.
    fn remove_entity(&mut self, entity: Entity);
}

impl<T: Send> RemoveComponent for ComponentStore<T> {
    fn remove_entity(&mut self, entity: Entity) {
        self.remove(entity);
    }
}
