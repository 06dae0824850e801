//! Key-addressed resource storage.

use hashbrown::HashMap;

use crate::handle::ResourceHandle;

/// Maps string keys to resources, addressed afterwards by opaque handles.
///
/// Storing under an existing key returns the existing handle and leaves the
/// stored data untouched; handles are never invalidated for the life of the
/// store.
pub struct ResourceStore<T> {
    resources: Vec<T>,
    keys: Vec<String>,
    key_to_handle: HashMap<String, u32>,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResourceStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            keys: Vec::new(),
            key_to_handle: HashMap::new(),
        }
    }

    /// Store a resource under a key and return its handle. If the key is
    /// already present the existing handle is returned and `data` is
    /// dropped.
    pub fn store(&mut self, key: &str, data: T) -> ResourceHandle<T> {
        if let Some(&raw) = self.key_to_handle.get(key) {
            return ResourceHandle::from_raw(raw);
        }
        let raw = self.resources.len() as u32;
        self.resources.push(data);
        self.keys.push(key.to_string());
        self.key_to_handle.insert(key.to_string(), raw);
        ResourceHandle::from_raw(raw)
    }

    /// The resource behind a handle.
    ///
    /// # Panics
    ///
    /// Panics on a handle that did not come from this store; that is a
    /// programming error, not a runtime condition.
    #[must_use]
    pub fn get(&self, handle: ResourceHandle<T>) -> &T {
        &self.resources[handle.raw() as usize]
    }

    /// Mutable variant of [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// Panics on a handle that did not come from this store.
    #[must_use]
    pub fn get_mut(&mut self, handle: ResourceHandle<T>) -> &mut T {
        &mut self.resources[handle.raw() as usize]
    }

    /// The key a handle was stored under.
    ///
    /// # Panics
    ///
    /// Panics on a handle that did not come from this store.
    #[must_use]
    pub fn key_of(&self, handle: ResourceHandle<T>) -> &str {
        &self.keys[handle.raw() as usize]
    }

    /// The handle for a key, if the key has been stored.
    #[must_use]
    pub fn handle_of(&self, key: &str) -> Option<ResourceHandle<T>> {
        self.key_to_handle
            .get(key)
            .map(|&raw| ResourceHandle::from_raw(raw))
    }

    /// Number of stored resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Iterate over `(key, resource)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.resources.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_get_roundtrip() {
        let mut store = ResourceStore::new();
        let handle = store.store("meshes/crate.obj", vec![1_u8, 2, 3]);

        assert_eq!(store.get(handle), &vec![1, 2, 3]);
        assert_eq!(store.key_of(handle), "meshes/crate.obj");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_existing_key_returns_existing_handle() {
        let mut store = ResourceStore::new();
        let first = store.store("tex", 10_u32);
        let second = store.store("tex", 99);

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        // The original data is untouched.
        assert_eq!(store.get(first), &10);
    }

    #[test]
    fn test_handle_lookup_by_key() {
        let mut store = ResourceStore::new();
        let handle = store.store("a", 1_u32);
        store.store("b", 2);

        assert_eq!(store.handle_of("a"), Some(handle));
        assert_eq!(store.handle_of("missing"), None);
    }

    #[test]
    fn test_get_mut_updates_resource() {
        let mut store = ResourceStore::new();
        let handle = store.store("counter", 0_u32);

        *store.get_mut(handle) += 5;
        assert_eq!(store.get(handle), &5);
    }

    #[test]
    fn test_iteration_preserves_storage_order() {
        let mut store = ResourceStore::new();
        store.store("first", 1_u32);
        store.store("second", 2);

        let pairs: Vec<_> = store.iter().collect();
        assert_eq!(pairs, vec![("first", &1), ("second", &2)]);
    }
}
