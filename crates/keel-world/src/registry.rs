//! The registry behind the World.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;
use thiserror::Error;

/// Numeric key assigned to a registered capability name.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingKey(u32);

impl BindingKey {
    /// The raw key value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        self.0
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BindingKey({})", self.0)
    }
}

/// World lookup and binding errors. All of these indicate a programming or
/// configuration error and are surfaced at the call site, never retried.
#[derive(Debug, Error)]
pub enum WorldError {
    /// The key does not come from this World's `register`.
    #[error("unknown binding key {0:?}")]
    UnknownKey(BindingKey),

    /// The name was registered but nothing has been bound under it.
    #[error("nothing bound under '{name}'")]
    Unbound {
        /// The registered capability name.
        name: String,
    },

    /// The bound state is of a different type than the caller requested.
    #[error("binding '{name}' is not of type {expected}")]
    TypeMismatch {
        /// The registered capability name.
        name: String,
        /// The type the caller asked for.
        expected: &'static str,
    },
}

/// Name-keyed registry of type-erased state handles.
///
/// `register` assigns (or returns) the key for a capability name; `bind`
/// associates a state handle with a key, overwriting any previous binding
/// so a plugin can reconstruct its state on reload; `get` retrieves and
/// downcasts the handle.
#[derive(Default)]
pub struct World {
    /// Capability name to key.
    keys: HashMap<String, BindingKey>,
    /// Name per key, indexed by key.
    names: Vec<String>,
    /// Bound state per key, indexed by key.
    bindings: Vec<Option<Arc<dyn Any + Send + Sync>>>,
}

impl World {
    /// Create an empty World.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a key for a capability name, or return the existing one.
    pub fn register(&mut self, name: &str) -> BindingKey {
        if let Some(&key) = self.keys.get(name) {
            return key;
        }
        let key = BindingKey(self.names.len() as u32);
        self.keys.insert(name.to_string(), key);
        self.names.push(name.to_string());
        self.bindings.push(None);
        key
    }

    /// The key for a name, if it was ever registered.
    #[must_use]
    pub fn key_of(&self, name: &str) -> Option<BindingKey> {
        self.keys.get(name).copied()
    }

    /// The name a key was registered under.
    #[must_use]
    pub fn name_of(&self, key: BindingKey) -> Option<&str> {
        self.names.get(key.index()).map(String::as_str)
    }

    /// Bind a state handle under a key. Rebinding overwrites the previous
    /// handle.
    ///
    /// # Errors
    ///
    /// [`WorldError::UnknownKey`] if the key does not come from
    /// [`register`](Self::register).
    pub fn bind<T: Send + 'static>(
        &mut self,
        key: BindingKey,
        state: Arc<Mutex<T>>,
    ) -> Result<(), WorldError> {
        let slot = self
            .bindings
            .get_mut(key.index())
            .ok_or(WorldError::UnknownKey(key))?;
        let erased: Arc<dyn Any + Send + Sync> = state;
        *slot = Some(erased);
        Ok(())
    }

    /// Retrieve the state handle bound under a key, downcast to `T`.
    ///
    /// # Errors
    ///
    /// - [`WorldError::UnknownKey`] for a key not from this World
    /// - [`WorldError::Unbound`] if nothing is bound under the key
    /// - [`WorldError::TypeMismatch`] if the binding holds a different type
    pub fn get<T: Send + 'static>(&self, key: BindingKey) -> Result<Arc<Mutex<T>>, WorldError> {
        let slot = self
            .bindings
            .get(key.index())
            .ok_or(WorldError::UnknownKey(key))?;
        let handle = slot.as_ref().ok_or_else(|| WorldError::Unbound {
            name: self.names[key.index()].clone(),
        })?;
        Arc::clone(handle)
            .downcast::<Mutex<T>>()
            .map_err(|_| WorldError::TypeMismatch {
                name: self.names[key.index()].clone(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Whether something is bound under the key.
    #[must_use]
    pub fn is_bound(&self, key: BindingKey) -> bool {
        self.bindings
            .get(key.index())
            .is_some_and(Option::is_some)
    }

    /// Number of registered capability names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no names are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("registered", &self.names.len())
            .field(
                "bound",
                &self.bindings.iter().filter(|b| b.is_some()).count(),
            )
            .finish()
    }
}
