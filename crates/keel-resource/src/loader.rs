//! Named resource loaders.

use hashbrown::HashMap;
use thiserror::Error;

/// Builds a resource from one serialized source entry.
pub type LoaderFn<T> = Box<dyn Fn(&serde_json::Value) -> eyre::Result<T> + Send + Sync>;

/// Loader lookup failures.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// Serialized data referenced a loader name nobody registered.
    /// Usually indicates drift between data files and the running build.
    #[error("no loader registered for '{name}'")]
    UnknownLoader {
        /// The offending loader name.
        name: String,
    },
}

/// Maps loader names to resource-building functions.
///
/// Serialized resource sources carry the name of the loader that should
/// rebuild them; deserialization resolves the name here. Lookup of an
/// unregistered name fails with the offending name in the message.
pub struct ResourceLoaderRegistry<T> {
    loaders: HashMap<String, LoaderFn<T>>,
}

impl<T> Default for ResourceLoaderRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResourceLoaderRegistry<T> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Register a loader under a name. A later registration under the same
    /// name replaces the earlier one.
    pub fn add(
        &mut self,
        name: &str,
        loader: impl Fn(&serde_json::Value) -> eyre::Result<T> + Send + Sync + 'static,
    ) {
        self.loaders.insert(name.to_string(), Box::new(loader));
    }

    /// The loader registered under a name.
    ///
    /// # Errors
    ///
    /// [`ResourceError::UnknownLoader`] carrying the name.
    pub fn get(&self, name: &str) -> Result<&LoaderFn<T>, ResourceError> {
        self.loaders
            .get(name)
            .ok_or_else(|| ResourceError::UnknownLoader {
                name: name.to_string(),
            })
    }

    /// Whether a loader is registered under the name.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// Number of registered loaders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// Whether no loaders are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }
}
