//! Resource storage for the keel runtime.
//!
//! Gameplay-level component stores hold opaque [`ResourceHandle`]s rather
//! than raw asset data; the handles resolve through a [`ResourceStore`]
//! keyed by string identifiers. [`ResourceLoaderRegistry`] maps loader
//! names (as referenced by serialized data) to functions that build a
//! resource from a JSON entry — an unknown loader name is a fatal error
//! surfaced with the offending name, since it indicates data/schema drift.

mod handle;
mod loader;
mod store;

pub use handle::ResourceHandle;
pub use loader::{LoaderFn, ResourceError, ResourceLoaderRegistry};
pub use store::ResourceStore;
