//! Named-location registry for Warpgate.
//!
//! This crate owns the warp records: validation of names, the scope
//! namespaces they live in, the shared in-memory registry, and the JSON
//! snapshot file the host uses to make the registry durable.
//!
//! # Modules
//!
//! - [`error`] -- Error types for registry and persistence operations.
//! - [`name`] -- Warp name validation rules.
//! - [`scope`] -- [`ScopeResolver`] maps world arguments to scope keys.
//! - [`store`] -- [`LocationStore`], the lock-guarded registry map.
//! - [`persist`] -- [`WarpSnapshotFile`], load/save of the registry as JSON.

pub mod error;
pub mod name;
pub mod persist;
pub mod scope;
pub mod store;

// Re-export primary types at crate root.
pub use error::StoreError;
pub use name::{MAX_NAME_LEN, RESERVED_NAMES, validate_name};
pub use persist::WarpSnapshotFile;
pub use scope::ScopeResolver;
pub use store::{Insertion, LocationStore};
