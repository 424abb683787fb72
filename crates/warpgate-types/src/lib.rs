//! Shared type definitions for the Warpgate named-location registry.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace: who is acting, where things are, and how warp names are
//! namespaced.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for actor identifiers
//! - [`enums`] -- Scope mode and scope keys
//! - [`structs`] -- Actors, senders, positions, and named locations

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{ScopeKey, ScopeMode};
pub use ids::ActorId;
pub use structs::{Actor, NamedLocation, Position, Sender, SessionKey};
