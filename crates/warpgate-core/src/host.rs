//! Interfaces to the host game server.
//!
//! The warp core never locates players, evaluates permission nodes, or
//! moves anyone itself. The host supplies these collaborators; the core
//! only calls them and interprets the results.

use std::sync::Arc;

use warpgate_types::{Actor, Position, Sender};

/// Errors reported by the host when moving an actor.
#[derive(Debug, thiserror::Error)]
pub enum MoveError {
    /// The actor disconnected before it could be moved.
    #[error("{0} is no longer online")]
    Offline(String),

    /// The host refused the move.
    #[error("movement rejected: {0}")]
    Rejected(String),
}

/// Looks up live actors and worlds.
pub trait ActorDirectory: Send + Sync {
    /// Resolve a player pattern to zero or more live actors, as seen by
    /// `sender`.
    fn match_actors(&self, sender: &Sender, pattern: &str) -> Vec<Actor>;

    /// Current position of a live actor.
    fn position_of(&self, actor: &Actor) -> Option<Position>;

    /// Resolve a world argument to the canonical world name.
    fn match_world(&self, sender: &Sender, token: &str) -> Option<String>;
}

/// Answers capability checks.
pub trait PermissionEngine: Send + Sync {
    /// Whether `sender` holds `capability`.
    fn has_capability(&self, sender: &Sender, capability: &str) -> bool;
}

/// Moves actors.
pub trait Movement: Send + Sync {
    /// Move `actor` to `destination`. When `silent` is set the host should
    /// not announce the teleport.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] if the actor could not be moved.
    fn move_actor(&self, actor: &Actor, destination: &Position, silent: bool)
    -> Result<(), MoveError>;
}

/// The bundle of host collaborators a [`WarpService`](crate::WarpService) needs.
#[derive(Clone)]
pub struct Host {
    /// Player and world lookup.
    pub directory: Arc<dyn ActorDirectory>,
    /// Capability checks.
    pub permissions: Arc<dyn PermissionEngine>,
    /// Actor movement.
    pub movement: Arc<dyn Movement>,
}

impl core::fmt::Debug for Host {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Host").finish_non_exhaustive()
    }
}
