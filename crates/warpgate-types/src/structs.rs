//! Core entity structs: actors, command senders, positions, and warps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::ActorId;

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

/// A live, addressable actor (a connected player).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identity.
    pub id: ActorId,
    /// Display name, also recorded as the owner of warps the actor creates.
    pub name: String,
}

impl Actor {
    /// Create an actor with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
        }
    }
}

/// Whoever issued a command.
///
/// Non-player senders (the server console, automation) have no position
/// and no world, so every operation that derives something from "where the
/// sender is standing" fails for them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sender {
    /// A live actor.
    Player(Actor),
    /// The server console.
    Console,
}

impl Sender {
    /// Name used for ownership comparisons and log fields.
    pub fn name(&self) -> &str {
        match self {
            Self::Player(actor) => &actor.name,
            Self::Console => "CONSOLE",
        }
    }

    /// The underlying actor, if the sender is a player.
    pub const fn as_player(&self) -> Option<&Actor> {
        match self {
            Self::Player(actor) => Some(actor),
            Self::Console => None,
        }
    }

    /// Key under which this sender's session state is stored.
    pub const fn session_key(&self) -> SessionKey {
        match self {
            Self::Player(actor) => SessionKey::Player(actor.id),
            Self::Console => SessionKey::Console,
        }
    }

    /// Whether `actor` is the sender itself.
    pub fn is_actor(&self, actor: &Actor) -> bool {
        self.as_player().is_some_and(|me| me.id == actor.id)
    }
}

/// Identity of a sender's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SessionKey {
    /// A player's session.
    Player(ActorId),
    /// The console's session.
    Console,
}

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// A point in a world, with facing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Name of the world this position belongs to.
    pub world: String,
    /// East/west coordinate.
    pub x: f64,
    /// Height.
    pub y: f64,
    /// North/south coordinate.
    pub z: f64,
    /// Horizontal facing in degrees.
    #[serde(default)]
    pub yaw: f32,
    /// Vertical facing in degrees.
    #[serde(default)]
    pub pitch: f32,
}

impl Position {
    /// Create a position with zero facing.
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Return a copy with the given facing.
    #[must_use]
    pub fn with_facing(mut self, yaw: f32, pitch: f32) -> Self {
        self.yaw = yaw;
        self.pitch = pitch;
        self
    }
}

// ---------------------------------------------------------------------------
// Named locations
// ---------------------------------------------------------------------------

/// A stored, named teleport destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedLocation {
    /// Name as given by the creator; lookups compare it case-insensitively.
    pub name: String,
    /// World namespace the warp is stored in. `None` means global.
    pub world_name: Option<String>,
    /// The destination.
    pub position: Position,
    /// Name of the actor that created the warp, `None` for non-player creators.
    pub creator_name: Option<String>,
    /// When the warp was created or last overwritten.
    pub created_at: DateTime<Utc>,
}

impl NamedLocation {
    /// The world a reader should be shown: the namespace world if any,
    /// otherwise the world the position lies in.
    pub fn display_world(&self) -> &str {
        self.world_name.as_deref().unwrap_or(&self.position.world)
    }

    /// Whether the warp was created by the actor named `name`.
    pub fn is_owned_by(&self, name: &str) -> bool {
        self.creator_name.as_deref() == Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warp(world_name: Option<&str>) -> NamedLocation {
        NamedLocation {
            name: String::from("home"),
            world_name: world_name.map(String::from),
            position: Position::new("world", 1.0, 64.0, -3.5),
            creator_name: Some(String::from("Alice")),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn console_has_no_player() {
        let sender = Sender::Console;
        assert!(sender.as_player().is_none());
        assert_eq!(sender.session_key(), SessionKey::Console);
        assert_eq!(sender.name(), "CONSOLE");
    }

    #[test]
    fn player_sender_identity() {
        let alice = Actor::new("Alice");
        let bob = Actor::new("Bob");
        let sender = Sender::Player(alice.clone());
        assert!(sender.is_actor(&alice));
        assert!(!sender.is_actor(&bob));
        assert_eq!(sender.session_key(), SessionKey::Player(alice.id));
    }

    #[test]
    fn display_world_prefers_namespace() {
        assert_eq!(warp(Some("nether")).display_world(), "nether");
        assert_eq!(warp(None).display_world(), "world");
    }

    #[test]
    fn ownership_is_exact_name_match() {
        let w = warp(None);
        assert!(w.is_owned_by("Alice"));
        assert!(!w.is_owned_by("alice"));
        let unowned = NamedLocation {
            creator_name: None,
            ..w
        };
        assert!(!unowned.is_owned_by("Alice"));
    }

    #[test]
    fn position_facing_defaults_when_absent() {
        let json = r#"{"world":"w","x":1.0,"y":2.0,"z":3.0}"#;
        let pos: Result<Position, _> = serde_json::from_str(json);
        assert!(pos.is_ok());
        if let Ok(p) = pos {
            assert_eq!(p, Position::new("w", 1.0, 2.0, 3.0));
        }
    }
}
