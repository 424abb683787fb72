//! Scope enumerations.
//!
//! A warp name is unique within a scope. The registry runs in one
//! [`ScopeMode`] for its whole lifetime; every lookup is keyed by a
//! [`ScopeKey`].

use serde::{Deserialize, Serialize};

/// Registry-wide namespace mode, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeMode {
    /// Every world has its own independent namespace.
    PerWorld,
    /// A single flat namespace shared by all worlds.
    Global,
}

impl ScopeMode {
    /// Build the mode from the `per_world` configuration flag.
    pub const fn from_per_world(per_world: bool) -> Self {
        if per_world { Self::PerWorld } else { Self::Global }
    }

    /// Whether warps are namespaced per world.
    pub const fn is_per_world(self) -> bool {
        matches!(self, Self::PerWorld)
    }
}

/// The namespace a warp name lives in.
///
/// Ordered so that global entries sort before world entries, and world
/// entries sort by world name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKey {
    /// The single flat namespace.
    Global,
    /// The namespace of one world.
    World(String),
}

impl ScopeKey {
    /// Return the world name for world scopes, `None` for the global scope.
    pub fn world_name(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::World(name) => Some(name),
        }
    }
}

impl core::fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::World(name) => write!(f, "world:{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_flag() {
        assert_eq!(ScopeMode::from_per_world(true), ScopeMode::PerWorld);
        assert_eq!(ScopeMode::from_per_world(false), ScopeMode::Global);
        assert!(ScopeMode::PerWorld.is_per_world());
        assert!(!ScopeMode::Global.is_per_world());
    }

    #[test]
    fn scope_key_world_name() {
        assert_eq!(ScopeKey::Global.world_name(), None);
        assert_eq!(
            ScopeKey::World(String::from("nether")).world_name(),
            Some("nether")
        );
    }

    #[test]
    fn global_sorts_first() {
        let mut keys = vec![
            ScopeKey::World(String::from("b")),
            ScopeKey::Global,
            ScopeKey::World(String::from("a")),
        ];
        keys.sort();
        assert_eq!(keys.first(), Some(&ScopeKey::Global));
        assert_eq!(keys.get(1), Some(&ScopeKey::World(String::from("a"))));
    }
}
