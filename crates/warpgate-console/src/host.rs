//! In-memory game host used by the console.
//!
//! Stands in for a real game server: a fixed list of worlds, a roster of
//! online players with positions, and a capability table, all seeded from
//! the `host` section of the configuration file. Teleports simply update
//! the stored position.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::info;
use warpgate_core::{ActorDirectory, MoveError, Movement, PermissionEngine};
use warpgate_types::{Actor, Position, Sender};

use crate::error::ConsoleError;

/// Capability entry granting everything.
const WILDCARD: &str = "*";

/// Token resolving to the default world.
const MAIN_WORLD_TOKEN: &str = "#main";

/// The `host` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HostConfig {
    /// Worlds that exist on the server.
    #[serde(default = "default_worlds")]
    pub worlds: Vec<String>,

    /// Players online at startup.
    #[serde(default)]
    pub actors: Vec<ActorConfig>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            worlds: default_worlds(),
            actors: Vec::new(),
        }
    }
}

/// One online player.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActorConfig {
    /// Player name.
    pub name: String,
    /// Starting position.
    pub position: Position,
    /// Granted capabilities; `"*"` grants everything.
    #[serde(default)]
    pub capabilities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HostFile {
    #[serde(default)]
    host: HostConfig,
}

impl HostConfig {
    /// Read the `host` section from the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Io`] if the file cannot be read, otherwise
    /// the errors of [`parse`](Self::parse).
    pub fn from_file(path: &Path) -> Result<Self, ConsoleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse the `host` section from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::HostYaml`] if the YAML is malformed or
    /// [`ConsoleError::UnknownActorWorld`] if an actor stands in a world
    /// that is not listed.
    pub fn parse(yaml: &str) -> Result<Self, ConsoleError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let file: HostFile = serde_yml::from_str(yaml)?;
        let config = file.host;
        if let Some(stray) = config
            .actors
            .iter()
            .find(|a| !config.worlds.contains(&a.position.world))
        {
            return Err(ConsoleError::UnknownActorWorld {
                actor: stray.name.clone(),
                world: stray.position.world.clone(),
            });
        }
        Ok(config)
    }
}

fn default_worlds() -> Vec<String> {
    vec![String::from("world")]
}

#[derive(Debug, Clone)]
struct OnlineActor {
    actor: Actor,
    position: Position,
    capabilities: BTreeSet<String>,
}

/// Directory, permission engine, and movement for the console.
#[derive(Debug)]
pub struct ConsoleHost {
    worlds: Vec<String>,
    default_world: String,
    online: RwLock<BTreeMap<String, OnlineActor>>,
}

impl ConsoleHost {
    /// Build the host from configuration.
    pub fn new(config: &HostConfig, default_world: &str) -> Self {
        let online = config
            .actors
            .iter()
            .map(|a| {
                let entry = OnlineActor {
                    actor: Actor::new(a.name.clone()),
                    position: a.position.clone(),
                    capabilities: a.capabilities.iter().cloned().collect(),
                };
                (a.name.to_lowercase(), entry)
            })
            .collect();
        Self {
            worlds: config.worlds.clone(),
            default_world: default_world.to_owned(),
            online: RwLock::new(online),
        }
    }

    /// The online player named `name` (case-insensitive).
    pub fn actor(&self, name: &str) -> Option<Actor> {
        self.online
            .read()
            .get(&name.to_lowercase())
            .map(|o| o.actor.clone())
    }

    /// Take a player offline. Returns the actor if they were online.
    pub fn disconnect(&self, name: &str) -> Option<Actor> {
        let removed = self.online.write().remove(&name.to_lowercase());
        if let Some(entry) = &removed {
            info!(actor = %entry.actor.name, "Actor disconnected");
        }
        removed.map(|o| o.actor)
    }

    /// Names of everyone online, sorted.
    pub fn online_names(&self) -> Vec<String> {
        self.online
            .read()
            .values()
            .map(|o| o.actor.name.clone())
            .collect()
    }
}

impl ActorDirectory for ConsoleHost {
    /// `*` is everyone, `@name` is an exact name, anything else is a
    /// case-insensitive prefix (an exact name wins over prefix matches).
    fn match_actors(&self, _sender: &Sender, pattern: &str) -> Vec<Actor> {
        let online = self.online.read();
        if pattern == "*" {
            return online.values().map(|o| o.actor.clone()).collect();
        }
        let wanted = pattern.to_lowercase();
        if let Some(exact) = wanted.strip_prefix('@') {
            return online.get(exact).map(|o| o.actor.clone()).into_iter().collect();
        }
        if let Some(exact) = online.get(&wanted) {
            return vec![exact.actor.clone()];
        }
        online
            .iter()
            .filter(|(name, _)| name.starts_with(&wanted))
            .map(|(_, o)| o.actor.clone())
            .collect()
    }

    fn position_of(&self, actor: &Actor) -> Option<Position> {
        self.online
            .read()
            .values()
            .find(|o| o.actor.id == actor.id)
            .map(|o| o.position.clone())
    }

    fn match_world(&self, _sender: &Sender, token: &str) -> Option<String> {
        if token.eq_ignore_ascii_case(MAIN_WORLD_TOKEN) {
            return Some(self.default_world.clone());
        }
        self.worlds
            .iter()
            .find(|w| w.eq_ignore_ascii_case(token))
            .cloned()
    }
}

impl PermissionEngine for ConsoleHost {
    fn has_capability(&self, sender: &Sender, capability: &str) -> bool {
        let Some(actor) = sender.as_player() else {
            return true;
        };
        self.online
            .read()
            .values()
            .find(|o| o.actor.id == actor.id)
            .is_some_and(|o| o.capabilities.contains(WILDCARD) || o.capabilities.contains(capability))
    }
}

impl Movement for ConsoleHost {
    fn move_actor(
        &self,
        actor: &Actor,
        destination: &Position,
        silent: bool,
    ) -> Result<(), MoveError> {
        if !self.worlds.contains(&destination.world) {
            return Err(MoveError::Rejected(format!(
                "world {} is not loaded",
                destination.world
            )));
        }
        let mut online = self.online.write();
        let entry = online
            .values_mut()
            .find(|o| o.actor.id == actor.id)
            .ok_or_else(|| MoveError::Offline(actor.name.clone()))?;
        entry.position = destination.clone();
        if !silent {
            info!(
                actor = %actor.name,
                world = %destination.world,
                x = destination.x,
                y = destination.y,
                z = destination.z,
                "Teleported"
            );
        }
        Ok(())
    }
}
