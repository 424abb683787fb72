//! Warp command orchestration.
//!
//! [`WarpService`] runs the decision procedure for each command against the
//! shared [`LocationStore`], the [`ConfirmationGate`], and the host
//! collaborators. Each call is independent: it reads what it needs, makes
//! at most one registry mutation, and reports a typed [`Reply`]. A failed
//! call never leaves the registry changed.

use std::sync::Arc;

use tracing::{debug, info, warn};
use warpgate_store::{Insertion, LocationStore};
use warpgate_types::{Actor, NamedLocation, Position, ScopeKey, Sender};

use crate::capability;
use crate::config::WarpsConfig;
use crate::confirm::ConfirmationGate;
use crate::error::WarpError;
use crate::host::Host;
use crate::present::{Page, paginate};

// ---------------------------------------------------------------------------
// Requests and replies
// ---------------------------------------------------------------------------

/// Arguments of a `warp` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarpRequest {
    /// Explicit world to look the warp up in.
    pub world: Option<String>,
    /// Player pattern selecting who to move; `None` moves the sender.
    pub target: Option<String>,
    /// Warp name.
    pub name: String,
    /// Suppress the teleport announcement.
    pub silent: bool,
}

/// Arguments of a `setwarp` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetWarpRequest {
    /// Warp name.
    pub name: String,
    /// Location argument; `None` uses the sender's position.
    pub location: Option<String>,
    /// Text identifying this exact command for overwrite confirmation.
    pub signature: String,
}

/// Arguments of `warps info` and `warps remove`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupRequest {
    /// Warp name.
    pub name: String,
    /// Explicit world; `None` uses the sender's world.
    pub world: Option<String>,
}

/// Arguments of `warps list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    /// 1-based page number.
    pub page: usize,
    /// Only warps created by this owner.
    pub owner: Option<String>,
    /// Only warps in this world.
    pub world: Option<String>,
}

impl Default for ListRequest {
    fn default() -> Self {
        Self {
            page: 1,
            owner: None,
            world: None,
        }
    }
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Targets were sent to a warp.
    Teleported {
        /// The destination warp.
        warp: NamedLocation,
        /// Targets the host moved.
        moved: Vec<Actor>,
        /// Targets the host failed to move.
        failed: Vec<Actor>,
        /// Whether the teleport was silent.
        silent: bool,
    },
    /// A warp was created or overwritten.
    Created {
        /// The stored warp.
        warp: NamedLocation,
        /// Whether an existing warp was replaced.
        replaced: bool,
    },
    /// Details of one warp.
    Info(NamedLocation),
    /// A warp was deleted.
    Removed(NamedLocation),
    /// One page of warps.
    Listing(Page<NamedLocation>),
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Runs warp commands against the shared registry.
#[derive(Debug)]
pub struct WarpService {
    store: Arc<LocationStore>,
    gate: ConfirmationGate,
    host: Host,
    page_size: usize,
}

impl WarpService {
    /// Build a service over `store` using the host collaborators.
    pub fn new(store: Arc<LocationStore>, host: Host, config: &WarpsConfig) -> Self {
        Self {
            store,
            gate: ConfirmationGate::new(config.confirmation.ttl()),
            host,
            page_size: config.listing.page_size,
        }
    }

    /// The shared registry.
    pub const fn store(&self) -> &Arc<LocationStore> {
        &self.store
    }

    /// The overwrite confirmation queue.
    pub const fn gate(&self) -> &ConfirmationGate {
        &self.gate
    }

    /// The host collaborators.
    pub const fn host(&self) -> &Host {
        &self.host
    }

    /// Fail with [`WarpError::PermissionDenied`] unless `sender` holds `capability`.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::PermissionDenied`] naming the missing capability.
    pub fn require(&self, sender: &Sender, capability: &str) -> Result<(), WarpError> {
        if self.host.permissions.has_capability(sender, capability) {
            Ok(())
        } else {
            Err(WarpError::PermissionDenied {
                capability: capability.to_owned(),
            })
        }
    }

    // -----------------------------------------------------------------------
    // warp
    // -----------------------------------------------------------------------

    /// Teleport the selected targets to a warp.
    ///
    /// Movement failures for individual targets are logged and reported in
    /// the reply but do not fail the command.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::RequiresPlayerContext`] when a non-player sends
    /// itself, [`WarpError::AmbiguousScope`] when no world can be
    /// determined, [`WarpError::NoActorsMatched`] or
    /// [`WarpError::UnknownWorld`] for unmatched arguments,
    /// [`WarpError::PermissionDenied`] for missing capabilities, and
    /// [`WarpError::NotFound`] when the warp does not exist.
    pub fn warp(&self, sender: &Sender, request: &WarpRequest) -> Result<Reply, WarpError> {
        let resolver = self.store.resolver();
        let (targets, scope) = match (&request.world, &request.target) {
            (world, None) => {
                let me = require_player(sender)?;
                let explicit = world
                    .as_deref()
                    .map(|w| self.match_world(sender, w))
                    .transpose()?;
                let scope = resolver.resolve(explicit.as_deref(), self.sender_world(sender).as_deref())?;
                (vec![me.clone()], scope)
            }
            (None, Some(pattern)) => {
                let targets = self.match_targets(sender, pattern)?;
                let scope = resolver.resolve(None, self.sender_world(sender).as_deref())?;
                (targets, scope)
            }
            (Some(world), Some(pattern)) => {
                let world = self.match_world(sender, world)?;
                let targets = self.match_targets(sender, pattern)?;
                (targets, resolver.resolve(Some(&world), None)?)
            }
        };

        if targets.iter().any(|target| !sender.is_actor(target)) {
            self.require(sender, capability::TELEPORT_OTHER)?;
        }

        let warp = self
            .store
            .get(&scope, &request.name)
            .ok_or_else(|| WarpError::NotFound {
                name: request.name.clone(),
            })?;

        self.check_teleport_to(sender, &warp)?;

        let mut moved = Vec::with_capacity(targets.len());
        let mut failed = Vec::new();
        for target in targets {
            match self
                .host
                .movement
                .move_actor(&target, &warp.position, request.silent)
            {
                Ok(()) => moved.push(target),
                Err(err) => {
                    warn!(
                        target = %target.name,
                        warp = %warp.name,
                        error = %err,
                        "Teleport failed for target, continuing"
                    );
                    failed.push(target);
                }
            }
        }

        info!(
            sender = sender.name(),
            warp = %warp.name,
            %scope,
            moved = moved.len(),
            failed = failed.len(),
            silent = request.silent,
            "Warp teleport complete"
        );
        Ok(Reply::Teleported {
            warp,
            moved,
            failed,
            silent: request.silent,
        })
    }

    /// The general teleport grant, or the per-warp grant as a fallback.
    /// A denial names the general capability.
    fn check_teleport_to(&self, sender: &Sender, warp: &NamedLocation) -> Result<(), WarpError> {
        let permissions = &self.host.permissions;
        if permissions.has_capability(sender, capability::TELEPORT)
            || permissions.has_capability(sender, &capability::warp_capability(&warp.name))
        {
            return Ok(());
        }
        Err(WarpError::PermissionDenied {
            capability: capability::TELEPORT.to_owned(),
        })
    }

    // -----------------------------------------------------------------------
    // setwarp
    // -----------------------------------------------------------------------

    /// Create a warp, or overwrite one after confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::RequiresPlayerContext`] when no location is given
    /// by a non-player, [`WarpError::InvalidLocation`],
    /// [`WarpError::UnknownWorld`] or [`WarpError::NoActorsMatched`] for a bad
    /// location argument, [`WarpError::PermissionDenied`] when overwriting
    /// someone else's warp without the override capability,
    /// [`WarpError::ConfirmationRequired`] the first time an existing warp
    /// would be overwritten, and [`WarpError::InvalidName`] for bad names.
    pub fn set_warp(&self, sender: &Sender, request: &SetWarpRequest) -> Result<Reply, WarpError> {
        let position = match &request.location {
            None => {
                let me = require_player(sender)?;
                self.host
                    .directory
                    .position_of(me)
                    .ok_or(WarpError::RequiresPlayerContext)?
            }
            Some(text) => self.resolve_location(sender, text)?,
        };

        let scope = self.store.resolver().for_position(&position);
        let creator = sender.as_player().map(|actor| actor.name.as_str());
        let session = sender.session_key();

        let existing = match self
            .store
            .create_if_absent(&request.name, position.clone(), creator)?
        {
            Insertion::Created(warp) => {
                // A confirmation queued against a warp that has since been
                // removed must not carry over to a later one.
                if self.gate.discard(session, &request.signature) {
                    debug!(sender = sender.name(), warp = %warp.name, "Dropped stale confirmation");
                }
                info!(sender = sender.name(), warp = %warp.name, %scope, replaced = false, "Warp stored");
                return Ok(Reply::Created {
                    warp,
                    replaced: false,
                });
            }
            Insertion::Occupied(existing) => existing,
        };

        if !existing.is_owned_by(sender.name()) {
            self.require(sender, capability::SET_OVERRIDE)?;
        }
        if !self.gate.check_or_queue(session, &request.signature) {
            info!(
                sender = sender.name(),
                warp = %existing.name,
                %scope,
                "Overwrite queued for confirmation"
            );
            return Err(WarpError::ConfirmationRequired {
                command: request.signature.clone(),
            });
        }

        let warp = self.store.create(&request.name, position, creator)?;
        info!(sender = sender.name(), warp = %warp.name, %scope, replaced = true, "Warp stored");
        Ok(Reply::Created {
            warp,
            replaced: true,
        })
    }

    // -----------------------------------------------------------------------
    // warps info / remove / list
    // -----------------------------------------------------------------------

    /// Show one warp.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::AmbiguousScope`], [`WarpError::UnknownWorld`] or
    /// [`WarpError::NotFound`].
    pub fn info(&self, sender: &Sender, request: &LookupRequest) -> Result<Reply, WarpError> {
        let scope = self.lookup_scope(sender, request.world.as_deref())?;
        self.store
            .get(&scope, &request.name)
            .map(Reply::Info)
            .ok_or_else(|| WarpError::NotFound {
                name: request.name.clone(),
            })
    }

    /// Delete a warp. Deleting someone else's warp needs an extra capability.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::AmbiguousScope`], [`WarpError::UnknownWorld`],
    /// [`WarpError::NotFound`] or [`WarpError::PermissionDenied`].
    pub fn remove(&self, sender: &Sender, request: &LookupRequest) -> Result<Reply, WarpError> {
        let scope = self.lookup_scope(sender, request.world.as_deref())?;
        let not_found = || WarpError::NotFound {
            name: request.name.clone(),
        };
        let existing = self.store.get(&scope, &request.name).ok_or_else(not_found)?;
        if !existing.is_owned_by(sender.name()) {
            self.require(sender, capability::REMOVE_OTHER)?;
        }
        if !self.store.remove(&scope, &request.name) {
            // Deleted concurrently between the lookup and the removal.
            return Err(not_found());
        }
        info!(sender = sender.name(), warp = %existing.name, %scope, "Warp removed");
        Ok(Reply::Removed(existing))
    }

    /// One page of warps, sorted by name, optionally filtered by owner
    /// and world. Both filters must match when both are given.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError::UnknownWorld`] for an unknown world filter or
    /// [`WarpError::PageOutOfRange`] for a page past the end.
    pub fn list(&self, sender: &Sender, request: &ListRequest) -> Result<Reply, WarpError> {
        let world = request
            .world
            .as_deref()
            .map(|w| self.match_world(sender, w))
            .transpose()?;
        let owner = request.owner.as_deref();

        let mut entries: Vec<NamedLocation> = self
            .store
            .list()
            .into_iter()
            .filter(|warp| {
                owner.is_none_or(|owner| {
                    warp.creator_name
                        .as_deref()
                        .is_some_and(|creator| creator.eq_ignore_ascii_case(owner))
                })
            })
            .filter(|warp| world.as_deref().is_none_or(|w| warp.display_world() == w))
            .collect();
        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.display_world().cmp(b.display_world()))
        });

        paginate(entries, request.page, self.page_size).map(Reply::Listing)
    }

    // -----------------------------------------------------------------------
    // Argument resolution
    // -----------------------------------------------------------------------

    fn lookup_scope(&self, sender: &Sender, world: Option<&str>) -> Result<ScopeKey, WarpError> {
        let explicit = world.map(|w| self.match_world(sender, w)).transpose()?;
        Ok(self
            .store
            .resolver()
            .resolve(explicit.as_deref(), self.sender_world(sender).as_deref())?)
    }

    fn sender_world(&self, sender: &Sender) -> Option<String> {
        sender
            .as_player()
            .and_then(|actor| self.host.directory.position_of(actor))
            .map(|position| position.world)
    }

    fn match_world(&self, sender: &Sender, token: &str) -> Result<String, WarpError> {
        self.host
            .directory
            .match_world(sender, token)
            .ok_or_else(|| WarpError::UnknownWorld {
                world: token.to_owned(),
            })
    }

    fn match_targets(&self, sender: &Sender, pattern: &str) -> Result<Vec<Actor>, WarpError> {
        let targets = self.host.directory.match_actors(sender, pattern);
        if targets.is_empty() {
            return Err(WarpError::NoActorsMatched {
                pattern: pattern.to_owned(),
            });
        }
        Ok(targets)
    }

    /// `[world:]x,y,z[,yaw,pitch]`, or a pattern naming exactly one actor.
    fn resolve_location(&self, sender: &Sender, text: &str) -> Result<Position, WarpError> {
        if let Some(coords) = parse_coordinates(text)? {
            let world = match coords.world {
                Some(token) => self.match_world(sender, token)?,
                None => self
                    .sender_world(sender)
                    .ok_or(WarpError::RequiresPlayerContext)?,
            };
            return Ok(Position::new(world, coords.x, coords.y, coords.z)
                .with_facing(coords.yaw, coords.pitch));
        }

        let matched = self.match_targets(sender, text)?;
        let [actor] = matched.as_slice() else {
            return Err(WarpError::InvalidLocation {
                input: text.to_owned(),
                reason: "matches more than one player",
            });
        };
        self.host
            .directory
            .position_of(actor)
            .ok_or_else(|| WarpError::NoActorsMatched {
                pattern: text.to_owned(),
            })
    }
}

fn require_player(sender: &Sender) -> Result<&Actor, WarpError> {
    sender.as_player().ok_or(WarpError::RequiresPlayerContext)
}

#[derive(Debug, PartialEq)]
struct Coordinates<'a> {
    world: Option<&'a str>,
    x: f64,
    y: f64,
    z: f64,
    yaw: f32,
    pitch: f32,
}

/// Parse a coordinate argument. `Ok(None)` means the text is not a
/// coordinate argument at all (no comma) and should be tried as a player.
fn parse_coordinates(text: &str) -> Result<Option<Coordinates<'_>>, WarpError> {
    if !text.contains(',') {
        return Ok(None);
    }
    let invalid = |reason| WarpError::InvalidLocation {
        input: text.to_owned(),
        reason,
    };

    let (world, coords) = match text.split_once(':') {
        Some((world, _)) if world.is_empty() => return Err(invalid("world name is empty")),
        Some((world, coords)) => (Some(world), coords),
        None => (None, text),
    };

    let parts: Vec<&str> = coords.split(',').map(str::trim).collect();
    let (x, y, z, facing) = match parts.as_slice() {
        [x, y, z] => (*x, *y, *z, None),
        [x, y, z, yaw, pitch] => (*x, *y, *z, Some((*yaw, *pitch))),
        _ => return Err(invalid("expected x,y,z or x,y,z,yaw,pitch")),
    };

    let coord = |s: &str| {
        s.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid("coordinates must be numbers"))
    };
    let angle = |s: &str| {
        s.parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid("facing must be numbers"))
    };

    let (yaw, pitch) = match facing {
        Some((yaw, pitch)) => (angle(yaw)?, angle(pitch)?),
        None => (0.0, 0.0),
    };

    Ok(Some(Coordinates {
        world,
        x: coord(x)?,
        y: coord(y)?,
        z: coord(z)?,
        yaw,
        pitch,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_not_coordinates() {
        assert!(matches!(parse_coordinates("Alice"), Ok(None)));
    }

    #[test]
    fn coordinate_triple() {
        let coords = parse_coordinates("10, 64.5,-3").unwrap().unwrap();
        assert_eq!(coords.world, None);
        assert!((coords.y - 64.5).abs() < f64::EPSILON);
        assert!((coords.z + 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn coordinates_with_world_and_facing() {
        let coords = parse_coordinates("nether:1,2,3,90,-15").unwrap().unwrap();
        assert_eq!(coords.world, Some("nether"));
        assert!((coords.yaw - 90.0).abs() < f32::EPSILON);
        assert!((coords.pitch + 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn malformed_coordinates() {
        for text in ["1,2", "1,2,3,4", "a,b,c", ":1,2,3", "1,2,inf"] {
            assert!(
                matches!(parse_coordinates(text), Err(WarpError::InvalidLocation { .. })),
                "{text}"
            );
        }
    }
}
