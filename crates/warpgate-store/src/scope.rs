//! Scope resolution.
//!
//! Decides which namespace a request addresses. In global mode every
//! request lands in [`ScopeKey::Global`] no matter which world it names;
//! in per-world mode an explicit world wins over the sender's own world.

use warpgate_types::{Position, ScopeKey, ScopeMode};

use crate::error::StoreError;

/// Maps world arguments to [`ScopeKey`]s for a fixed [`ScopeMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeResolver {
    mode: ScopeMode,
}

impl ScopeResolver {
    /// Create a resolver for the given mode.
    pub const fn new(mode: ScopeMode) -> Self {
        Self { mode }
    }

    /// The mode this resolver was built with.
    pub const fn mode(&self) -> ScopeMode {
        self.mode
    }

    /// Resolve the scope for a request.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AmbiguousScope`] in per-world mode when neither
    /// an explicit world nor the acting player's world is available.
    pub fn resolve(
        &self,
        explicit_world: Option<&str>,
        acting_world: Option<&str>,
    ) -> Result<ScopeKey, StoreError> {
        match self.mode {
            ScopeMode::Global => Ok(ScopeKey::Global),
            ScopeMode::PerWorld => explicit_world
                .or(acting_world)
                .map(|world| ScopeKey::World(world.to_owned()))
                .ok_or(StoreError::AmbiguousScope),
        }
    }

    /// Scope a warp at `position` is stored under.
    pub fn for_position(&self, position: &Position) -> ScopeKey {
        match self.mode {
            ScopeMode::Global => ScopeKey::Global,
            ScopeMode::PerWorld => ScopeKey::World(position.world.clone()),
        }
    }

    /// Collapse a caller-supplied key onto the namespace that actually
    /// exists in this mode.
    pub fn normalize(&self, scope: &ScopeKey) -> ScopeKey {
        match self.mode {
            ScopeMode::Global => ScopeKey::Global,
            ScopeMode::PerWorld => scope.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_mode_ignores_worlds() {
        let resolver = ScopeResolver::new(ScopeMode::Global);
        assert_eq!(resolver.resolve(Some("a"), Some("b")).ok(), Some(ScopeKey::Global));
        assert_eq!(resolver.resolve(None, None).ok(), Some(ScopeKey::Global));
        assert_eq!(
            resolver.normalize(&ScopeKey::World(String::from("a"))),
            ScopeKey::Global
        );
    }

    #[test]
    fn per_world_prefers_explicit_world() {
        let resolver = ScopeResolver::new(ScopeMode::PerWorld);
        assert_eq!(
            resolver.resolve(Some("nether"), Some("world")).ok(),
            Some(ScopeKey::World(String::from("nether")))
        );
        assert_eq!(
            resolver.resolve(None, Some("world")).ok(),
            Some(ScopeKey::World(String::from("world")))
        );
    }

    #[test]
    fn per_world_without_any_world_is_ambiguous() {
        let resolver = ScopeResolver::new(ScopeMode::PerWorld);
        assert!(matches!(
            resolver.resolve(None, None),
            Err(StoreError::AmbiguousScope)
        ));
    }

    #[test]
    fn position_scope_follows_mode() {
        let pos = Position::new("end", 0.0, 0.0, 0.0);
        assert_eq!(
            ScopeResolver::new(ScopeMode::PerWorld).for_position(&pos),
            ScopeKey::World(String::from("end"))
        );
        assert_eq!(
            ScopeResolver::new(ScopeMode::Global).for_position(&pos),
            ScopeKey::Global
        );
    }
}
