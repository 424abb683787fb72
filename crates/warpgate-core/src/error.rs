//! Error types for warp commands.
//!
//! Every variant is user-facing: the host shows the `Display` text to the
//! sender. No variant is fatal to the service and none is retried
//! automatically. [`WarpError::ConfirmationRequired`] is the only one that
//! leaves state behind (the queued confirmation).

use warpgate_store::StoreError;

/// Errors returned by command dispatch and the warp service.
#[derive(Debug, thiserror::Error)]
pub enum WarpError {
    /// The warp name failed validation.
    #[error("Invalid warp name '{name}': {reason}.")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Which rule it broke.
        reason: &'static str,
    },

    /// No warp with that name exists in the resolved scope.
    #[error("A warp by the name '{name}' does not exist.")]
    NotFound {
        /// The requested name.
        name: String,
    },

    /// Warps are per-world and no world was given or inferable.
    #[error("Please specify a world.")]
    AmbiguousScope,

    /// The sender lacks a required capability.
    #[error("You don't have permission to do that ({capability}).")]
    PermissionDenied {
        /// The capability that was checked and denied.
        capability: String,
    },

    /// The command would overwrite a warp and has been queued for confirmation.
    #[error("Warp already exists! Type /confirm to confirm overwriting.")]
    ConfirmationRequired {
        /// The queued command text.
        command: String,
    },

    /// The command needs a live player as sender.
    #[error("A player context is required. (Specify a world or player if the command supports it.)")]
    RequiresPlayerContext,

    /// A world argument did not name a known world.
    #[error("Unknown world '{world}'.")]
    UnknownWorld {
        /// The unmatched world argument.
        world: String,
    },

    /// A player pattern matched nobody.
    #[error("No players matched query '{pattern}'.")]
    NoActorsMatched {
        /// The unmatched pattern.
        pattern: String,
    },

    /// A location argument could not be understood.
    #[error("Invalid location '{input}': {reason}.")]
    InvalidLocation {
        /// The rejected argument.
        input: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// Wrong number of arguments or an unknown flag.
    #[error("Usage: {usage}")]
    Usage {
        /// Usage line for the command.
        usage: String,
    },

    /// The command name is not registered.
    #[error("Unknown command '{name}'.")]
    UnknownCommand {
        /// The unknown command name.
        name: String,
    },

    /// `confirm` was issued with nothing pending.
    #[error("There is nothing to confirm.")]
    NothingToConfirm,

    /// A listing page past the end was requested.
    #[error("Unknown page selected! {total} total pages.")]
    PageOutOfRange {
        /// The requested page.
        page: usize,
        /// Number of pages available.
        total: usize,
    },

    /// The registry reported an unexpected failure.
    #[error("Warp storage error: {source}")]
    Storage {
        /// The underlying registry error.
        #[source]
        source: StoreError,
    },
}

impl From<StoreError> for WarpError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidName { name, reason } => Self::InvalidName { name, reason },
            StoreError::AmbiguousScope => Self::AmbiguousScope,
            source => Self::Storage { source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_user_errors() {
        let invalid = WarpError::from(StoreError::InvalidName {
            name: String::from("a b"),
            reason: "bad",
        });
        assert!(matches!(invalid, WarpError::InvalidName { .. }));
        assert!(matches!(
            WarpError::from(StoreError::AmbiguousScope),
            WarpError::AmbiguousScope
        ));
        let version = WarpError::from(StoreError::UnsupportedVersion {
            found: 2,
            expected: 1,
        });
        assert!(matches!(
            version,
            WarpError::Storage {
                source: StoreError::UnsupportedVersion { found: 2, .. }
            }
        ));
        assert!(std::error::Error::source(&version).is_some());
    }

    #[test]
    fn confirmation_message_mentions_confirm() {
        let err = WarpError::ConfirmationRequired {
            command: String::from("setwarp home"),
        };
        assert!(err.to_string().contains("/confirm"));
    }
}
