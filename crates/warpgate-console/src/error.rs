//! Error types for the console host.

use warpgate_core::ConfigError;
use warpgate_store::StoreError;

/// Errors that stop the console host.
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The host section of the configuration is not valid YAML.
    #[error("failed to parse host config YAML: {source}")]
    HostYaml {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },

    /// A configured actor stands in a world the host does not have.
    #[error("actor {actor} is in unknown world {world}")]
    UnknownActorWorld {
        /// The actor's configured name.
        actor: String,
        /// The world it was placed in.
        world: String,
    },

    /// The warp snapshot could not be loaded or saved.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Reading standard input failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A background save task panicked or was cancelled.
    #[error("save task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
