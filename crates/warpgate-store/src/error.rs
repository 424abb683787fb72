//! Error types for the `warpgate-store` crate.

/// Errors that can occur during registry and persistence operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The warp name failed validation.
    #[error("invalid warp name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Which rule it broke.
        reason: &'static str,
    },

    /// The registry is per-world and no world could be determined.
    #[error("no world given and none could be inferred from the sender")]
    AmbiguousScope,

    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot file could not be encoded or decoded.
    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The snapshot file was written by an incompatible version.
    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Version this build reads.
        expected: u32,
    },
}
