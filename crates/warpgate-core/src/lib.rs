//! Warp commands for the Warpgate named-location registry.
//!
//! This crate turns raw command lines into registry operations: it parses
//! them against a declarative command table, checks capabilities, guards
//! overwrites behind an explicit confirmation step, and moves players
//! through host-supplied collaborators.
//!
//! # Modules
//!
//! - [`capability`] -- Capability names checked by the commands.
//! - [`command`] -- The command table and command-line parser.
//! - [`config`] -- YAML configuration.
//! - [`confirm`] -- [`ConfirmationGate`], the per-session overwrite queue.
//! - [`dispatch`] -- [`Dispatcher`], the entry point for raw command lines.
//! - [`error`] -- [`WarpError`], every user-visible failure.
//! - [`host`] -- Traits the host game server implements.
//! - [`present`] -- Display lines and pagination.
//! - [`service`] -- [`WarpService`], the per-command decision procedures.

pub mod capability;
pub mod command;
pub mod config;
pub mod confirm;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod present;
pub mod service;

// Re-export primary types at crate root.
pub use command::{COMMANDS, CommandKind, CommandSpec, Invocation};
pub use config::{ConfigError, WarpsConfig};
pub use confirm::ConfirmationGate;
pub use dispatch::Dispatcher;
pub use error::WarpError;
pub use host::{ActorDirectory, Host, MoveError, Movement, PermissionEngine};
pub use present::{Page, render};
pub use service::{ListRequest, LookupRequest, Reply, SetWarpRequest, WarpRequest, WarpService};
