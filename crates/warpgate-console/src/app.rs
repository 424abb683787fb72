//! The console application: wires the store, host, and dispatcher together
//! and turns input lines into output lines.

use std::sync::Arc;

use tracing::{debug, info, warn};
use warpgate_core::command::help_lines;
use warpgate_core::{
    ActorDirectory, Dispatcher, Host, Movement, PermissionEngine, WarpService, WarpsConfig, render,
};
use warpgate_store::{LocationStore, WarpSnapshotFile};
use warpgate_types::{Sender, SessionKey};

use crate::error::ConsoleError;
use crate::host::{ConsoleHost, HostConfig};
use crate::repl::{ReplLine, parse_line};

/// What the input loop should do after a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print these lines and keep reading.
    Continue(Vec<String>),
    /// Stop reading.
    Quit,
}

/// A running console session.
#[derive(Debug)]
pub struct App {
    host: Arc<ConsoleHost>,
    dispatcher: Dispatcher,
    snapshot: WarpSnapshotFile,
    saved_revision: u64,
}

impl App {
    /// Load the snapshot named by `config` and build the session.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Store`] if the snapshot exists but cannot be read.
    pub fn open(config: &WarpsConfig, host_config: &HostConfig) -> Result<Self, ConsoleError> {
        let snapshot = WarpSnapshotFile::new(config.storage.path.clone());
        let records = snapshot.load()?;
        let store = Arc::new(LocationStore::restore(
            config.registry.scope_mode(),
            records,
        ));
        info!(
            path = %snapshot.path().display(),
            warps = store.len(),
            mode = ?store.mode(),
            "Warp registry loaded"
        );

        let host = Arc::new(ConsoleHost::new(
            host_config,
            &config.registry.default_world,
        ));
        let collaborators = Host {
            directory: Arc::clone(&host) as Arc<dyn ActorDirectory>,
            permissions: Arc::clone(&host) as Arc<dyn PermissionEngine>,
            movement: Arc::clone(&host) as Arc<dyn Movement>,
        };
        let service = Arc::new(WarpService::new(Arc::clone(&store), collaborators, config));
        let saved_revision = store.revision();

        Ok(Self {
            host,
            dispatcher: Dispatcher::new(service),
            snapshot,
            saved_revision,
        })
    }

    /// The in-memory host.
    pub const fn host(&self) -> &Arc<ConsoleHost> {
        &self.host
    }

    /// Handle one input line.
    pub fn handle(&self, line: &str) -> Outcome {
        match parse_line(line) {
            ReplLine::Blank => Outcome::Continue(Vec::new()),
            ReplLine::Quit => Outcome::Quit,
            ReplLine::Who => Outcome::Continue(vec![format!(
                "Online: {}",
                self.host.online_names().join(", ")
            )]),
            ReplLine::Help => Outcome::Continue(help_lines()),
            ReplLine::Logout { player } => Outcome::Continue(vec![self.logout(player)]),
            ReplLine::Unknown { directive } => {
                Outcome::Continue(vec![format!("Unknown directive '{directive}'.")])
            }
            ReplLine::Console { command } => Outcome::Continue(self.run(&Sender::Console, command)),
            ReplLine::AsPlayer { player, command } => match self.host.actor(player) {
                Some(actor) => Outcome::Continue(self.run(&Sender::Player(actor), command)),
                None => Outcome::Continue(vec![format!("Player '{player}' is not online.")]),
            },
        }
    }

    fn run(&self, sender: &Sender, command: &str) -> Vec<String> {
        debug!(sender = sender.name(), command, "Dispatching");
        match self.dispatcher.dispatch(sender, command) {
            Ok(reply) => render(&reply),
            Err(e) => vec![e.to_string()],
        }
    }

    fn logout(&self, player: &str) -> String {
        let Some(actor) = self.host.disconnect(player) else {
            return format!("Player '{player}' is not online.");
        };
        let gate = self.dispatcher.service().gate();
        if gate.clear(SessionKey::Player(actor.id)) {
            debug!(actor = %actor.name, "Dropped pending confirmation");
        }
        format!("{} logged out.", actor.name)
    }

    /// Write the snapshot if the registry changed since the last save.
    ///
    /// Returns whether a write happened.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Store`] if the write fails or
    /// [`ConsoleError::Join`] if the blocking task was lost.
    pub async fn save_if_changed(&mut self) -> Result<bool, ConsoleError> {
        let (revision, warps) = self.dispatcher.service().store().snapshot();
        if revision == self.saved_revision {
            return Ok(false);
        }
        let snapshot = self.snapshot.clone();
        let count = warps.len();
        tokio::task::spawn_blocking(move || snapshot.save(&warps)).await??;
        self.saved_revision = revision;
        info!(revision, warps = count, "Warp snapshot saved");
        Ok(true)
    }

    /// Drop pending confirmations that have outlived their TTL.
    pub fn sweep(&self) -> usize {
        let dropped = self.dispatcher.service().gate().purge_expired();
        if dropped > 0 {
            debug!(dropped, "Purged expired confirmations");
        }
        dropped
    }

    /// Sweep expired confirmations and save, logging instead of failing.
    pub async fn flush(&mut self) {
        self.sweep();
        if let Err(e) = self.save_if_changed().await {
            warn!(error = %e, path = %self.snapshot.path().display(), "Failed to save warp snapshot");
        }
    }
}
