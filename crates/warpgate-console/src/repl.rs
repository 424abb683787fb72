//! Console line parsing.
//!
//! Each input line is one of:
//!
//! - `@Name <command>` runs `<command>` as the online player `Name`.
//! - `:logout <name>` disconnects a player and drops their pending confirmation.
//! - `:who` lists online players.
//! - `:help` lists the warp commands.
//! - `:quit` stops the console.
//! - anything else runs as the server console.

/// One parsed console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplLine<'a> {
    /// Nothing to do.
    Blank,
    /// Run a command as the console.
    Console {
        /// The command line.
        command: &'a str,
    },
    /// Run a command as a player.
    AsPlayer {
        /// Player name as typed.
        player: &'a str,
        /// The command line.
        command: &'a str,
    },
    /// Disconnect a player.
    Logout {
        /// Player name as typed.
        player: &'a str,
    },
    /// List online players.
    Who,
    /// List the warp commands.
    Help,
    /// Stop the console.
    Quit,
    /// A `:` directive that is not understood.
    Unknown {
        /// The directive as typed.
        directive: &'a str,
    },
}

/// Parse one input line.
pub fn parse_line(line: &str) -> ReplLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ReplLine::Blank;
    }
    if let Some(rest) = line.strip_prefix('@') {
        let (player, command) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        return ReplLine::AsPlayer {
            player,
            command: command.trim(),
        };
    }
    if let Some(directive) = line.strip_prefix(':') {
        let mut words = directive.split_whitespace();
        return match (words.next(), words.next()) {
            (Some("quit" | "exit"), None) => ReplLine::Quit,
            (Some("who"), None) => ReplLine::Who,
            (Some("help"), None) => ReplLine::Help,
            (Some("logout"), Some(player)) if words.next().is_none() => ReplLine::Logout { player },
            _ => ReplLine::Unknown { directive: line },
        };
    }
    ReplLine::Console { command: line }
}
