//! Command table and argument parsing.
//!
//! Every command is one [`CommandSpec`] row: its aliases, optional parent
//! group, arity bounds, accepted flags and required capabilities. A single
//! generic parser turns a raw command line into an [`Invocation`] that the
//! dispatcher routes on [`CommandKind`].
//!
//! Flags follow the usual console convention: a token of `-` followed by
//! letters is a flag cluster (`-s`, `-sp`). Letters declared with a trailing
//! `:` in the command's flag string take the next token as their value. Anything else,
//! including negative numbers and coordinate triples, is a positional
//! argument.

use std::collections::BTreeMap;

use crate::capability;
use crate::error::WarpError;

/// What a command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Teleport targets to a warp.
    Warp,
    /// Create or overwrite a warp.
    SetWarp,
    /// Show one warp.
    Info,
    /// Delete a warp.
    Remove,
    /// List warps.
    List,
    /// Re-run the pending confirmation.
    Confirm,
}

/// One row of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Which handler runs the command.
    pub kind: CommandKind,
    /// Parent command for nested sub-commands (`warps`), `None` for top level.
    pub group: Option<&'static str>,
    /// Accepted names; the first one is canonical.
    pub aliases: &'static [&'static str],
    /// Argument synopsis shown in usage errors.
    pub usage: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Fewest positional arguments.
    pub min_args: usize,
    /// Most positional arguments.
    pub max_args: usize,
    /// Accepted flag letters; a letter followed by `:` takes a value.
    pub flags: &'static str,
    /// Capabilities checked before the handler runs.
    pub required: &'static [&'static str],
}

impl CommandSpec {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        self.aliases.first().copied().unwrap_or_default()
    }

    /// Full usage line, e.g. `/warps remove <warpname> [world]`.
    pub fn usage_line(&self) -> String {
        let mut line = String::from("/");
        if let Some(group) = self.group {
            line.push_str(group);
            line.push(' ');
        }
        line.push_str(self.name());
        if !self.usage.is_empty() {
            line.push(' ');
            line.push_str(self.usage);
        }
        line
    }

    fn matches(&self, token: &str) -> bool {
        self.aliases.iter().any(|a| a.eq_ignore_ascii_case(token))
    }

    /// Whether `flag` is accepted, and if so whether it takes a value.
    fn flag_arity(&self, flag: char) -> Option<bool> {
        let mut chars = self.flags.chars().peekable();
        while let Some(c) = chars.next() {
            let takes_value = chars.next_if_eq(&':').is_some();
            if c == flag {
                return Some(takes_value);
            }
        }
        None
    }
}

/// Group that nests the management sub-commands.
pub const WARPS_GROUP: &str = "warps";

/// The registered commands.
pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        kind: CommandKind::Warp,
        group: None,
        aliases: &["warp"],
        usage: "[-s] [world] [target] <warp>",
        description: "Teleport to a warp",
        min_args: 1,
        max_args: 3,
        flags: "s",
        required: &[],
    },
    CommandSpec {
        kind: CommandKind::SetWarp,
        group: None,
        aliases: &["setwarp"],
        usage: "<warp> [location]",
        description: "Set a warp",
        min_args: 1,
        max_args: 2,
        flags: "",
        required: &[capability::SET],
    },
    CommandSpec {
        kind: CommandKind::Info,
        group: Some(WARPS_GROUP),
        aliases: &["info", "inf"],
        usage: "<warpname> [world]",
        description: "Get information about a warp",
        min_args: 1,
        max_args: 2,
        flags: "",
        required: &[capability::INFO],
    },
    CommandSpec {
        kind: CommandKind::Remove,
        group: Some(WARPS_GROUP),
        aliases: &["remove", "rem", "del", "delete"],
        usage: "<warpname> [world]",
        description: "Remove a warp",
        min_args: 1,
        max_args: 2,
        flags: "",
        required: &[capability::REMOVE],
    },
    CommandSpec {
        kind: CommandKind::List,
        group: Some(WARPS_GROUP),
        aliases: &["list", "show"],
        usage: "[-p owner] [-w world] [page]",
        description: "List warps",
        min_args: 0,
        max_args: 1,
        flags: "p:w:",
        required: &[capability::LIST],
    },
    CommandSpec {
        kind: CommandKind::Confirm,
        group: None,
        aliases: &["confirm"],
        usage: "",
        description: "Confirm a pending overwrite",
        min_args: 0,
        max_args: 0,
        flags: "",
        required: &[],
    },
];

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The matched table row.
    pub spec: &'static CommandSpec,
    /// Positional arguments, flags removed.
    pub args: Vec<String>,
    /// Flags present, with their values for value flags.
    pub flags: BTreeMap<char, Option<String>>,
}

impl Invocation {
    /// Whether boolean flag `flag` was given.
    pub fn has_flag(&self, flag: char) -> bool {
        self.flags.contains_key(&flag)
    }

    /// Value of value flag `flag`, if given.
    pub fn flag_value(&self, flag: char) -> Option<&str> {
        self.flags.get(&flag).and_then(|v| v.as_deref())
    }

    /// Text identifying "the same command again": the canonical command
    /// path followed by the positional arguments.
    pub fn signature(&self) -> String {
        let mut signature = String::new();
        if let Some(group) = self.spec.group {
            signature.push_str(group);
            signature.push(' ');
        }
        signature.push_str(self.spec.name());
        for arg in &self.args {
            signature.push(' ');
            signature.push_str(arg);
        }
        signature
    }
}

/// Sub-commands of a group, for the group's own usage message.
pub fn group_usage(group: &str) -> String {
    let subs: Vec<&str> = COMMANDS
        .iter()
        .filter(|spec| spec.group == Some(group))
        .map(CommandSpec::name)
        .collect();
    format!("/{group} <{}>", subs.join("|"))
}

/// One `usage - description` line per command, in table order.
pub fn help_lines() -> Vec<String> {
    COMMANDS
        .iter()
        .map(|spec| format!("{} - {}", spec.usage_line(), spec.description))
        .collect()
}

/// Parse a raw command line (with or without a leading `/`).
///
/// # Errors
///
/// Returns [`WarpError::UnknownCommand`] if no table row matches, or
/// [`WarpError::Usage`] for an unknown flag, a value flag without a value,
/// or an argument count outside the row's bounds.
pub fn parse(line: &str) -> Result<Invocation, WarpError> {
    let line = line.trim();
    let line = line.strip_prefix('/').unwrap_or(line);
    let mut tokens = line.split_whitespace();

    let Some(head) = tokens.next() else {
        return Err(WarpError::UnknownCommand {
            name: String::new(),
        });
    };

    let spec = if head.eq_ignore_ascii_case(WARPS_GROUP) {
        let Some(sub) = tokens.next() else {
            return Err(WarpError::Usage {
                usage: group_usage(WARPS_GROUP),
            });
        };
        COMMANDS
            .iter()
            .find(|spec| spec.group == Some(WARPS_GROUP) && spec.matches(sub))
            .ok_or_else(|| WarpError::Usage {
                usage: group_usage(WARPS_GROUP),
            })?
    } else {
        COMMANDS
            .iter()
            .find(|spec| spec.group.is_none() && spec.matches(head))
            .ok_or_else(|| WarpError::UnknownCommand {
                name: head.to_owned(),
            })?
    };

    let usage = || WarpError::Usage {
        usage: spec.usage_line(),
    };

    let mut args = Vec::new();
    let mut flags = BTreeMap::new();
    while let Some(token) = tokens.next() {
        let Some(cluster) = flag_cluster(token) else {
            args.push(token.to_owned());
            continue;
        };
        for flag in cluster.chars() {
            match spec.flag_arity(flag) {
                None => return Err(usage()),
                Some(false) => {
                    flags.insert(flag, None);
                }
                Some(true) => {
                    let value = tokens.next().ok_or_else(usage)?;
                    flags.insert(flag, Some(value.to_owned()));
                }
            }
        }
    }

    if args.len() < spec.min_args || args.len() > spec.max_args {
        return Err(usage());
    }

    Ok(Invocation { spec, args, flags })
}

/// The letters of a flag token, or `None` if `token` is positional.
fn flag_cluster(token: &str) -> Option<&str> {
    token
        .strip_prefix('-')
        .filter(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphabetic()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> Invocation {
        parse(line).unwrap()
    }

    #[test]
    fn top_level_commands() {
        let inv = parsed("/warp home");
        assert_eq!(inv.spec.kind, CommandKind::Warp);
        assert_eq!(inv.args, vec!["home"]);

        let inv = parsed("SETWARP base 1,2,3");
        assert_eq!(inv.spec.kind, CommandKind::SetWarp);
        assert_eq!(inv.args, vec!["base", "1,2,3"]);
    }

    #[test]
    fn nested_aliases() {
        assert_eq!(parsed("warps inf home").spec.kind, CommandKind::Info);
        assert_eq!(parsed("warps del home").spec.kind, CommandKind::Remove);
        assert_eq!(parsed("warps delete home w").spec.kind, CommandKind::Remove);
        assert_eq!(parsed("warps show").spec.kind, CommandKind::List);
    }

    #[test]
    fn bare_group_shows_subcommands() {
        let err = parse("warps");
        assert!(matches!(err, Err(WarpError::Usage { ref usage }) if usage == "/warps <info|remove|list>"));
        assert!(matches!(parse("warps frobnicate"), Err(WarpError::Usage { .. })));
    }

    #[test]
    fn unknown_command() {
        assert!(matches!(parse("teleport x"), Err(WarpError::UnknownCommand { .. })));
        assert!(matches!(parse("   "), Err(WarpError::UnknownCommand { .. })));
    }

    #[test]
    fn boolean_and_value_flags() {
        let inv = parsed("warp -s Bob home");
        assert!(inv.has_flag('s'));
        assert_eq!(inv.args, vec!["Bob", "home"]);

        let inv = parsed("warps list -w nether -p Bob 2");
        assert_eq!(inv.flag_value('w'), Some("nether"));
        assert_eq!(inv.flag_value('p'), Some("Bob"));
        assert_eq!(inv.args, vec!["2"]);
    }

    #[test]
    fn value_flag_without_value() {
        assert!(matches!(parse("warps list -p"), Err(WarpError::Usage { .. })));
    }

    #[test]
    fn unknown_flag_rejected() {
        assert!(matches!(parse("warp -x home"), Err(WarpError::Usage { .. })));
    }

    #[test]
    fn negative_numbers_are_positional() {
        let inv = parsed("setwarp pit -10,5,-3");
        assert_eq!(inv.args, vec!["pit", "-10,5,-3"]);
    }

    #[test]
    fn arity_bounds() {
        assert!(matches!(parse("warp"), Err(WarpError::Usage { .. })));
        assert!(matches!(parse("warp a b c d"), Err(WarpError::Usage { .. })));
        assert!(matches!(parse("setwarp a b c"), Err(WarpError::Usage { .. })));
        assert!(matches!(parse("warps list 1 2"), Err(WarpError::Usage { .. })));
        assert!(matches!(parse("confirm now"), Err(WarpError::Usage { .. })));
        assert!(parse("warps list").is_ok());
    }

    #[test]
    fn usage_line_format() {
        let err = parse("warps remove");
        assert!(matches!(
            err,
            Err(WarpError::Usage { ref usage }) if usage == "/warps remove <warpname> [world]"
        ));
        let err = parse("warp");
        assert!(matches!(
            err,
            Err(WarpError::Usage { ref usage }) if usage == "/warp [-s] [world] [target] <warp>"
        ));
    }

    #[test]
    fn help_has_a_line_per_command() {
        let lines = help_lines();
        assert_eq!(lines.len(), COMMANDS.len());
        assert!(lines.contains(&String::from(
            "/warps remove <warpname> [world] - Remove a warp"
        )));
        assert!(lines.iter().any(|l| l.starts_with("/confirm - ")));
    }

    #[test]
    fn signature_uses_canonical_name_and_drops_flags() {
        assert_eq!(parsed("/SetWarp home  1,2,3").signature(), "setwarp home 1,2,3");
        assert_eq!(parsed("warps rem home").signature(), "warps remove home");
        assert_eq!(parsed("warp -s home").signature(), "warp home");
    }
}
