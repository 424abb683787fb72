//! Warp name validation.
//!
//! Names are typed by players as a single command argument, so they are
//! restricted to a conservative character set and may not shadow the
//! sub-command words of the `warps` management command.

use crate::error::StoreError;

/// Longest accepted warp name, in characters.
pub const MAX_NAME_LEN: usize = 32;

/// Words that cannot be used as warp names (compared case-insensitively).
pub const RESERVED_NAMES: &[&str] = &[
    "confirm", "del", "delete", "inf", "info", "list", "rem", "remove", "show",
];

/// Check that `name` is usable as a warp name.
///
/// # Errors
///
/// Returns [`StoreError::InvalidName`] if the name is empty, too long,
/// contains characters outside `[A-Za-z0-9_.-]`, or is a reserved word.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let reject = |reason| {
        Err(StoreError::InvalidName {
            name: name.to_owned(),
            reason,
        })
    };

    if name.trim().is_empty() {
        return reject("name is empty");
    }
    if name.chars().count() > MAX_NAME_LEN {
        return reject("name is too long");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return reject("name may only contain letters, digits, '_', '-' and '.'");
    }
    if RESERVED_NAMES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
    {
        return reject("name is a reserved word");
    }
    Ok(())
}

/// Normalized lookup form of a name.
pub(crate) fn fold(name: &str) -> String {
    name.to_lowercase()
}
