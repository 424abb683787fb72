//! Capability names checked by the warp commands.

/// Teleport to any warp.
pub const TELEPORT: &str = "warps.teleport";
/// Teleport players other than yourself.
pub const TELEPORT_OTHER: &str = "warps.teleport.other";
/// Create warps.
pub const SET: &str = "warps.set";
/// Overwrite warps created by someone else.
pub const SET_OVERRIDE: &str = "warps.set.override";
/// Show warp details.
pub const INFO: &str = "warps.info";
/// Delete warps.
pub const REMOVE: &str = "warps.remove";
/// Delete warps created by someone else.
pub const REMOVE_OTHER: &str = "warps.remove.other";
/// List warps.
pub const LIST: &str = "warps.list";

/// Per-warp grant allowing teleports to one named warp only.
pub fn warp_capability(name: &str) -> String {
    format!("warps.warp.{}", name.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_warp_capability_is_lowercase() {
        assert_eq!(warp_capability("Home"), "warps.warp.home");
    }
}
