//! Command dispatch.
//!
//! [`Dispatcher`] is the single entry point for raw command lines. It parses
//! the line against the command table, enforces the row's required
//! capabilities, maps positional arguments onto the typed request for the
//! command's arity, and hands off to the [`WarpService`].

use std::sync::Arc;

use tracing::debug;
use warpgate_types::Sender;

use crate::command::{self, CommandKind, Invocation};
use crate::error::WarpError;
use crate::service::{ListRequest, LookupRequest, Reply, SetWarpRequest, WarpRequest, WarpService};

/// Routes command lines to the warp service.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    service: Arc<WarpService>,
}

impl Dispatcher {
    /// Create a dispatcher over a shared service.
    pub const fn new(service: Arc<WarpService>) -> Self {
        Self { service }
    }

    /// The underlying service.
    pub const fn service(&self) -> &Arc<WarpService> {
        &self.service
    }

    /// Parse and run one command line on behalf of `sender`.
    ///
    /// # Errors
    ///
    /// Returns [`WarpError`] describing why the command was rejected; the
    /// message is meant to be shown to the sender as-is.
    pub fn dispatch(&self, sender: &Sender, line: &str) -> Result<Reply, WarpError> {
        let invocation = command::parse(line)?;
        debug!(
            sender = sender.name(),
            command = invocation.spec.name(),
            args = invocation.args.len(),
            "Dispatching command"
        );

        for capability in invocation.spec.required {
            self.service.require(sender, capability)?;
        }

        match invocation.spec.kind {
            CommandKind::Warp => self.service.warp(sender, &warp_request(&invocation)?),
            CommandKind::SetWarp => self.service.set_warp(sender, &set_warp_request(&invocation)?),
            CommandKind::Info => self.service.info(sender, &lookup_request(&invocation)?),
            CommandKind::Remove => self.service.remove(sender, &lookup_request(&invocation)?),
            CommandKind::List => self.service.list(sender, &list_request(&invocation)?),
            CommandKind::Confirm => self.confirm(sender),
        }
    }

    /// Re-run the sender's pending command. The service sees the same
    /// signature again, so the gate lets it through.
    fn confirm(&self, sender: &Sender) -> Result<Reply, WarpError> {
        let pending = self
            .service
            .gate()
            .pending(sender.session_key())
            .ok_or(WarpError::NothingToConfirm)?;
        let invocation = command::parse(&pending)?;
        if invocation.spec.kind == CommandKind::Confirm {
            self.service.gate().clear(sender.session_key());
            return Err(WarpError::NothingToConfirm);
        }
        debug!(sender = sender.name(), command = %pending, "Confirming pending command");
        self.dispatch(sender, &pending)
    }
}

fn usage(invocation: &Invocation) -> WarpError {
    WarpError::Usage {
        usage: invocation.spec.usage_line(),
    }
}

fn warp_request(invocation: &Invocation) -> Result<WarpRequest, WarpError> {
    let silent = invocation.has_flag('s');
    let (world, target, name) = match invocation.args.as_slice() {
        [name] => (None, None, name),
        [target, name] => (None, Some(target), name),
        [world, target, name] => (Some(world), Some(target), name),
        _ => return Err(usage(invocation)),
    };
    Ok(WarpRequest {
        world: world.cloned(),
        target: target.cloned(),
        name: name.clone(),
        silent,
    })
}

fn set_warp_request(invocation: &Invocation) -> Result<SetWarpRequest, WarpError> {
    match invocation.args.as_slice() {
        [name] => Ok(SetWarpRequest {
            name: name.clone(),
            location: None,
            signature: invocation.signature(),
        }),
        [name, location] => Ok(SetWarpRequest {
            name: name.clone(),
            location: Some(location.clone()),
            signature: invocation.signature(),
        }),
        _ => Err(usage(invocation)),
    }
}

fn lookup_request(invocation: &Invocation) -> Result<LookupRequest, WarpError> {
    match invocation.args.as_slice() {
        [name] => Ok(LookupRequest {
            name: name.clone(),
            world: None,
        }),
        [name, world] => Ok(LookupRequest {
            name: name.clone(),
            world: Some(world.clone()),
        }),
        _ => Err(usage(invocation)),
    }
}

fn list_request(invocation: &Invocation) -> Result<ListRequest, WarpError> {
    let page = match invocation.args.as_slice() {
        [] => 1,
        [page] => page.parse::<usize>().ok().ok_or_else(|| usage(invocation))?,
        _ => return Err(usage(invocation)),
    };
    Ok(ListRequest {
        page,
        owner: invocation.flag_value('p').map(str::to_owned),
        world: invocation.flag_value('w').map(str::to_owned),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn warp_arity_mapping() {
        let one = warp_request(&command::parse("warp home").unwrap()).unwrap();
        assert_eq!(one.name, "home");
        assert_eq!(one.target, None);
        assert_eq!(one.world, None);

        let two = warp_request(&command::parse("warp -s Bob home").unwrap()).unwrap();
        assert_eq!(two.target.as_deref(), Some("Bob"));
        assert!(two.silent);

        let three = warp_request(&command::parse("warp nether * home").unwrap()).unwrap();
        assert_eq!(three.world.as_deref(), Some("nether"));
        assert_eq!(three.target.as_deref(), Some("*"));
        assert_eq!(three.name, "home");
    }

    #[test]
    fn set_warp_carries_signature() {
        let req = set_warp_request(&command::parse("/setwarp Home 1,2,3").unwrap()).unwrap();
        assert_eq!(req.name, "Home");
        assert_eq!(req.location.as_deref(), Some("1,2,3"));
        assert_eq!(req.signature, "setwarp Home 1,2,3");
    }

    #[test]
    fn list_page_and_filters() {
        let req = list_request(&command::parse("warps list -p Bob -w w2 3").unwrap()).unwrap();
        assert_eq!(req.page, 3);
        assert_eq!(req.owner.as_deref(), Some("Bob"));
        assert_eq!(req.world.as_deref(), Some("w2"));

        let bad = list_request(&command::parse("warps list two").unwrap());
        assert!(matches!(bad, Err(WarpError::Usage { .. })));
    }
}
