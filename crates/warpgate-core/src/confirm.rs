//! Overwrite confirmation.
//!
//! A destructive command is first rejected and remembered; issuing the
//! exact same command again (or typing `confirm`) lets it through. Each
//! session holds at most one pending command, and a newer request replaces
//! an older one. Pending commands expire after a configurable time so a
//! forgotten request cannot be confirmed by accident much later.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, warn};
use warpgate_types::SessionKey;

#[derive(Debug, Clone)]
struct PendingConfirmation {
    signature: String,
    queued_at: DateTime<Utc>,
}

/// Per-session queue of commands awaiting confirmation.
#[derive(Debug)]
pub struct ConfirmationGate {
    ttl: Duration,
    pending: Mutex<HashMap<SessionKey, PendingConfirmation>>,
}

impl ConfirmationGate {
    /// Create a gate whose pending commands expire after `ttl`.
    /// A zero `ttl` disables expiry.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// How long a pending command stays confirmable.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Let `signature` through if it is the session's live pending command,
    /// consuming it. Otherwise queue it and return `false`.
    pub fn check_or_queue(&self, session: SessionKey, signature: &str) -> bool {
        self.check_or_queue_at(session, signature, Utc::now())
    }

    /// [`check_or_queue`](Self::check_or_queue) with an explicit clock.
    pub fn check_or_queue_at(
        &self,
        session: SessionKey,
        signature: &str,
        now: DateTime<Utc>,
    ) -> bool {
        let mut pending = self.pending.lock();
        if let Some(existing) = pending.get(&session) {
            let expired = self.is_expired(existing.queued_at, now);
            if !expired && existing.signature == signature {
                pending.remove(&session);
                debug!(?session, signature, "Confirmation accepted");
                return true;
            }
            if expired {
                warn!(?session, stale = %existing.signature, "Discarding expired confirmation");
            }
        }
        pending.insert(
            session,
            PendingConfirmation {
                signature: signature.to_owned(),
                queued_at: now,
            },
        );
        debug!(?session, signature, "Confirmation queued");
        false
    }

    /// The session's live pending command, if any.
    pub fn pending(&self, session: SessionKey) -> Option<String> {
        self.pending_at(session, Utc::now())
    }

    /// [`pending`](Self::pending) with an explicit clock.
    pub fn pending_at(&self, session: SessionKey, now: DateTime<Utc>) -> Option<String> {
        self.pending
            .lock()
            .get(&session)
            .filter(|p| !self.is_expired(p.queued_at, now))
            .map(|p| p.signature.clone())
    }

    /// Drop the session's pending command (e.g. on disconnect).
    /// Returns `true` if something was pending.
    pub fn clear(&self, session: SessionKey) -> bool {
        self.pending.lock().remove(&session).is_some()
    }

    /// Drop the session's pending command if it is exactly `signature`.
    /// Returns `true` if it was dropped.
    ///
    /// Used when the guarded action turns out not to need confirmation, so
    /// the queued command cannot later approve a different overwrite.
    pub fn discard(&self, session: SessionKey, signature: &str) -> bool {
        let mut pending = self.pending.lock();
        if pending.get(&session).is_some_and(|p| p.signature == signature) {
            pending.remove(&session);
            return true;
        }
        false
    }

    /// Drop every expired pending command. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    /// [`purge_expired`](Self::purge_expired) with an explicit clock.
    pub fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut pending = self.pending.lock();
        let before = pending.len();
        pending.retain(|_, p| !self.is_expired(p.queued_at, now));
        before.saturating_sub(pending.len())
    }

    fn is_expired(&self, queued_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.ttl.is_zero() {
            return false;
        }
        // A negative age (clock stepped backwards) counts as fresh.
        now.signed_duration_since(queued_at)
            .to_std()
            .is_ok_and(|age| age > self.ttl)
    }
}
