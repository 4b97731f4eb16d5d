//! Admission filter: decides which observed events get relayed.

use super::event::{ConduitId, InboundEvent, UserId};

/// Returns `true` when `event` should be relayed.
///
/// Rejects the relay's own messages (identity comparison, so two accounts
/// sharing a display name are never confused) and anything posted outside
/// the source conduit.
pub fn admit(event: &InboundEvent, self_identity: UserId, source: ConduitId) -> bool {
    if event.author.id == self_identity {
        return false;
    }
    event.origin == source
}

/// [`admit`] bound to a configured source conduit.
#[derive(Debug, Clone, Copy)]
pub struct Gatekeeper {
    source: ConduitId,
}

impl Gatekeeper {
    /// Create a gatekeeper for the given source conduit.
    pub fn new(source: ConduitId) -> Self {
        Self { source }
    }

    /// The conduit this gatekeeper admits events from.
    pub fn source(&self) -> ConduitId {
        self.source
    }

    /// See [`admit`].
    pub fn admit(&self, event: &InboundEvent, self_identity: UserId) -> bool {
        admit(event, self_identity, self.source)
    }
}
