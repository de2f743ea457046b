use dashmap::DashMap;
use tokio::sync::oneshot;
use tokio::time::Instant;
use uuid::Uuid;

use crate::{envelope::SynthesisPayload, error::MqError};

/// Terminal outcome a waiting caller observes
pub(crate) type CallOutcome = Result<SynthesisPayload, MqError>;

/// One in-flight call awaiting its reply
struct PendingCall {
    deadline: Instant,
    slot: oneshot::Sender<CallOutcome>,
}

/// Concurrent map from correlation id to pending call
///
/// Shared by the publisher facade, the reply listener, and the timeout
/// supervisor. `resolve` claims an entry by removing it from the map,
/// which is the compare-and-set: exactly one resolver gets the entry,
/// everyone else sees `false` and discards their payload.
#[derive(Default)]
pub(crate) struct CorrelationRegistry {
    pending: DashMap<Uuid, PendingCall>,
}

impl CorrelationRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Park a new pending call and hand back the completion receiver
    ///
    /// Correlation ids are freshly generated UUIDs, so a collision with
    /// a currently pending id does not happen in practice.
    pub(crate) fn register(&self, id: Uuid, deadline: Instant) -> oneshot::Receiver<CallOutcome> {
        let (slot, receiver) = oneshot::channel();
        self.pending.insert(id, PendingCall { deadline, slot });
        receiver
    }

    /// Resolve the call for `id`, if it is still pending
    ///
    /// Returns whether this invocation performed the resolution. A
    /// send failure means the caller abandoned the receiver; the entry
    /// is still considered resolved and removed.
    pub(crate) fn resolve(&self, id: Uuid, outcome: CallOutcome) -> bool {
        match self.pending.remove(&id) {
            Some((_, call)) => {
                let _ = call.slot.send(outcome);
                true
            }
            None => false,
        }
    }

    /// Fail every call whose deadline has passed, returning their ids
    pub(crate) fn expire_due(&self, now: Instant) -> Vec<Uuid> {
        // Collect ids first; removing while iterating would deadlock
        // on the shard lock.
        let due: Vec<Uuid> = self
            .pending
            .iter()
            .filter(|entry| entry.deadline <= now)
            .map(|entry| *entry.key())
            .collect();

        due.into_iter()
            .filter(|id| self.resolve(*id, Err(MqError::Timeout)))
            .collect()
    }

    /// Fail every remaining call, returning their ids (shutdown path)
    pub(crate) fn drain(&self) -> Vec<Uuid> {
        let ids: Vec<Uuid> = self.pending.iter().map(|entry| *entry.key()).collect();

        ids.into_iter()
            .filter(|id| self.resolve(*id, Err(MqError::Cancelled)))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
