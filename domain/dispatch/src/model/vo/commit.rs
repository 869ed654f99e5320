use crate::model::entity::WorkOrder;

/// Result of one assign or unassign commit.
#[derive(Clone, Debug, PartialEq)]
pub enum CommitOutcome {
    /// Persisted; carries the record now in the store.
    Committed(WorkOrder),
    /// Nothing to do, the record already matched.
    Unchanged,
    /// Another commit on the same work order is still in flight.
    Busy,
    /// Persistence failed and the optimistic update was reverted.
    RolledBack { reason: String },
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}
