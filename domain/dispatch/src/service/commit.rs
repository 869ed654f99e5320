use async_trait::async_trait;

use crate::{
    exception::DispatchResult,
    model::{
        entity::WorkOrderId,
        vo::{AssignmentTarget, CommitOutcome, DropTarget},
    },
};

#[async_trait]
/// Turns resolved drops into persisted assignments.
pub trait AssignmentCommitService: Send + Sync {
    /// Assign the work order to the target cell.
    async fn assign(
        &self,
        work_order_id: &WorkOrderId,
        target: &AssignmentTarget,
    ) -> DispatchResult<CommitOutcome>;

    /// Move the work order back into the unassigned pool.
    async fn unassign(&self, work_order_id: &WorkOrderId) -> DispatchResult<CommitOutcome>;

    /// Commit whatever the drop resolved to.
    async fn commit(
        &self,
        work_order_id: &WorkOrderId,
        target: &DropTarget,
    ) -> DispatchResult<CommitOutcome> {
        match target {
            DropTarget::Cell(target) => self.assign(work_order_id, target).await,
            DropTarget::UnassignedPool => self.unassign(work_order_id).await,
        }
    }
}
