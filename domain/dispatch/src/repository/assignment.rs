use async_trait::async_trait;
use chrono::NaiveDate;

use crate::model::entity::{TechnicianId, WorkOrderId};

/// Remote store holding the persisted assignment of each work order.
#[async_trait]
pub trait WorkOrderAssignmentRepo: Send + Sync {
    /// Persist `work_order_id` as assigned to `technician_id` on `date`.
    async fn assign(
        &self,
        work_order_id: &WorkOrderId,
        technician_id: &TechnicianId,
        date: NaiveDate,
    ) -> anyhow::Result<()>;

    /// Persist `work_order_id` as back in the unassigned pool.
    async fn unassign(&self, work_order_id: &WorkOrderId) -> anyhow::Result<()>;
}
