use async_trait::async_trait;

use crate::model::vo::{TechnicianRecord, WorkOrderRecord};

/// Bulk read of every work order. The result replaces the working set.
#[async_trait]
pub trait WorkOrderSnapshotRepo: Send + Sync {
    async fn fetch_all(&self) -> anyhow::Result<Vec<WorkOrderRecord>>;
}

/// Bulk read of the technician roster, in display order.
#[async_trait]
pub trait TechnicianSnapshotRepo: Send + Sync {
    async fn fetch_all(&self) -> anyhow::Result<Vec<TechnicianRecord>>;
}
