use std::sync::Arc;

use async_trait::async_trait;
use domain_dispatch::{
    exception::{DispatchException, DispatchResult},
    repository::{TechnicianSnapshotRepo, WorkOrderSnapshotRepo},
    service::{RefreshReport, SnapshotRefreshService},
};
use typed_builder::TypedBuilder;

use crate::store::AssignmentStore;

#[derive(TypedBuilder)]
pub struct SnapshotRefreshServiceImpl {
    store: Arc<AssignmentStore>,
    work_order_repo: Arc<dyn WorkOrderSnapshotRepo>,
    technician_repo: Arc<dyn TechnicianSnapshotRepo>,
}

/// Converts every record, dropping and logging the malformed ones.
fn keep_valid<R, T>(records: Vec<R>, kind: &str, dropped: &mut usize) -> Vec<T>
where
    T: TryFrom<R, Error = DispatchException>,
{
    records
        .into_iter()
        .filter_map(|record| match T::try_from(record) {
            Ok(el) => Some(el),
            Err(e) => {
                tracing::warn!(kind, "Dropped malformed record: {e}");
                *dropped += 1;
                None
            }
        })
        .collect()
}

#[async_trait]
impl SnapshotRefreshService for SnapshotRefreshServiceImpl {
    /// Either both lists are replaced or, when a fetch fails, nothing is.
    async fn refresh(&self) -> DispatchResult<RefreshReport> {
        let (technician_records, work_order_records) =
            tokio::try_join!(self.technician_repo.fetch_all(), self.work_order_repo.fetch_all())?;

        let mut dropped = 0;
        let technicians = keep_valid(technician_records, "technician", &mut dropped);
        let work_orders = keep_valid(work_order_records, "work order", &mut dropped);
        let report = RefreshReport {
            technicians: technicians.len(),
            work_orders: work_orders.len(),
            dropped,
        };
        self.store.replace_snapshot(technicians, work_orders).await;
        tracing::info!(
            technicians = report.technicians,
            work_orders = report.work_orders,
            dropped = report.dropped,
            "Snapshot refreshed"
        );
        Ok(report)
    }
}
