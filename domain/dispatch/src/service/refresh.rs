use async_trait::async_trait;

use crate::exception::DispatchResult;

/// Counts from one snapshot refresh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub technicians: usize,
    pub work_orders: usize,
    /// Records dropped as malformed.
    pub dropped: usize,
}

#[async_trait]
/// Replace the working set with a fresh snapshot from the data store.
pub trait SnapshotRefreshService: Send + Sync {
    async fn refresh(&self) -> DispatchResult<RefreshReport>;
}
