use async_trait::async_trait;
use chrono::NaiveDate;
use infrastructure_command::NotificationCommand;
use mockall::mock;

use crate::{
    exception::DispatchResult,
    model::{
        entity::{TechnicianId, WorkOrderId},
        vo::{AssignmentTarget, CommitOutcome, TechnicianRecord, WorkOrderRecord},
    },
    repository::{TechnicianSnapshotRepo, WorkOrderAssignmentRepo, WorkOrderSnapshotRepo},
    service::{AssignmentCommitService, NotifyService},
};

mock! {
    pub WorkOrderAssignmentRepo {}
    #[async_trait]
    impl WorkOrderAssignmentRepo for WorkOrderAssignmentRepo {
        async fn assign(
            &self,
            work_order_id: &WorkOrderId,
            technician_id: &TechnicianId,
            date: NaiveDate,
        ) -> anyhow::Result<()>;
        async fn unassign(&self, work_order_id: &WorkOrderId) -> anyhow::Result<()>;
    }
}

mock! {
    pub WorkOrderSnapshotRepo {}
    #[async_trait]
    impl WorkOrderSnapshotRepo for WorkOrderSnapshotRepo {
        async fn fetch_all(&self) -> anyhow::Result<Vec<WorkOrderRecord>>;
    }
}

mock! {
    pub TechnicianSnapshotRepo {}
    #[async_trait]
    impl TechnicianSnapshotRepo for TechnicianSnapshotRepo {
        async fn fetch_all(&self) -> anyhow::Result<Vec<TechnicianRecord>>;
    }
}

mock! {
    pub AssignmentCommitService {}
    #[async_trait]
    impl AssignmentCommitService for AssignmentCommitService {
        async fn assign(
            &self,
            work_order_id: &WorkOrderId,
            target: &AssignmentTarget,
        ) -> DispatchResult<CommitOutcome>;
        async fn unassign(&self, work_order_id: &WorkOrderId) -> DispatchResult<CommitOutcome>;
    }
}

mock! {
    pub NotifyService {}
    #[async_trait]
    impl NotifyService for NotifyService {
        async fn notify(&self, command: NotificationCommand);
    }
}
