use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;
use domain_dispatch::{
    exception::{DispatchException, DispatchResult},
    model::{
        entity::{WorkOrder, WorkOrderId},
        vo::{AssignmentTarget, CommitOutcome},
    },
    repository::WorkOrderAssignmentRepo,
    service::{AssignmentCommitService, NotifyService},
};
use infrastructure_command::NotificationCommand;
use typed_builder::TypedBuilder;

use crate::store::AssignmentStore;

/// Optimistic assign/unassign with rollback when the remote store refuses.
#[derive(TypedBuilder)]
pub struct AssignmentCommitServiceImpl {
    store: Arc<AssignmentStore>,
    assignment_repo: Arc<dyn WorkOrderAssignmentRepo>,
    notify_service: Arc<dyn NotifyService>,
    /// Refuse drops onto busy or off-duty technicians.
    #[builder(default)]
    block_unavailable_technicians: bool,
    #[builder(default, setter(skip))]
    in_flight: DashSet<WorkOrderId>,
}

/// Marks a work order as having a commit in flight until dropped.
struct InFlight<'a> {
    set: &'a DashSet<WorkOrderId>,
    id: WorkOrderId,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

impl AssignmentCommitServiceImpl {
    fn claim(&self, id: &WorkOrderId) -> Option<InFlight<'_>> {
        self.in_flight.insert(id.to_owned()).then(|| InFlight {
            set: &self.in_flight,
            id: id.to_owned(),
        })
    }

    pub fn is_in_flight(&self, id: &WorkOrderId) -> bool {
        self.in_flight.contains(id)
    }

    /// A second drop while the first is pending. Identical drops are
    /// duplicates of the pending one, anything else has to wait.
    async fn rejected(&self, id: &WorkOrderId, same: impl Fn(&WorkOrder) -> bool) -> CommitOutcome {
        match self.store.by_id(id).await {
            Some(current) if same(&current) => CommitOutcome::Unchanged,
            _ => {
                tracing::info!(%id, "Commit already in flight, drop rejected");
                CommitOutcome::Busy
            }
        }
    }

    async fn load_dispatchable(&self, id: &WorkOrderId) -> DispatchResult<WorkOrder> {
        let work_order = self
            .store
            .by_id(id)
            .await
            .ok_or_else(|| DispatchException::NoSuchWorkOrder { id: id.to_owned() })?;
        if !work_order.is_dispatchable() {
            return Err(DispatchException::NotDispatchable {
                id: id.to_owned(),
                status: work_order.status,
            });
        }
        Ok(work_order)
    }

    async fn check_technician(&self, target: &AssignmentTarget) -> DispatchResult<()> {
        if !target.is_valid() {
            return Err(DispatchException::NoSuchTechnician {
                id: target.technician_id.to_owned(),
            });
        }
        if !self.block_unavailable_technicians {
            return Ok(());
        }
        let technician = self.store.technician(&target.technician_id).await.ok_or_else(|| {
            DispatchException::NoSuchTechnician {
                id: target.technician_id.to_owned(),
            }
        })?;
        if !technician.status.is_available() {
            return Err(DispatchException::TechnicianUnavailable {
                id: technician.id,
                status: technician.status,
            });
        }
        Ok(())
    }

    async fn roll_back(
        &self,
        operation: &str,
        optimistic: &WorkOrder,
        before: WorkOrder,
        error: anyhow::Error,
    ) -> CommitOutcome {
        let id = before.id.to_owned();
        tracing::error!(%id, operation, "Persisting work order failed: {error:#}");
        if !self.store.restore_if_unchanged(optimistic, before).await {
            tracing::warn!(%id, "Work order changed while persisting, newer state kept");
        }
        self.notify_service
            .notify(NotificationCommand::error(
                format!("Could not {operation} work order"),
                format!("Work order {id} could not be saved ({error}); the change was reverted."),
            ))
            .await;
        CommitOutcome::RolledBack {
            reason: error.to_string(),
        }
    }
}

#[async_trait]
impl AssignmentCommitService for AssignmentCommitServiceImpl {
    async fn assign(
        &self,
        work_order_id: &WorkOrderId,
        target: &AssignmentTarget,
    ) -> DispatchResult<CommitOutcome> {
        let Some(_guard) = self.claim(work_order_id) else {
            return Ok(self
                .rejected(work_order_id, |el| el.is_on(&target.technician_id, target.date))
                .await);
        };
        let before = self.load_dispatchable(work_order_id).await?;
        if before.is_on(&target.technician_id, target.date) {
            tracing::debug!(%work_order_id, "Assignment unchanged, nothing to commit");
            return Ok(CommitOutcome::Unchanged);
        }
        self.check_technician(target).await?;

        let optimistic = before.assigned_to(&target.technician_id, target.date);
        self.store.upsert(optimistic.clone()).await;
        tracing::info!(
            %work_order_id,
            technician_id = %target.technician_id,
            date = %target.date,
            "Work order assigned, persisting"
        );

        match self
            .assignment_repo
            .assign(work_order_id, &target.technician_id, target.date)
            .await
        {
            Ok(()) => {
                self.notify_service
                    .notify(NotificationCommand::success(
                        "Work order scheduled",
                        format!(
                            "Work order {work_order_id} assigned to {} on {}.",
                            target.technician_name,
                            target.date.format("%Y-%m-%d")
                        ),
                    ))
                    .await;
                Ok(CommitOutcome::Committed(optimistic))
            }
            Err(e) => Ok(self.roll_back("assign", &optimistic, before, e).await),
        }
    }

    async fn unassign(&self, work_order_id: &WorkOrderId) -> DispatchResult<CommitOutcome> {
        let Some(_guard) = self.claim(work_order_id) else {
            return Ok(self
                .rejected(work_order_id, |el| !el.is_assigned() && el.scheduled_date.is_none())
                .await);
        };
        let before = self.load_dispatchable(work_order_id).await?;
        if !before.is_assigned() && before.scheduled_date.is_none() {
            tracing::debug!(%work_order_id, "Already unassigned, nothing to commit");
            return Ok(CommitOutcome::Unchanged);
        }

        let optimistic = before.unassigned();
        self.store.upsert(optimistic.clone()).await;
        tracing::info!(%work_order_id, "Work order unassigned, persisting");

        match self.assignment_repo.unassign(work_order_id).await {
            Ok(()) => {
                self.notify_service
                    .notify(NotificationCommand::success(
                        "Work order unassigned",
                        format!("Work order {work_order_id} moved back to the unassigned pool."),
                    ))
                    .await;
                Ok(CommitOutcome::Committed(optimistic))
            }
            Err(e) => Ok(self.roll_back("unassign", &optimistic, before, e).await),
        }
    }
}
