//! Pointer drag lifecycle: press, activate, drop or cancel.

use std::sync::Arc;

use domain_dispatch::{
    exception::{DispatchException, DispatchResult},
    model::{
        entity::WorkOrderId,
        vo::{DragPayload, DragState, DropEvent, DropOutcome, Point},
    },
    service::AssignmentCommitService,
};
use dashmap::DashSet;
use tokio::sync::Mutex;
use typed_builder::TypedBuilder;

use crate::{store::AssignmentStore, target::DropTargetRegistry};

/// Pointer is down on a card but hasn't travelled far enough yet.
#[derive(Debug, Clone)]
struct Press {
    work_order_id: WorkOrderId,
    origin: Point,
}

#[derive(Debug, Default)]
struct Session {
    state: DragState,
    press: Option<Press>,
}

/// Marks a commit handed off by `release`. Cleared on drop, so a caller that
/// abandons the `release` future does not leave the controller stuck.
struct Committing<'a> {
    set: &'a DashSet<WorkOrderId>,
    id: WorkOrderId,
}

impl Drop for Committing<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

/// Owns at most one drag gesture at a time.
#[derive(TypedBuilder)]
pub struct DragSessionController {
    store: Arc<AssignmentStore>,
    registry: Arc<DropTargetRegistry>,
    commit_service: Arc<dyn AssignmentCommitService>,
    /// Pixels of travel before a press becomes a drag.
    #[builder(default = 8.0)]
    activation_distance: f64,
    #[builder(default, setter(skip))]
    session: Mutex<Session>,
    #[builder(default, setter(skip))]
    committing: DashSet<WorkOrderId>,
}

impl DragSessionController {
    fn committing(&self) -> Option<WorkOrderId> {
        self.committing.iter().next().map(|el| el.key().to_owned())
    }

    pub async fn state(&self) -> DragState {
        let session = self.session.lock().await;
        match self.committing() {
            Some(work_order_id) => DragState::Committing { work_order_id },
            None => session.state.clone(),
        }
    }

    /// The dragged snapshot, for overlay rendering.
    pub async fn payload(&self) -> Option<DragPayload> {
        match &self.session.lock().await.state {
            DragState::Dragging(payload) => Some(payload.clone()),
            _ => None,
        }
    }

    /// Pointer down on a work order card. Refused while a drag or a commit is active.
    pub async fn press(&self, work_order_id: WorkOrderId, at: Point) -> DispatchResult<()> {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;
        if self.committing().is_some() {
            return Err(DispatchException::CommitInProgress);
        }
        match &session.state {
            DragState::Idle | DragState::Committing { .. } => {
                session.press = Some(Press {
                    work_order_id,
                    origin: at,
                });
                Ok(())
            }
            DragState::Dragging(payload) => Err(DispatchException::DragInProgress {
                id: payload.work_order.id.to_owned(),
            }),
        }
    }

    /// Pointer moved. Returns whether a drag is active afterwards.
    pub async fn move_to(&self, at: Point) -> DispatchResult<bool> {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;
        if self.committing().is_some() {
            return Ok(false);
        }
        if let DragState::Dragging(_) = session.state {
            return Ok(true);
        }
        let Some(press) = session.press.clone() else {
            return Ok(false);
        };
        if press.origin.distance_to(&at) < self.activation_distance {
            return Ok(false);
        }

        session.press = None;
        let work_order = self.store.by_id(&press.work_order_id).await.ok_or_else(|| {
            DispatchException::NoSuchWorkOrder {
                id: press.work_order_id.to_owned(),
            }
        })?;
        if !work_order.is_dispatchable() {
            return Err(DispatchException::NotDispatchable {
                id: work_order.id,
                status: work_order.status,
            });
        }
        let payload = DragPayload::new(work_order);
        tracing::debug!(
            session_id = %payload.session_id,
            work_order_id = %payload.work_order.id,
            "Drag started"
        );
        session.state = DragState::Dragging(payload);
        Ok(true)
    }

    /// Pointer released. Commits when the drop resolves to a target and always
    /// ends back in `Idle`.
    pub async fn release(&self, event: DropEvent) -> DispatchResult<DropOutcome> {
        let (payload, target, _committing) = {
            let mut session = self.session.lock().await;
            session.press = None;
            let payload = match std::mem::take(&mut session.state) {
                DragState::Dragging(payload) => payload,
                other => {
                    session.state = other;
                    return Ok(DropOutcome::NotDragging);
                }
            };
            let Some(target) = self.registry.resolve(&event).await else {
                tracing::debug!(session_id = %payload.session_id, "Dropped outside any target");
                return Ok(DropOutcome::NoTarget);
            };
            let id = payload.work_order.id.to_owned();
            self.committing.insert(id.to_owned());
            let committing = Committing {
                set: &self.committing,
                id,
            };
            (payload, target, committing)
        };

        match self.commit_service.commit(&payload.work_order.id, &target).await {
            Ok(outcome) => {
                tracing::debug!(session_id = %payload.session_id, ?outcome, "Drag finished");
                Ok(DropOutcome::Committed(outcome))
            }
            Err(e) => {
                tracing::warn!(session_id = %payload.session_id, "Drop refused: {e}");
                Err(e)
            }
        }
    }

    /// Escape key or lost pointer. Returns whether anything was cancelled;
    /// an in-flight commit can't be.
    pub async fn cancel(&self) -> bool {
        let mut guard = self.session.lock().await;
        let session = &mut *guard;
        let pressed = session.press.take().is_some();
        if let DragState::Dragging(payload) = &session.state {
            tracing::debug!(session_id = %payload.session_id, "Drag cancelled");
            session.state = DragState::Idle;
            return true;
        }
        pressed
    }
}
