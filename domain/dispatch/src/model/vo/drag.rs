use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::commit::CommitOutcome;
use crate::model::entity::{WorkOrder, WorkOrderId};

/// Pointer position in board pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Snapshot of the dragged work order, owned by the drag session.
#[derive(Clone, Debug, PartialEq)]
pub struct DragPayload {
    pub session_id: Uuid,
    pub work_order: WorkOrder,
    pub started_at: DateTime<Utc>,
}

impl DragPayload {
    pub fn new(work_order: WorkOrder) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            work_order,
            started_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragPayload),
    Committing { work_order_id: WorkOrderId },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Raw pointer release. `zone_id` is the tag of the zone under the pointer, if any.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DropEvent {
    pub zone_id: Option<String>,
    pub point: Point,
}

impl DropEvent {
    pub fn on(zone_id: impl Into<String>, point: Point) -> Self {
        Self {
            zone_id: Some(zone_id.into()),
            point,
        }
    }

    pub fn outside(point: Point) -> Self {
        Self {
            zone_id: None,
            point,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DropOutcome {
    /// Release without an activated drag, i.e. a click.
    NotDragging,
    /// Released over nothing droppable.
    NoTarget,
    Committed(CommitOutcome),
}
