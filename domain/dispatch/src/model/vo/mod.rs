pub mod board;
pub mod commit;
pub mod drag;
pub mod record;
pub mod target;

#[rustfmt::skip]
pub use {
    board::{BoardConfig, Grid, GridCell, GridRow},
    commit::CommitOutcome,
    drag::{DragPayload, DragState, DropEvent, DropOutcome, Point},
    record::{TechnicianRecord, WorkOrderRecord},
    target::{AssignmentTarget, DropTarget, DropZoneId},
};
