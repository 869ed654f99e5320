mod assignment;
mod snapshot;

#[rustfmt::skip]
pub use {
    assignment::WorkOrderAssignmentRepo,
    snapshot::{TechnicianSnapshotRepo, WorkOrderSnapshotRepo},
};
