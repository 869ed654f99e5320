mod commit;
mod notify;
mod refresh;

#[rustfmt::skip]
pub use {
    commit::AssignmentCommitService,
    notify::NotifyService,
    refresh::{RefreshReport, SnapshotRefreshService},
};
