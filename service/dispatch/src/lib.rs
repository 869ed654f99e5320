mod board;
mod commit;
mod drag;
pub mod layout;
mod notify;
mod refresh;
mod store;
mod target;

pub use board::DispatchBoard;
pub use commit::AssignmentCommitServiceImpl;
pub use drag::DragSessionController;
pub use notify::ChannelNotifyServiceImpl;
pub use refresh::SnapshotRefreshServiceImpl;
pub use store::AssignmentStore;
pub use target::DropTargetRegistry;
