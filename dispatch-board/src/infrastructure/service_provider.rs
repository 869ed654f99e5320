use std::sync::Arc;

use domain_dispatch::{
    repository::{TechnicianSnapshotRepo, WorkOrderAssignmentRepo, WorkOrderSnapshotRepo},
    service::SnapshotRefreshService,
};
use getset::Getters;
use infrastructure_command::NotificationCommand;
use service_dispatch::{
    AssignmentCommitServiceImpl, AssignmentStore, ChannelNotifyServiceImpl, DispatchBoard,
    DragSessionController, DropTargetRegistry, SnapshotRefreshServiceImpl,
};

use super::{
    config::{DispatchConfig, StoreKind},
    repository::{build_http_client, parse_base_url, FileRepo, RestRepo},
};

/// Everything the console needs, wired once at startup.
#[derive(Getters)]
#[getset(get = "pub")]
pub struct ServiceProvider {
    config: DispatchConfig,
    store: Arc<AssignmentStore>,
    board: Arc<DispatchBoard>,
    controller: Arc<DragSessionController>,
    refresh_service: Arc<dyn SnapshotRefreshService>,
    notifications: flume::Receiver<NotificationCommand>,
}

struct Repos {
    assignment: Arc<dyn WorkOrderAssignmentRepo>,
    work_orders: Arc<dyn WorkOrderSnapshotRepo>,
    technicians: Arc<dyn TechnicianSnapshotRepo>,
}

fn build_repos(config: &DispatchConfig) -> anyhow::Result<Repos> {
    let store_config = config.store();
    Ok(match store_config.kind() {
        StoreKind::Rest => {
            let repo = Arc::new(
                RestRepo::builder()
                    .client(build_http_client(store_config)?)
                    .base_url(parse_base_url(store_config.base_url())?)
                    .build(),
            );
            Repos {
                assignment: repo.clone(),
                work_orders: repo.clone(),
                technicians: repo,
            }
        }
        StoreKind::File => {
            let repo = Arc::new(
                FileRepo::builder()
                    .path(store_config.snapshot_path().clone())
                    .build(),
            );
            Repos {
                assignment: repo.clone(),
                work_orders: repo.clone(),
                technicians: repo,
            }
        }
    })
}

impl ServiceProvider {
    pub async fn build(config: config::Config) -> anyhow::Result<Self> {
        let config: DispatchConfig = config.try_deserialize()?;
        let repos = build_repos(&config)?;
        let board_config = config.board().clone();

        let store = Arc::new(AssignmentStore::new());
        let registry = Arc::new(DropTargetRegistry::new());
        let (notify_service, notifications) = ChannelNotifyServiceImpl::channel();
        let commit_service = Arc::new(
            AssignmentCommitServiceImpl::builder()
                .store(store.clone())
                .assignment_repo(repos.assignment)
                .notify_service(Arc::new(notify_service))
                .block_unavailable_technicians(board_config.block_unavailable_technicians)
                .build(),
        );
        let controller = Arc::new(
            DragSessionController::builder()
                .store(store.clone())
                .registry(registry.clone())
                .commit_service(commit_service)
                .activation_distance(board_config.activation_distance)
                .build(),
        );
        let refresh_service = Arc::new(
            SnapshotRefreshServiceImpl::builder()
                .store(store.clone())
                .work_order_repo(repos.work_orders)
                .technician_repo(repos.technicians)
                .build(),
        );
        let board = Arc::new(
            DispatchBoard::builder()
                .store(store.clone())
                .registry(registry)
                .config(board_config)
                .build(),
        );

        Ok(Self {
            config,
            store,
            board,
            controller,
            refresh_service,
            notifications,
        })
    }
}
