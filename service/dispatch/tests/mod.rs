use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use domain_dispatch::{
    exception::DispatchException,
    mock::{MockTechnicianSnapshotRepo, MockWorkOrderAssignmentRepo, MockWorkOrderSnapshotRepo},
    model::{
        entity::{
            technician::TechnicianStatus, work_order::WorkOrderStatus, Technician, TechnicianId,
            WorkOrder, WorkOrderId,
        },
        vo::{
            AssignmentTarget, BoardConfig, CommitOutcome, DragState, DropEvent, DropOutcome,
            Point, TechnicianRecord, WorkOrderRecord,
        },
    },
    repository::WorkOrderAssignmentRepo,
    service::{AssignmentCommitService, SnapshotRefreshService},
};
use infrastructure_command::NotificationCommand;
use service_dispatch::{
    AssignmentCommitServiceImpl, AssignmentStore, ChannelNotifyServiceImpl, DispatchBoard,
    DragSessionController, DropTargetRegistry, SnapshotRefreshServiceImpl,
};
use tokio::sync::Notify;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn anchor() -> NaiveDate {
    date("2025-03-17")
}

fn fixture() -> (Vec<Technician>, Vec<WorkOrder>) {
    let mut lee = Technician::new("T2", "Lee");
    lee.status = TechnicianStatus::Busy;
    let mut done = WorkOrder::new("WO-8", "Hooli");
    done.status = WorkOrderStatus::Completed;
    (
        vec![Technician::new("T1", "Dana"), lee],
        vec![
            WorkOrder::new("WO-99", "Acme"),
            WorkOrder::new("WO-7", "Globex").assigned_to(&"T2".into(), date("2025-03-18")),
            done,
            WorkOrder::new("WO-12", "Initech"),
        ],
    )
}

struct Board {
    store: Arc<AssignmentStore>,
    board: DispatchBoard,
    commit: Arc<AssignmentCommitServiceImpl>,
    controller: Arc<DragSessionController>,
    notifications: flume::Receiver<NotificationCommand>,
}

async fn load(repo: Arc<dyn WorkOrderAssignmentRepo>, config: BoardConfig) -> Board {
    let (technicians, work_orders) = fixture();
    let store = Arc::new(AssignmentStore::with_snapshot(technicians, work_orders));
    let registry = Arc::new(DropTargetRegistry::new());
    let (notify_service, notifications) = ChannelNotifyServiceImpl::channel();
    let commit = Arc::new(
        AssignmentCommitServiceImpl::builder()
            .store(store.clone())
            .assignment_repo(repo)
            .notify_service(Arc::new(notify_service))
            .block_unavailable_technicians(config.block_unavailable_technicians)
            .build(),
    );
    let controller = Arc::new(
        DragSessionController::builder()
            .store(store.clone())
            .registry(registry.clone())
            .commit_service(commit.clone())
            .activation_distance(config.activation_distance)
            .build(),
    );
    let board = DispatchBoard::builder()
        .store(store.clone())
        .registry(registry)
        .config(config)
        .build();
    board.render(anchor()).await;
    Board {
        store,
        board,
        commit,
        controller,
        notifications,
    }
}

async fn drag(board: &Board, id: &str, zone: &str) -> Result<DropOutcome, DispatchException> {
    board.controller.press(id.into(), Point::new(0.0, 0.0)).await?;
    assert!(board.controller.move_to(Point::new(12.0, 5.0)).await?);
    board.controller.release(DropEvent::on(zone, Point::new(12.0, 5.0))).await
}

fn target(id: &str, name: &str, day: &str) -> AssignmentTarget {
    AssignmentTarget {
        technician_id: id.into(),
        technician_name: name.into(),
        date: date(day),
    }
}

/// Holds every persistence call until released.
#[derive(Default)]
struct GatedRepo {
    entered: Notify,
    gate: Notify,
    fail: bool,
    calls: AtomicUsize,
}

impl GatedRepo {
    async fn pass(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entered.notify_one();
        self.gate.notified().await;
        if self.fail {
            anyhow::bail!("data store unreachable");
        }
        Ok(())
    }
}

#[async_trait]
impl WorkOrderAssignmentRepo for GatedRepo {
    async fn assign(
        &self,
        _work_order_id: &WorkOrderId,
        _technician_id: &TechnicianId,
        _date: NaiveDate,
    ) -> anyhow::Result<()> {
        self.pass().await
    }

    async fn unassign(&self, _work_order_id: &WorkOrderId) -> anyhow::Result<()> {
        self.pass().await
    }
}

fn ids(work_orders: &[WorkOrder]) -> Vec<&str> {
    work_orders.iter().map(|el| el.id.as_str()).collect()
}

#[tokio::test]
async fn drop_unassigned_order_on_empty_cell() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign()
        .withf(|id, tech, day| {
            id.as_str() == "WO-99" && tech.as_str() == "T1" && *day == date("2025-03-17")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));
    let board = load(Arc::new(repo), BoardConfig::default()).await;
    let t1 = TechnicianId::from("T1");
    assert!(board.store.for_technician_and_date(&t1, anchor()).await.is_empty());

    let outcome = drag(&board, "WO-99", "cell:T1:2025-03-17").await.unwrap();

    assert!(matches!(outcome, DropOutcome::Committed(CommitOutcome::Committed(_))));
    let cell = board.store.for_technician_and_date(&t1, anchor()).await;
    assert_eq!(ids(&cell), ["WO-99"]);
    assert_eq!(cell[0].status, WorkOrderStatus::Scheduled);
    let pool = board.board.unassigned_pool(anchor()).await;
    assert!(!ids(&pool).contains(&"WO-99"));
    assert_eq!(board.controller.state().await, DragState::Idle);

    let toast = board.notifications.try_recv().unwrap();
    assert!(!toast.is_error());
    assert!(toast.message().contains("Dana"));
    assert!(toast.message().contains("2025-03-17"));
}

#[tokio::test]
async fn repeated_commit_is_a_no_op() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().times(1).returning(|_, _, _| Ok(()));
    let board = load(Arc::new(repo), BoardConfig::default()).await;
    let id = WorkOrderId::from("WO-99");
    let target = target("T1", "Dana", "2025-03-19");

    let first = board.commit.assign(&id, &target).await.unwrap();
    let after_first = board.store.list().await;
    let second = board.commit.assign(&id, &target).await.unwrap();

    assert!(first.is_committed());
    assert_eq!(second, CommitOutcome::Unchanged);
    assert_eq!(board.store.list().await, after_first);
    assert_eq!(board.notifications.len(), 1);
}

#[tokio::test]
async fn store_shows_drop_before_persistence_resolves() {
    let repo = Arc::new(GatedRepo::default());
    let board = load(repo.clone(), BoardConfig::default()).await;
    let id = WorkOrderId::from("WO-99");

    let commit = board.commit.clone();
    let pending = tokio::spawn({
        let id = id.clone();
        async move { commit.assign(&id, &target("T1", "Dana", "2025-03-17")).await }
    });
    repo.entered.notified().await;

    let cell = board.store.for_technician_and_date(&"T1".into(), anchor()).await;
    assert_eq!(ids(&cell), ["WO-99"]);
    assert!(board.commit.is_in_flight(&id));

    // Same order, other cell: has to wait for the first commit.
    let busy = board.commit.assign(&id, &target("T2", "Lee", "2025-03-18")).await.unwrap();
    assert_eq!(busy, CommitOutcome::Busy);
    // Same order, same cell: a duplicate of the pending drop.
    let dup = board.commit.assign(&id, &target("T1", "Dana", "2025-03-17")).await.unwrap();
    assert_eq!(dup, CommitOutcome::Unchanged);

    repo.gate.notify_one();
    assert!(pending.await.unwrap().unwrap().is_committed());
    assert!(!board.commit.is_in_flight(&id));
    assert_eq!(repo.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_assign_rolls_back() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().times(1).returning(|_, _, _| Err(anyhow::anyhow!("503 from data store")));
    let board = load(Arc::new(repo), BoardConfig::default()).await;
    let before = board.store.list().await;

    let outcome = drag(&board, "WO-99", "cell:T1:2025-03-17").await.unwrap();

    match outcome {
        DropOutcome::Committed(CommitOutcome::RolledBack { reason }) => {
            assert!(reason.contains("503"))
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(board.store.list().await, before);
    assert!(ids(&board.board.unassigned_pool(anchor()).await).contains(&"WO-99"));
    let toast = board.notifications.try_recv().unwrap();
    assert!(toast.is_error());
    assert!(toast.message().contains("WO-99"));
    assert_eq!(board.controller.state().await, DragState::Idle);
}

#[tokio::test]
async fn rollback_keeps_newer_snapshot() {
    let repo = Arc::new(GatedRepo {
        fail: true,
        ..Default::default()
    });
    let board = load(repo.clone(), BoardConfig::default()).await;
    let id = WorkOrderId::from("WO-99");

    let commit = board.commit.clone();
    let pending = tokio::spawn({
        let id = id.clone();
        async move { commit.assign(&id, &target("T1", "Dana", "2025-03-17")).await }
    });
    repo.entered.notified().await;
    // Another dispatcher's change arrives through a refresh meanwhile.
    let refreshed = WorkOrder::new("WO-99", "Acme").assigned_to(&"T2".into(), date("2025-03-20"));
    board.store.upsert(refreshed.clone()).await;
    repo.gate.notify_one();

    let outcome = pending.await.unwrap().unwrap();
    assert!(matches!(outcome, CommitOutcome::RolledBack { .. }));
    assert_eq!(board.store.by_id(&id).await.unwrap(), refreshed);
}

#[tokio::test]
async fn drop_on_pool_unassigns() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_unassign()
        .withf(|id| id.as_str() == "WO-7")
        .times(1)
        .returning(|_| Ok(()));
    let board = load(Arc::new(repo), BoardConfig::default()).await;

    let outcome = drag(&board, "WO-7", "unassigned").await.unwrap();

    assert!(matches!(outcome, DropOutcome::Committed(CommitOutcome::Committed(_))));
    let wo = board.store.by_id(&"WO-7".into()).await.unwrap();
    assert_eq!(wo.status, WorkOrderStatus::Pending);
    assert!(wo.technician_id.is_none() && wo.scheduled_date.is_none());
    assert!(ids(&board.board.unassigned_pool(anchor()).await).contains(&"WO-7"));

    // Already in the pool.
    let again = board.commit.unassign(&"WO-7".into()).await.unwrap();
    assert_eq!(again, CommitOutcome::Unchanged);
}

#[tokio::test]
async fn failed_unassign_restores_cell() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_unassign().times(1).returning(|_| Err(anyhow::anyhow!("timeout")));
    let board = load(Arc::new(repo), BoardConfig::default()).await;

    let outcome = board.commit.unassign(&"WO-7".into()).await.unwrap();

    assert!(matches!(outcome, CommitOutcome::RolledBack { .. }));
    let cell = board.store.for_technician_and_date(&"T2".into(), date("2025-03-18")).await;
    assert_eq!(ids(&cell), ["WO-7"]);
    assert_eq!(cell[0].status, WorkOrderStatus::Scheduled);
}

#[tokio::test]
async fn busy_technician_accepted_by_default() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().times(1).returning(|_, _, _| Ok(()));
    let board = load(Arc::new(repo), BoardConfig::default()).await;

    let outcome = drag(&board, "WO-99", "cell:T2:2025-03-18").await.unwrap();
    assert!(matches!(outcome, DropOutcome::Committed(CommitOutcome::Committed(_))));
}

#[tokio::test]
async fn busy_technician_refused_when_blocking() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().never();
    let config = BoardConfig {
        block_unavailable_technicians: true,
        ..Default::default()
    };
    let board = load(Arc::new(repo), config).await;
    let before = board.store.list().await;

    let err = drag(&board, "WO-99", "cell:T2:2025-03-18").await.unwrap_err();

    assert!(matches!(
        err,
        DispatchException::TechnicianUnavailable { status: TechnicianStatus::Busy, .. }
    ));
    assert_eq!(board.store.list().await, before);
    assert_eq!(board.controller.state().await, DragState::Idle);
    assert!(board.notifications.is_empty());
}

#[tokio::test]
async fn redrop_on_busy_technician_is_a_no_op_when_blocking() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().never();
    let config = BoardConfig {
        block_unavailable_technicians: true,
        ..Default::default()
    };
    let board = load(Arc::new(repo), config).await;
    let before = board.store.list().await;

    let outcome = board
        .commit
        .assign(&"WO-7".into(), &target("T2", "Lee", "2025-03-18"))
        .await
        .unwrap();
    assert_eq!(outcome, CommitOutcome::Unchanged);

    let outcome = drag(&board, "WO-7", "cell:T2:2025-03-18").await.unwrap();
    assert_eq!(outcome, DropOutcome::Committed(CommitOutcome::Unchanged));
    assert_eq!(board.store.list().await, before);
    assert!(board.notifications.is_empty());
}

#[tokio::test]
async fn terminal_orders_never_drag() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().never();
    let board = load(Arc::new(repo), BoardConfig::default()).await;

    board.controller.press("WO-8".into(), Point::new(0.0, 0.0)).await.unwrap();
    let err = board.controller.move_to(Point::new(20.0, 0.0)).await.unwrap_err();
    assert!(matches!(err, DispatchException::NotDispatchable { .. }));
    assert_eq!(board.controller.state().await, DragState::Idle);

    let err = board
        .commit
        .assign(&"WO-8".into(), &target("T1", "Dana", "2025-03-17"))
        .await
        .unwrap_err();
    assert!(matches!(err, DispatchException::NotDispatchable { status: WorkOrderStatus::Completed, .. }));
    assert!(!ids(&board.store.unassigned().await).contains(&"WO-8"));
}

#[tokio::test]
async fn short_travel_is_a_click() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().never();
    let board = load(Arc::new(repo), BoardConfig::default()).await;

    board.controller.press("WO-99".into(), Point::new(0.0, 0.0)).await.unwrap();
    assert!(!board.controller.move_to(Point::new(3.0, 4.0)).await.unwrap());
    let outcome = board
        .controller
        .release(DropEvent::on("cell:T1:2025-03-17", Point::new(3.0, 4.0)))
        .await
        .unwrap();
    assert_eq!(outcome, DropOutcome::NotDragging);
    assert!(board.store.for_technician_and_date(&"T1".into(), anchor()).await.is_empty());
}

#[tokio::test]
async fn invalid_drops_change_nothing() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().never();
    repo.expect_unassign().never();
    let board = load(Arc::new(repo), BoardConfig::default()).await;
    let before = board.store.list().await;

    for zone in ["", "cell:T1:2030-01-01", "cell:T7:2025-03-17", "toolbar"] {
        let outcome = drag(&board, "WO-99", zone).await.unwrap();
        assert_eq!(outcome, DropOutcome::NoTarget);
    }
    board.controller.press("WO-99".into(), Point::new(0.0, 0.0)).await.unwrap();
    board.controller.move_to(Point::new(40.0, 0.0)).await.unwrap();
    let outcome = board.controller.release(DropEvent::outside(Point::new(40.0, 0.0))).await.unwrap();
    assert_eq!(outcome, DropOutcome::NoTarget);

    assert_eq!(board.store.list().await, before);
    assert!(board.notifications.is_empty());
    assert_eq!(board.controller.state().await, DragState::Idle);
}

#[tokio::test]
async fn cancel_discards_payload() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().never();
    let board = load(Arc::new(repo), BoardConfig::default()).await;

    board.controller.press("WO-99".into(), Point::new(0.0, 0.0)).await.unwrap();
    board.controller.move_to(Point::new(0.0, 9.0)).await.unwrap();
    assert!(board.controller.payload().await.is_some());

    assert!(board.controller.cancel().await);
    assert_eq!(board.controller.state().await, DragState::Idle);
    assert!(board.controller.payload().await.is_none());
    assert!(!board.controller.cancel().await);
    let outcome = board
        .controller
        .release(DropEvent::on("cell:T1:2025-03-17", Point::default()))
        .await
        .unwrap();
    assert_eq!(outcome, DropOutcome::NotDragging);
}

#[tokio::test]
async fn payload_is_isolated_from_store_changes() {
    let board = load(Arc::new(MockWorkOrderAssignmentRepo::new()), BoardConfig::default()).await;

    board.controller.press("WO-99".into(), Point::new(0.0, 0.0)).await.unwrap();
    board.controller.move_to(Point::new(10.0, 10.0)).await.unwrap();
    let mut changed = board.store.by_id(&"WO-99".into()).await.unwrap();
    changed.customer_name = "Acme Heating".into();
    changed.description = "edited during drag".into();
    board.store.upsert(changed).await;

    let payload = board.controller.payload().await.unwrap();
    assert_eq!(payload.work_order.customer_name, "Acme");
    assert!(payload.work_order.description.is_empty());
    board.controller.cancel().await;
}

#[tokio::test]
async fn second_drag_blocked_while_committing() {
    let repo = Arc::new(GatedRepo::default());
    let board = load(repo.clone(), BoardConfig::default()).await;

    board.controller.press("WO-99".into(), Point::new(0.0, 0.0)).await.unwrap();
    board.controller.move_to(Point::new(10.0, 0.0)).await.unwrap();
    let controller = board.controller.clone();
    let pending = tokio::spawn(async move {
        controller
            .release(DropEvent::on("cell:T1:2025-03-17", Point::new(10.0, 0.0)))
            .await
    });
    repo.entered.notified().await;

    assert!(matches!(board.controller.state().await, DragState::Committing { .. }));
    let err = board.controller.press("WO-12".into(), Point::default()).await.unwrap_err();
    assert!(matches!(err, DispatchException::CommitInProgress));
    assert!(!board.controller.cancel().await);

    repo.gate.notify_one();
    let outcome = pending.await.unwrap().unwrap();
    assert!(matches!(outcome, DropOutcome::Committed(CommitOutcome::Committed(_))));
    assert_eq!(board.controller.state().await, DragState::Idle);
    board.controller.press("WO-12".into(), Point::default()).await.unwrap();
}

#[tokio::test]
async fn abandoned_release_frees_the_controller() {
    let repo = Arc::new(GatedRepo::default());
    let board = load(repo.clone(), BoardConfig::default()).await;

    board.controller.press("WO-99".into(), Point::new(0.0, 0.0)).await.unwrap();
    board.controller.move_to(Point::new(10.0, 0.0)).await.unwrap();
    let controller = board.controller.clone();
    let pending = tokio::spawn(async move {
        controller
            .release(DropEvent::on("cell:T1:2025-03-17", Point::new(10.0, 0.0)))
            .await
    });
    repo.entered.notified().await;
    assert!(matches!(board.controller.state().await, DragState::Committing { .. }));

    pending.abort();
    assert!(pending.await.unwrap_err().is_cancelled());

    assert_eq!(board.controller.state().await, DragState::Idle);
    board.controller.press("WO-12".into(), Point::default()).await.unwrap();
    assert!(!board.commit.is_in_flight(&"WO-99".into()));
}

#[tokio::test]
async fn different_orders_commit_independently() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().times(2).returning(|_, _, _| Ok(()));
    let board = load(Arc::new(repo), BoardConfig::default()).await;
    let (a, b) = (WorkOrderId::from("WO-99"), WorkOrderId::from("WO-12"));
    let (ta, tb) = (target("T1", "Dana", "2025-03-17"), target("T1", "Dana", "2025-03-18"));

    let (ra, rb) = futures::join!(board.commit.assign(&a, &ta), board.commit.assign(&b, &tb));

    assert!(ra.unwrap().is_committed());
    assert!(rb.unwrap().is_committed());
    assert!(board.store.unassigned().await.is_empty());
}

#[tokio::test]
async fn every_order_lives_in_exactly_one_place() {
    let mut repo = MockWorkOrderAssignmentRepo::new();
    repo.expect_assign().returning(|_, _, _| Ok(()));
    repo.expect_unassign().returning(|_| Ok(()));
    let board = load(Arc::new(repo), BoardConfig::default()).await;

    drag(&board, "WO-99", "cell:T1:2025-03-17").await.unwrap();
    drag(&board, "WO-99", "cell:T2:2025-03-19").await.unwrap();
    drag(&board, "WO-12", "cell:T1:2025-03-21").await.unwrap();
    drag(&board, "WO-7", "unassigned").await.unwrap();

    let grid = board.board.render(anchor()).await;
    let pool = board.store.unassigned().await;
    for wo in board.store.list().await.iter().filter(|el| el.is_dispatchable()) {
        let in_cells = grid
            .cells()
            .filter(|cell| cell.work_orders().iter().any(|el| el.id == wo.id))
            .count();
        let in_pool = pool.iter().filter(|el| el.id == wo.id).count();
        if wo.technician_id.is_some() {
            assert_eq!((in_cells, in_pool), (1, 0), "{}", wo.id);
        } else {
            assert_eq!((in_cells, in_pool), (0, 1), "{}", wo.id);
        }
    }
}

#[tokio::test]
async fn render_is_deterministic() {
    let board = load(Arc::new(MockWorkOrderAssignmentRepo::new()), BoardConfig::default()).await;
    let first = board.board.render(anchor()).await;
    let second = board.board.render(anchor()).await;
    assert_eq!(first, second);
    assert_eq!(first.days().len(), 5);
    assert_eq!(first.cell_count(), 10);
}

fn record(id: Option<&str>, name: Option<&str>, status: &str) -> WorkOrderRecord {
    WorkOrderRecord {
        id: id.map(Into::into),
        customer_id: Some("c-1".into()),
        customer_name: name.map(Into::into),
        status: Some(status.into()),
        ..Default::default()
    }
}

#[tokio::test]
async fn refresh_replaces_snapshot_and_drops_malformed() {
    let store = Arc::new(AssignmentStore::with_snapshot(fixture().0, fixture().1));
    let mut work_order_repo = MockWorkOrderSnapshotRepo::new();
    work_order_repo.expect_fetch_all().times(1).returning(|| {
        Ok(vec![
            record(Some("WO-200"), Some("Acme"), "pending"),
            record(Some("WO-201"), None, "pending"),
            record(None, Some("Globex"), "pending"),
            record(Some("WO-202"), Some("Globex"), "scheduled"),
        ])
    });
    let mut technician_repo = MockTechnicianSnapshotRepo::new();
    technician_repo.expect_fetch_all().times(1).returning(|| {
        Ok(vec![TechnicianRecord {
            id: Some("T9".into()),
            name: Some("Robin".into()),
            status: Some("off_duty".into()),
        }])
    });
    let service = SnapshotRefreshServiceImpl::builder()
        .store(store.clone())
        .work_order_repo(Arc::new(work_order_repo))
        .technician_repo(Arc::new(technician_repo))
        .build();

    let report = service.refresh().await.unwrap();

    assert_eq!((report.technicians, report.work_orders, report.dropped), (1, 2, 2));
    assert_eq!(ids(&store.list().await), ["WO-200", "WO-202"]);
    assert_eq!(store.technicians().await[0].status, TechnicianStatus::OffDuty);
}

#[tokio::test]
async fn refresh_never_hides_an_order() {
    let store = Arc::new(AssignmentStore::with_snapshot(fixture().0, fixture().1));
    let mut work_order_repo = MockWorkOrderSnapshotRepo::new();
    work_order_repo.expect_fetch_all().times(1).returning(|| {
        Ok(vec![
            WorkOrderRecord {
                technician_id: Some("T1".into()),
                ..record(Some("WO-1"), Some("Acme"), "scheduled")
            },
            WorkOrderRecord {
                technician_id: Some("T7".into()),
                scheduled_date: Some("2025-03-18".into()),
                ..record(Some("WO-2"), Some("Globex"), "scheduled")
            },
            WorkOrderRecord {
                technician_id: Some("T1".into()),
                scheduled_date: Some("2025-03-19".into()),
                ..record(Some("WO-3"), Some("Initech"), "scheduled")
            },
            record(Some("WO-4"), Some("Hooli"), "pending"),
        ])
    });
    let mut technician_repo = MockTechnicianSnapshotRepo::new();
    technician_repo.expect_fetch_all().times(1).returning(|| {
        Ok(vec![TechnicianRecord {
            id: Some("T1".into()),
            name: Some("Dana".into()),
            status: None,
        }])
    });
    let service = SnapshotRefreshServiceImpl::builder()
        .store(store.clone())
        .work_order_repo(Arc::new(work_order_repo))
        .technician_repo(Arc::new(technician_repo))
        .build();
    let board = DispatchBoard::builder()
        .store(store.clone())
        .registry(Arc::new(DropTargetRegistry::new()))
        .config(BoardConfig::default())
        .build();

    let report = service.refresh().await.unwrap();
    assert_eq!((report.work_orders, report.dropped), (3, 1));

    let grid = board.render(anchor()).await;
    let pool = board.unassigned_pool(anchor()).await;
    assert_eq!(ids(&pool), ["WO-2", "WO-4"]);
    for wo in store.list().await {
        let in_cells = grid
            .cells()
            .filter(|cell| cell.work_orders().iter().any(|el| el.id == wo.id))
            .count();
        let in_pool = pool.iter().filter(|el| el.id == wo.id).count();
        assert_eq!(in_cells + in_pool, 1, "{}", wo.id);
    }
}

#[tokio::test]
async fn failed_refresh_keeps_working_set() {
    let store = Arc::new(AssignmentStore::with_snapshot(fixture().0, fixture().1));
    let mut work_order_repo = MockWorkOrderSnapshotRepo::new();
    work_order_repo
        .expect_fetch_all()
        .returning(|| Err(anyhow::anyhow!("connection reset")));
    let mut technician_repo = MockTechnicianSnapshotRepo::new();
    technician_repo.expect_fetch_all().returning(|| Ok(vec![]));
    let service = SnapshotRefreshServiceImpl::builder()
        .store(store.clone())
        .work_order_repo(Arc::new(work_order_repo))
        .technician_repo(Arc::new(technician_repo))
        .build();

    let err = service.refresh().await.unwrap_err();

    assert!(matches!(err, DispatchException::InternalError { .. }));
    assert_eq!(store.list().await, fixture().1);
    assert_eq!(store.technicians().await.len(), 2);
}
