//! In-memory working set the whole board reads from.

use std::{collections::HashMap, ops::RangeInclusive};

use chrono::NaiveDate;
use domain_dispatch::model::entity::{Technician, TechnicianId, WorkOrder, WorkOrderId};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Snapshot {
    technicians: Vec<Technician>,
    work_orders: Vec<WorkOrder>,
}

impl Snapshot {
    /// Dispatchable orders no grid row can hold: no technician, no day, or a
    /// technician missing from the roster.
    fn pooled(&self) -> impl Iterator<Item = &WorkOrder> + '_ {
        self.work_orders
            .iter()
            .filter(|el| el.is_dispatchable())
            .filter(|el| match (&el.technician_id, el.scheduled_date) {
                (Some(technician_id), Some(_)) => {
                    !self.technicians.iter().any(|t| &t.id == technician_id)
                }
                _ => true,
            })
    }
}

/// Work orders and technicians in store-list order.
///
/// Shared through `Arc`; every mutation goes through the methods below.
#[derive(Debug, Default)]
pub struct AssignmentStore {
    snapshot: RwLock<Snapshot>,
}

/// Keeps first position, last value for repeated ids.
fn dedup_work_orders(work_orders: Vec<WorkOrder>) -> Vec<WorkOrder> {
    let mut positions: HashMap<WorkOrderId, usize> = HashMap::with_capacity(work_orders.len());
    let mut result: Vec<WorkOrder> = Vec::with_capacity(work_orders.len());
    for work_order in work_orders {
        match positions.get(&work_order.id) {
            Some(&index) => {
                tracing::warn!(id = %work_order.id, "Duplicated work order in snapshot, keeping the last one");
                result[index] = work_order;
            }
            None => {
                positions.insert(work_order.id.to_owned(), result.len());
                result.push(work_order);
            }
        }
    }
    result
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(technicians: Vec<Technician>, work_orders: Vec<WorkOrder>) -> Self {
        Self {
            snapshot: RwLock::new(Snapshot {
                technicians,
                work_orders: dedup_work_orders(work_orders),
            }),
        }
    }

    /// Full copy of the work orders.
    pub async fn list(&self) -> Vec<WorkOrder> {
        self.snapshot.read().await.work_orders.clone()
    }

    /// Replace by id in place, or append.
    pub async fn upsert(&self, work_order: WorkOrder) {
        let mut snapshot = self.snapshot.write().await;
        match snapshot.work_orders.iter_mut().find(|el| el.id == work_order.id) {
            Some(existing) => *existing = work_order,
            None => snapshot.work_orders.push(work_order),
        }
    }

    pub async fn by_id(&self, id: &WorkOrderId) -> Option<WorkOrder> {
        self.snapshot.read().await.work_orders.iter().find(|el| &el.id == id).cloned()
    }

    /// Every dispatchable work order that belongs in the unassigned pool.
    pub async fn unassigned(&self) -> Vec<WorkOrder> {
        self.snapshot.read().await.pooled().cloned().collect()
    }

    /// Unassigned pool for a visible day range.
    ///
    /// Undated orders are always part of it; dated ones only inside `range`.
    pub async fn unassigned_in_range(&self, range: RangeInclusive<NaiveDate>) -> Vec<WorkOrder> {
        self.snapshot
            .read()
            .await
            .pooled()
            .filter(|el| el.scheduled_date.map_or(true, |date| range.contains(&date)))
            .cloned()
            .collect()
    }

    /// Orders of `technician_id` on `date`, day granularity.
    pub async fn for_technician_and_date(
        &self,
        technician_id: &TechnicianId,
        date: NaiveDate,
    ) -> Vec<WorkOrder> {
        self.snapshot
            .read()
            .await
            .work_orders
            .iter()
            .filter(|el| el.is_on(technician_id, date))
            .cloned()
            .collect()
    }

    pub async fn technicians(&self) -> Vec<Technician> {
        self.snapshot.read().await.technicians.clone()
    }

    pub async fn technician(&self, id: &TechnicianId) -> Option<Technician> {
        self.snapshot.read().await.technicians.iter().find(|el| &el.id == id).cloned()
    }

    /// Both lists copied under one read lock.
    pub async fn read_snapshot(&self) -> (Vec<Technician>, Vec<WorkOrder>) {
        let snapshot = self.snapshot.read().await;
        (snapshot.technicians.clone(), snapshot.work_orders.clone())
    }

    /// Full replacement of the work orders, never a merge.
    pub async fn replace_all(&self, work_orders: Vec<WorkOrder>) {
        let work_orders = dedup_work_orders(work_orders);
        self.snapshot.write().await.work_orders = work_orders;
    }

    /// Roster replacement; work orders are left alone.
    pub async fn replace_technicians(&self, technicians: Vec<Technician>) {
        self.snapshot.write().await.technicians = technicians;
    }

    /// Replace technicians and work orders in one step.
    pub async fn replace_snapshot(&self, technicians: Vec<Technician>, work_orders: Vec<WorkOrder>) {
        let work_orders = dedup_work_orders(work_orders);
        let mut snapshot = self.snapshot.write().await;
        snapshot.technicians = technicians;
        snapshot.work_orders = work_orders;
    }

    /// Put `previous` back, but only while the store still holds `expected`.
    ///
    /// Returns false when something else (a snapshot refresh) already replaced
    /// the record; that newer state is kept.
    pub async fn restore_if_unchanged(&self, expected: &WorkOrder, previous: WorkOrder) -> bool {
        let mut snapshot = self.snapshot.write().await;
        match snapshot.work_orders.iter_mut().find(|el| el.id == previous.id) {
            Some(current) if current == expected => {
                *current = previous;
                true
            }
            _ => false,
        }
    }
}
