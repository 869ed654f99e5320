use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use domain_dispatch::{
    model::{
        entity::{TechnicianId, WorkOrderId},
        vo::{TechnicianRecord, WorkOrderRecord},
    },
    repository::{TechnicianSnapshotRepo, WorkOrderAssignmentRepo, WorkOrderSnapshotRepo},
};
use serde::Deserialize;
use typed_builder::TypedBuilder;

#[derive(Debug, Default, Deserialize)]
struct BoardFile {
    #[serde(default)]
    technicians: Vec<TechnicianRecord>,
    #[serde(default)]
    work_orders: Vec<WorkOrderRecord>,
}

/// Offline board read from a YAML file.
///
/// Assignments are kept in memory and laid over the file on every fetch; the
/// file itself is never written.
#[derive(TypedBuilder)]
pub struct FileRepo {
    path: PathBuf,
    #[builder(default, setter(skip))]
    assignments: DashMap<WorkOrderId, Option<(TechnicianId, NaiveDate)>>,
}

impl FileRepo {
    async fn read(&self) -> anyhow::Result<BoardFile> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Cannot read {}", self.path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("Cannot parse {}", self.path.display()))
    }

    fn overlay(&self, mut record: WorkOrderRecord) -> WorkOrderRecord {
        let Some(id) = record.id.clone() else {
            return record;
        };
        if let Some(entry) = self.assignments.get(&WorkOrderId::from(id)) {
            match entry.value() {
                Some((technician_id, date)) => {
                    record.technician_id = Some(technician_id.to_string());
                    record.scheduled_date = Some(date.format("%Y-%m-%d").to_string());
                }
                None => {
                    record.technician_id = None;
                    record.scheduled_date = None;
                    record.scheduled_time = None;
                }
            }
        }
        record
    }
}

#[async_trait]
impl WorkOrderAssignmentRepo for FileRepo {
    async fn assign(
        &self,
        work_order_id: &WorkOrderId,
        technician_id: &TechnicianId,
        date: NaiveDate,
    ) -> anyhow::Result<()> {
        self.assignments
            .insert(work_order_id.to_owned(), Some((technician_id.to_owned(), date)));
        Ok(())
    }

    async fn unassign(&self, work_order_id: &WorkOrderId) -> anyhow::Result<()> {
        self.assignments.insert(work_order_id.to_owned(), None);
        Ok(())
    }
}

#[async_trait]
impl WorkOrderSnapshotRepo for FileRepo {
    async fn fetch_all(&self) -> anyhow::Result<Vec<WorkOrderRecord>> {
        let file = self.read().await?;
        Ok(file.work_orders.into_iter().map(|el| self.overlay(el)).collect())
    }
}

#[async_trait]
impl TechnicianSnapshotRepo for FileRepo {
    async fn fetch_all(&self) -> anyhow::Result<Vec<TechnicianRecord>> {
        Ok(self.read().await?.technicians)
    }
}
