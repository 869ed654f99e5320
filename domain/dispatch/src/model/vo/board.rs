//! Board grid handed to presentation code. Read-only outside this crate family.

use chrono::NaiveDate;
use getset::Getters;
use serde::{Deserialize, Serialize};

use super::target::{AssignmentTarget, DropZoneId};
use crate::model::entity::{Technician, TechnicianId, WorkOrder};

#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct Grid {
    anchor: NaiveDate,
    days: Vec<NaiveDate>,
    rows: Vec<GridRow>,
}

#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct GridRow {
    technician: Technician,
    cells: Vec<GridCell>,
}

#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct GridCell {
    zone_id: DropZoneId,
    target: AssignmentTarget,
    work_orders: Vec<WorkOrder>,
}

impl Grid {
    pub fn new(anchor: NaiveDate, days: Vec<NaiveDate>, rows: Vec<GridRow>) -> Self {
        Self { anchor, days, rows }
    }

    pub fn cell(&self, technician_id: &TechnicianId, date: NaiveDate) -> Option<&GridCell> {
        self.rows
            .iter()
            .find(|row| &row.technician.id == technician_id)?
            .cells
            .iter()
            .find(|cell| cell.target.date == date)
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flat_map(|row| row.cells.iter())
    }

    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).sum()
    }
}

impl GridRow {
    pub fn new(technician: Technician, cells: Vec<GridCell>) -> Self {
        Self { technician, cells }
    }
}

impl GridCell {
    pub fn new(target: AssignmentTarget, work_orders: Vec<WorkOrder>) -> Self {
        Self {
            zone_id: DropZoneId::cell(&target.technician_id, target.date),
            target,
            work_orders,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.work_orders.is_empty()
    }
}

/// Board behaviour knobs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of consecutive days shown from the anchor date.
    #[serde(default = "BoardConfig::default_day_count")]
    pub day_count: u32,
    /// Pointer travel in pixels before a press turns into a drag.
    #[serde(default = "BoardConfig::default_activation_distance")]
    pub activation_distance: f64,
    /// Order cell contents by time of day instead of store order.
    #[serde(default)]
    pub order_cells_by_time: bool,
    /// Refuse drops onto busy or off-duty technicians.
    #[serde(default)]
    pub block_unavailable_technicians: bool,
}

impl BoardConfig {
    fn default_day_count() -> u32 {
        5
    }
    fn default_activation_distance() -> f64 {
        8.0
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            day_count: Self::default_day_count(),
            activation_distance: Self::default_activation_distance(),
            order_cells_by_time: false,
            block_unavailable_technicians: false,
        }
    }
}
