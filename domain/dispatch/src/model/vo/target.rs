use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::entity::{Technician, TechnicianId};

/// One board cell: a technician on a day.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentTarget {
    pub technician_id: TechnicianId,
    pub technician_name: String,
    pub date: NaiveDate,
}

impl AssignmentTarget {
    pub fn new(technician: &Technician, date: NaiveDate) -> Self {
        Self {
            technician_id: technician.id.to_owned(),
            technician_name: technician.name.to_owned(),
            date,
        }
    }

    /// A target with a blank technician id can't be committed.
    pub fn is_valid(&self) -> bool {
        !self.technician_id.as_str().trim().is_empty()
    }
}

/// Identifier a rendered drop zone is tagged with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DropZoneId(String);

impl DropZoneId {
    const UNASSIGNED_POOL: &'static str = "unassigned";

    pub fn cell(technician_id: &TechnicianId, date: NaiveDate) -> Self {
        Self(format!("cell:{technician_id}:{}", date.format("%Y-%m-%d")))
    }

    pub fn unassigned_pool() -> Self {
        Self(Self::UNASSIGNED_POOL.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DropZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DropZoneId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// What a drop resolves to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropTarget {
    Cell(AssignmentTarget),
    UnassignedPool,
}
