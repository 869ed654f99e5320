use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::TechnicianId;

/// Opaque work order id, e.g. `WO-99`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkOrderId(String);

impl WorkOrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WorkOrderId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for WorkOrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderCategory {
    #[default]
    Repair,
    Maintenance,
    Installation,
    Inspection,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Emergency,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderStatus {
    /// Created, waiting for a technician.
    #[default]
    Pending,
    /// Has a technician and a day.
    Scheduled,
    InProgress,
    /// Work done on site, waiting for sign-off.
    PendingCompletion,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    /// Terminal statuses never take part in dispatching.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::PendingCompletion => "pending_completion",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for WorkOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WorkOrderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Repair => "repair",
            Self::Maintenance => "maintenance",
            Self::Installation => "installation",
            Self::Inspection => "inspection",
        })
    }
}

/// Unknown value, carried back to the caller for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

/// Accepts `snake_case`, `kebab-case` and any letter case.
fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

impl FromStr for WorkOrderStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize(s).as_str() {
            "pending" => Self::Pending,
            "scheduled" => Self::Scheduled,
            "in_progress" => Self::InProgress,
            "pending_completion" => Self::PendingCompletion,
            "completed" => Self::Completed,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => return Err(UnknownVariant(s.to_owned())),
        })
    }
}

impl FromStr for WorkOrderCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize(s).as_str() {
            "repair" => Self::Repair,
            "maintenance" => Self::Maintenance,
            "installation" => Self::Installation,
            "inspection" => Self::Inspection,
            _ => return Err(UnknownVariant(s.to_owned())),
        })
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match normalize(s).as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "emergency" => Self::Emergency,
            _ => return Err(UnknownVariant(s.to_owned())),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: WorkOrderId,
    pub customer_id: String,
    pub customer_name: String,
    pub address: String,
    pub category: WorkOrderCategory,
    pub description: String,
    pub priority: Priority,
    pub status: WorkOrderStatus,
    /// `None` means the order sits in the unassigned pool.
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub technician_id: Option<TechnicianId>,
}

impl WorkOrder {
    /// A pending, unassigned work order.
    pub fn new(id: impl Into<WorkOrderId>, customer_name: impl Into<String>) -> Self {
        let customer_name = customer_name.into();
        Self {
            id: id.into(),
            customer_id: customer_name.to_lowercase(),
            customer_name,
            address: String::new(),
            category: WorkOrderCategory::default(),
            description: String::new(),
            priority: Priority::default(),
            status: WorkOrderStatus::Pending,
            scheduled_date: None,
            scheduled_time: None,
            technician_id: None,
        }
    }

    /// Whether the order may be dragged onto the board at all.
    pub fn is_dispatchable(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn is_assigned(&self) -> bool {
        self.technician_id.is_some()
    }

    /// Exact technician and day match, time of day ignored.
    pub fn is_on(&self, technician_id: &TechnicianId, date: NaiveDate) -> bool {
        self.technician_id.as_ref() == Some(technician_id) && self.scheduled_date == Some(date)
    }

    /// The record after assigning it to `technician_id` on `date`.
    ///
    /// A pending order advances to scheduled, any other status is kept. The
    /// time of day survives a move between days.
    pub fn assigned_to(&self, technician_id: &TechnicianId, date: NaiveDate) -> Self {
        let mut next = self.clone();
        next.technician_id = Some(technician_id.to_owned());
        next.scheduled_date = Some(date);
        if next.status == WorkOrderStatus::Pending {
            next.status = WorkOrderStatus::Scheduled;
        }
        next
    }

    /// The record after moving it back into the unassigned pool.
    pub fn unassigned(&self) -> Self {
        let mut next = self.clone();
        next.technician_id = None;
        next.scheduled_date = None;
        next.scheduled_time = None;
        if next.status == WorkOrderStatus::Scheduled {
            next.status = WorkOrderStatus::Pending;
        }
        next
    }
}
