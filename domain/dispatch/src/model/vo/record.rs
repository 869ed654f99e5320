//! Raw rows as fetched from the hosted data store.
//!
//! Every field is optional on the wire; conversion into entities rejects rows
//! missing what the board needs.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::exception::{DispatchException, DispatchResult};
use crate::model::entity::{Technician, WorkOrder};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderRecord {
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    pub address: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    /// `YYYY-MM-DD`, or a timestamp whose date and time are both taken.
    pub scheduled_date: Option<String>,
    pub scheduled_time: Option<String>,
    pub technician_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicianRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub status: Option<String>,
}

fn required<'a>(
    id: &str,
    value: &'a Option<String>,
    field: &'static str,
) -> DispatchResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DispatchException::MalformedRecord {
            id: id.to_owned(),
            field,
        }),
    }
}

fn parsed<T: FromStr>(id: &str, value: &str, field: &'static str) -> DispatchResult<T> {
    value.parse().map_err(|_| DispatchException::InvalidField {
        id: id.to_owned(),
        field,
        value: value.to_owned(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits a stored schedule into day and optional time of day.
fn parse_schedule(id: &str, raw: &str) -> DispatchResult<(NaiveDate, Option<NaiveTime>)> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok((date, None));
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        let at = at.naive_local();
        return Ok((at.date(), Some(at.time())));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok((at.date(), Some(at.time())));
        }
    }
    Err(DispatchException::InvalidField {
        id: id.to_owned(),
        field: "scheduled_date",
        value: raw.to_owned(),
    })
}

fn parse_time(id: &str, raw: &str) -> DispatchResult<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| DispatchException::InvalidField {
            id: id.to_owned(),
            field: "scheduled_time",
            value: raw.to_owned(),
        })
}

impl TryFrom<WorkOrderRecord> for WorkOrder {
    type Error = DispatchException;

    fn try_from(record: WorkOrderRecord) -> DispatchResult<Self> {
        let id = required("<unknown>", &record.id, "id")?.to_owned();
        let customer_id = required(&id, &record.customer_id, "customer_id")?.to_owned();
        let customer_name = required(&id, &record.customer_name, "customer_name")?.to_owned();
        let status = parsed(&id, required(&id, &record.status, "status")?, "status")?;
        let category = match non_blank(record.category) {
            Some(v) => parsed(&id, &v, "category")?,
            None => Default::default(),
        };
        let priority = match non_blank(record.priority) {
            Some(v) => parsed(&id, &v, "priority")?,
            None => Default::default(),
        };
        let (scheduled_date, mut scheduled_time) = match non_blank(record.scheduled_date) {
            Some(v) => {
                let (date, time) = parse_schedule(&id, &v)?;
                (Some(date), time)
            }
            None => (None, None),
        };
        if let Some(v) = non_blank(record.scheduled_time) {
            scheduled_time = Some(parse_time(&id, &v)?);
        }
        let technician_id = non_blank(record.technician_id);
        if technician_id.is_some() && scheduled_date.is_none() {
            return Err(DispatchException::MalformedRecord {
                id,
                field: "scheduled_date",
            });
        }

        Ok(Self {
            id: id.into(),
            customer_id,
            customer_name,
            address: record.address.unwrap_or_default(),
            category,
            description: record.description.unwrap_or_default(),
            priority,
            status,
            scheduled_date,
            scheduled_time,
            technician_id: technician_id.map(Into::into),
        })
    }
}

impl TryFrom<TechnicianRecord> for Technician {
    type Error = DispatchException;

    fn try_from(record: TechnicianRecord) -> DispatchResult<Self> {
        let id = required("<unknown>", &record.id, "id")?.to_owned();
        let name = required(&id, &record.name, "name")?.to_owned();
        let status = match non_blank(record.status) {
            Some(v) => parsed(&id, &v, "status")?,
            None => Default::default(),
        };
        Ok(Self {
            id: id.into(),
            name,
            status,
        })
    }
}
