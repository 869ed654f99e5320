use thiserror::Error;

use crate::model::entity::{
    technician::TechnicianStatus, work_order::WorkOrderStatus, TechnicianId, WorkOrderId,
};

pub type DispatchResult<T> = Result<T, DispatchException>;

#[derive(Error, Debug)]
pub enum DispatchException {
    #[error("There is no work order with id: {id}.")]
    NoSuchWorkOrder { id: WorkOrderId },

    #[error("There is no technician with id: {id}.")]
    NoSuchTechnician { id: TechnicianId },

    #[error("Work order: {id} with status: {status} can't be dispatched.")]
    NotDispatchable {
        id: WorkOrderId,
        status: WorkOrderStatus,
    },

    #[error("Technician: {id} is {status} and can't take new work orders.")]
    TechnicianUnavailable {
        id: TechnicianId,
        status: TechnicianStatus,
    },

    #[error("A drag session is already active for work order: {id}.")]
    DragInProgress { id: WorkOrderId },

    #[error("An assignment commit is in progress, new drags are blocked until it resolves.")]
    CommitInProgress,

    #[error("Record: {id} is missing required field: {field}.")]
    MalformedRecord { id: String, field: &'static str },

    #[error("Record: {id} has invalid value: {value} for field: {field}.")]
    InvalidField {
        id: String,
        field: &'static str,
        value: String,
    },

    #[error("Dispatch internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for DispatchException {
    fn from(e: anyhow::Error) -> Self {
        DispatchException::InternalError { source: e }
    }
}
