pub mod technician;
pub mod work_order;

#[rustfmt::skip]
pub use {
    technician::{Technician, TechnicianId},
    work_order::{WorkOrder, WorkOrderId},
};
