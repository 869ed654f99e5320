use chrono::{Days, NaiveDate};
use domain_dispatch::model::{
    entity::{Technician, WorkOrder},
    vo::{AssignmentTarget, Grid, GridCell, GridRow},
};

/// How work orders inside one cell are ordered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellOrder {
    /// Store-list order.
    #[default]
    Insertion,
    /// By time of day, untimed orders last, ties in store-list order.
    TimeOfDay,
}

impl CellOrder {
    pub fn from_flag(order_cells_by_time: bool) -> Self {
        if order_cells_by_time {
            Self::TimeOfDay
        } else {
            Self::Insertion
        }
    }
}

/// `day_count` consecutive days starting at `anchor`.
pub fn visible_days(anchor: NaiveDate, day_count: u32) -> Vec<NaiveDate> {
    (0..day_count)
        .filter_map(|offset| anchor.checked_add_days(Days::new(offset.into())))
        .collect()
}

/// Technician rows by day columns, each cell holding that technician's orders
/// of that day. Pure; the same inputs always give the same grid.
pub fn generate(
    technicians: &[Technician],
    work_orders: &[WorkOrder],
    anchor: NaiveDate,
    day_count: u32,
    order: CellOrder,
) -> Grid {
    let days = visible_days(anchor, day_count);
    let rows = technicians
        .iter()
        .map(|technician| {
            let cells = days
                .iter()
                .map(|&date| {
                    let mut bucket = work_orders
                        .iter()
                        .filter(|el| el.is_on(&technician.id, date))
                        .cloned()
                        .collect::<Vec<_>>();
                    if order == CellOrder::TimeOfDay {
                        // Stable sort, `None` after every time.
                        bucket.sort_by_key(|el| (el.scheduled_time.is_none(), el.scheduled_time));
                    }
                    GridCell::new(AssignmentTarget::new(technician, date), bucket)
                })
                .collect();
            GridRow::new(technician.to_owned(), cells)
        })
        .collect();
    Grid::new(anchor, days, rows)
}
