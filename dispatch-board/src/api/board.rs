//! Plain-terminal rendering of the board.

use colored::{ColoredString, Colorize};
use domain_dispatch::model::{
    entity::{
        technician::TechnicianStatus,
        work_order::{Priority, WorkOrderStatus},
        WorkOrder,
    },
    vo::Grid,
};

const NAME_WIDTH: usize = 18;
const CELL_WIDTH: usize = 16;

fn pad(text: &str, width: usize) -> String {
    let mut text: String = text.chars().take(width - 1).collect();
    while text.chars().count() < width {
        text.push(' ');
    }
    text
}

fn card(work_order: &WorkOrder) -> String {
    match work_order.scheduled_time {
        Some(time) => format!("{} {}", work_order.id, time.format("%H:%M")),
        None => work_order.id.to_string(),
    }
}

fn paint(text: String, work_order: &WorkOrder) -> ColoredString {
    if work_order.status.is_terminal() {
        return text.dimmed();
    }
    let text = match work_order.priority {
        Priority::Emergency => text.red().bold(),
        Priority::High => text.yellow(),
        Priority::Medium => text.normal(),
        Priority::Low => text.dimmed(),
    };
    match work_order.status {
        WorkOrderStatus::InProgress | WorkOrderStatus::PendingCompletion => text.underline(),
        _ => text,
    }
}

fn technician_label(name: &str, status: TechnicianStatus) -> ColoredString {
    let text = pad(name, NAME_WIDTH);
    match status {
        TechnicianStatus::Available => text.green(),
        TechnicianStatus::Busy => text.yellow(),
        TechnicianStatus::OffDuty => text.dimmed(),
    }
}

/// Grid rows, one card per line inside each cell, then the unassigned pool.
pub fn render(grid: &Grid, pool: &[WorkOrder]) -> String {
    let mut out = String::new();
    out.push_str(&pad("Technician", NAME_WIDTH).bold().to_string());
    for day in grid.days() {
        out.push_str(&pad(&day.format("%a %m-%d").to_string(), CELL_WIDTH).bold().to_string());
    }
    out.push('\n');

    for row in grid.rows() {
        let technician = row.technician();
        let height = row
            .cells()
            .iter()
            .map(|cell| cell.work_orders().len())
            .max()
            .unwrap_or(0)
            .max(1);
        for line in 0..height {
            if line == 0 {
                out.push_str(&technician_label(&technician.name, technician.status).to_string());
            } else {
                out.push_str(&pad("", NAME_WIDTH));
            }
            for cell in row.cells() {
                match cell.work_orders().get(line) {
                    Some(work_order) => {
                        let text = pad(&card(work_order), CELL_WIDTH);
                        out.push_str(&paint(text, work_order).to_string());
                    }
                    None if line == 0 && cell.is_empty() => {
                        out.push_str(&pad("·", CELL_WIDTH).dimmed().to_string())
                    }
                    None => out.push_str(&pad("", CELL_WIDTH)),
                }
            }
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&format!("{} ({})\n", "Unassigned".bold(), pool.len()));
    for work_order in pool {
        let line = match work_order.scheduled_date {
            Some(date) => format!(
                "  {} {} [{}] wanted {}",
                work_order.id,
                work_order.customer_name,
                work_order.category,
                date.format("%m-%d")
            ),
            None => format!(
                "  {} {} [{}]",
                work_order.id, work_order.customer_name, work_order.category
            ),
        };
        out.push_str(&paint(line, work_order).to_string());
        out.push('\n');
    }
    out
}
