use std::sync::Arc;

use chrono::NaiveDate;
use domain_dispatch::model::{
    entity::WorkOrder,
    vo::{BoardConfig, Grid},
};
use typed_builder::TypedBuilder;

use crate::{
    layout::{self, CellOrder},
    store::AssignmentStore,
    target::DropTargetRegistry,
};

/// What presentation code talks to: renders the grid and keeps the drop
/// zones in step with it.
#[derive(TypedBuilder)]
pub struct DispatchBoard {
    store: Arc<AssignmentStore>,
    registry: Arc<DropTargetRegistry>,
    #[builder(default)]
    config: BoardConfig,
}

impl DispatchBoard {
    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Grid for the days starting at `anchor`; re-registers every cell zone.
    pub async fn render(&self, anchor: NaiveDate) -> Grid {
        let (technicians, work_orders) = self.store.read_snapshot().await;
        let grid = layout::generate(
            &technicians,
            &work_orders,
            anchor,
            self.config.day_count,
            CellOrder::from_flag(self.config.order_cells_by_time),
        );
        self.registry.register_grid(&grid).await;
        grid
    }

    /// Unassigned cards shown beside the grid for the same days.
    pub async fn unassigned_pool(&self, anchor: NaiveDate) -> Vec<WorkOrder> {
        let days = layout::visible_days(anchor, self.config.day_count);
        match (days.first(), days.last()) {
            (Some(&first), Some(&last)) => self.store.unassigned_in_range(first..=last).await,
            _ => self
                .store
                .unassigned()
                .await
                .into_iter()
                .filter(|el| el.scheduled_date.is_none())
                .collect(),
        }
    }
}
