use std::collections::HashMap;

use domain_dispatch::model::vo::{DropEvent, DropTarget, DropZoneId, Grid};
use tokio::sync::RwLock;

/// Zone id to drop target, filled in by every board render.
///
/// The unassigned pool zone is always registered.
#[derive(Debug)]
pub struct DropTargetRegistry {
    zones: RwLock<HashMap<DropZoneId, DropTarget>>,
}

impl Default for DropTargetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn pool_only() -> HashMap<DropZoneId, DropTarget> {
    HashMap::from([(DropZoneId::unassigned_pool(), DropTarget::UnassignedPool)])
}

impl DropTargetRegistry {
    pub fn new() -> Self {
        Self {
            zones: RwLock::new(pool_only()),
        }
    }

    /// Tag one zone. Cells without a technician are refused.
    pub async fn register(&self, zone_id: DropZoneId, target: DropTarget) -> bool {
        if let DropTarget::Cell(cell) = &target {
            if !cell.is_valid() {
                tracing::warn!(%zone_id, "Refused to register a drop zone without technician");
                return false;
            }
        }
        self.zones.write().await.insert(zone_id, target);
        true
    }

    /// Swap the cell zones for the ones of `grid`.
    pub async fn register_grid(&self, grid: &Grid) {
        let mut zones = pool_only();
        zones.extend(
            grid.cells()
                .filter(|cell| cell.target().is_valid())
                .map(|cell| (cell.zone_id().to_owned(), DropTarget::Cell(cell.target().to_owned()))),
        );
        *self.zones.write().await = zones;
    }

    pub async fn len(&self) -> usize {
        self.zones.read().await.len()
    }

    /// Read the target back from a drop. Any missing or unknown tag is `None`.
    pub async fn resolve(&self, event: &DropEvent) -> Option<DropTarget> {
        let zone_id = event.zone_id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
        let target = self.zones.read().await.get(&DropZoneId::from(zone_id)).cloned();
        if target.is_none() {
            tracing::debug!(zone_id, "Drop over unknown zone ignored");
        }
        target
    }
}
