use std::str::FromStr;

use anyhow::{anyhow, bail};
use chrono::{Days, NaiveDate};
use colored::Colorize;
use domain_dispatch::{
    model::{
        entity::WorkOrderId,
        vo::{CommitOutcome, DropEvent, DropOutcome, DropZoneId, Point},
    },
    service::SnapshotRefreshService,
};

use super::board;
use crate::infrastructure::ServiceProvider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    /// Drag a card and drop it on a zone id as printed by `zones`.
    Drag { work_order_id: WorkOrderId, zone_id: String },
    Unassign { work_order_id: WorkOrderId },
    Info { work_order_id: WorkOrderId },
    Zones,
    Next,
    Prev,
    Goto { date: NaiveDate },
    Refresh,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  show                      redraw the board
  drag <order> <zone>       drag an order onto a zone (see `zones`)
  unassign <order>          drag an order back to the unassigned pool
  info <order>              order details
  zones                     list drop zones on screen
  next | prev               move the visible days
  goto <YYYY-MM-DD>         jump to a day
  refresh                   reload technicians and orders
  quit";

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Show);
        };
        let mut arg = |name: &str| {
            words
                .next()
                .map(str::to_owned)
                .ok_or_else(|| anyhow!("`{verb}` needs <{name}>"))
        };
        let command = match verb.to_ascii_lowercase().as_str() {
            "show" | "s" => Self::Show,
            "drag" | "d" => Self::Drag {
                work_order_id: arg("order")?.into(),
                zone_id: arg("zone")?,
            },
            "unassign" | "u" => Self::Unassign {
                work_order_id: arg("order")?.into(),
            },
            "info" | "i" => Self::Info {
                work_order_id: arg("order")?.into(),
            },
            "zones" | "z" => Self::Zones,
            "next" | "n" => Self::Next,
            "prev" | "p" => Self::Prev,
            "goto" | "g" => {
                let raw = arg("date")?;
                Self::Goto {
                    date: NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                        .map_err(|_| anyhow!("Not a date: {raw}"))?,
                }
            }
            "refresh" | "r" => Self::Refresh,
            "help" | "h" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => bail!("Unknown command `{other}`, try `help`"),
        };
        Ok(command)
    }
}

/// Console state between commands.
pub struct Console {
    anchor: NaiveDate,
}

impl Console {
    pub fn new(anchor: NaiveDate) -> Self {
        Self { anchor }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    fn shift(&mut self, sp: &ServiceProvider, forward: bool) -> anyhow::Result<()> {
        let days = Days::new(sp.board().config().day_count.into());
        self.anchor = if forward {
            self.anchor.checked_add_days(days)
        } else {
            self.anchor.checked_sub_days(days)
        }
        .ok_or_else(|| anyhow!("Date out of range"))?;
        Ok(())
    }

    async fn show(&self, sp: &ServiceProvider) -> String {
        let grid = sp.board().render(self.anchor).await;
        let pool = sp.board().unassigned_pool(self.anchor).await;
        board::render(&grid, &pool)
    }

    /// Press, travel past the activation distance, release over the zone.
    async fn drag(
        &self,
        sp: &ServiceProvider,
        work_order_id: WorkOrderId,
        zone_id: String,
    ) -> anyhow::Result<String> {
        // Zones only exist for what is on screen.
        sp.board().render(self.anchor).await;
        let controller = sp.controller();
        let origin = Point::default();
        let over = Point::new(sp.board().config().activation_distance.max(1.0), 0.0);
        controller.press(work_order_id.clone(), origin).await?;
        if !controller.move_to(over).await? {
            controller.cancel().await;
            bail!("Drag of {work_order_id} did not start");
        }
        let message = match controller.release(DropEvent::on(zone_id.as_str(), over)).await? {
            DropOutcome::NotDragging => format!("{work_order_id} was not being dragged"),
            DropOutcome::NoTarget => format!("{zone_id} is not a drop zone, nothing changed"),
            DropOutcome::Committed(CommitOutcome::Unchanged) => {
                format!("{work_order_id} is already there")
            }
            DropOutcome::Committed(CommitOutcome::Busy) => {
                format!("{work_order_id} is still being saved, try again")
            }
            DropOutcome::Committed(CommitOutcome::Committed(_) | CommitOutcome::RolledBack { .. }) => {
                self.show(sp).await
            }
        };
        Ok(message)
    }

    async fn info(
        &self,
        sp: &ServiceProvider,
        work_order_id: &WorkOrderId,
    ) -> anyhow::Result<String> {
        let work_order = sp
            .store()
            .by_id(work_order_id)
            .await
            .ok_or_else(|| anyhow!("No work order {work_order_id}"))?;
        let schedule = match (&work_order.technician_id, work_order.scheduled_date) {
            (Some(technician_id), Some(date)) => format!("{technician_id} on {date}"),
            (None, Some(date)) => format!("unassigned, wanted {date}"),
            _ => "unassigned".to_string(),
        };
        Ok(format!(
            "{} {}\n  customer: {} ({})\n  address: {}\n  {} / {:?} priority / {}\n  {}\n  {}",
            work_order.id.to_string().bold(),
            work_order.description,
            work_order.customer_name,
            work_order.customer_id,
            work_order.address,
            work_order.category,
            work_order.priority,
            work_order.status,
            schedule,
            if work_order.is_dispatchable() {
                "draggable"
            } else {
                "locked"
            }
        ))
    }

    async fn zones(&self, sp: &ServiceProvider) -> String {
        let grid = sp.board().render(self.anchor).await;
        let mut zones = vec![DropZoneId::unassigned_pool().to_string()];
        zones.extend(grid.cells().map(|cell| cell.zone_id().to_string()));
        zones.join("\n")
    }

    /// Runs one command. `None` means quit.
    pub async fn execute(
        &mut self,
        sp: &ServiceProvider,
        command: Command,
    ) -> anyhow::Result<Option<String>> {
        let output = match command {
            Command::Show => self.show(sp).await,
            Command::Drag {
                work_order_id,
                zone_id,
            } => self.drag(sp, work_order_id, zone_id).await?,
            Command::Unassign { work_order_id } => {
                let zone_id = DropZoneId::unassigned_pool().to_string();
                self.drag(sp, work_order_id, zone_id).await?
            }
            Command::Info { work_order_id } => self.info(sp, &work_order_id).await?,
            Command::Zones => self.zones(sp).await,
            Command::Next => {
                self.shift(sp, true)?;
                self.show(sp).await
            }
            Command::Prev => {
                self.shift(sp, false)?;
                self.show(sp).await
            }
            Command::Goto { date } => {
                self.anchor = date;
                self.show(sp).await
            }
            Command::Refresh => {
                let report = sp.refresh_service().refresh().await?;
                format!(
                    "{}\n{} technicians, {} work orders, {} skipped",
                    self.show(sp).await,
                    report.technicians,
                    report.work_orders,
                    report.dropped
                )
            }
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(None),
        };
        Ok(Some(output))
    }
}
