use std::io::Write;

use chrono::Local;
use colored::Colorize;
use domain_dispatch::service::SnapshotRefreshService;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::api::console::{Command, Console, HELP};
use crate::infrastructure::{
    config::build_config, notification_consumer, telemetry::initialize_telemetry, ServiceProvider,
};

pub fn run() {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(x) => x,
        Err(e) => return eprintln!("{}: {}", "Cannot start runtime".red(), e),
    };
    runtime.block_on(async_run());
}

pub async fn async_run() {
    let config = match build_config() {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build config".red(), e);
        }
    };

    let service_provider = match ServiceProvider::build(config).await {
        Ok(x) => x,
        Err(e) => {
            return eprintln!("{}: {}", "Cannot build Service Provider".red(), e);
        }
    };
    if let Err(e) = initialize_telemetry(service_provider.config().telemetry()) {
        return eprintln!("{}: {}", "Cannot build logger".red(), e);
    };

    match service_provider.refresh_service().refresh().await {
        Ok(report) => info!(
            technicians = report.technicians,
            work_orders = report.work_orders,
            "Board loaded"
        ),
        Err(e) => {
            return eprintln!("{}: {}", "Cannot load the board".red(), e);
        }
    }

    let toasts = tokio::spawn(notification_consumer(
        service_provider.notifications().clone(),
    ));
    let anchor = service_provider
        .config()
        .anchor_date()
        .unwrap_or_else(|| Local::now().date_naive());
    let mut console = Console::new(anchor);

    tokio::select! {
        result = console_loop(&service_provider, &mut console) => {
            if let Err(e) = result {
                eprintln!("{}: {}", "Console stopped".red(), e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Stopping (ctrl-c handling).");
        }
    }
    toasts.abort();
}

async fn console_loop(sp: &ServiceProvider, console: &mut Console) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    if let Some(output) = console.execute(sp, Command::Show).await? {
        println!("{output}\n{HELP}");
    }
    loop {
        print!("{} ", format!("board {}>", console.anchor()).cyan());
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            return Ok(());
        };
        let command = match line.parse::<Command>() {
            Ok(x) => x,
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                continue;
            }
        };
        match console.execute(sp, command).await {
            Ok(Some(output)) => println!("{output}"),
            Ok(None) => return Ok(()),
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
        // Let pending toasts print before the next prompt.
        tokio::task::yield_now().await;
    }
}
