use colored::Colorize;
use infrastructure_command::NotificationCommand;

/// Prints toasts until every sender is gone.
pub async fn notification_consumer(receiver: flume::Receiver<NotificationCommand>) {
    while let Ok(command) = receiver.recv_async().await {
        let (title, message) = (command.title(), command.message());
        if command.is_error() {
            tracing::warn!("{title}: {message}");
            println!("{} {}: {}", "✘".red(), title.red().bold(), message);
        } else {
            tracing::info!("{title}: {message}");
            println!("{} {}: {}", "✔".green(), title.bold(), message);
        }
    }
}
