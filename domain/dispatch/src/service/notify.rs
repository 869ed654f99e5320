use async_trait::async_trait;
use infrastructure_command::NotificationCommand;

#[async_trait]
/// Non-blocking user notifications. Delivery problems are the sender's to log.
pub trait NotifyService: Send + Sync {
    async fn notify(&self, command: NotificationCommand);
}
