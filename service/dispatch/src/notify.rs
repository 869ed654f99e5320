use async_trait::async_trait;
use domain_dispatch::service::NotifyService;
use infrastructure_command::NotificationCommand;
use typed_builder::TypedBuilder;

/// Pushes notifications onto a channel drained by the presentation layer.
#[derive(TypedBuilder, Clone)]
pub struct ChannelNotifyServiceImpl {
    sender: flume::Sender<NotificationCommand>,
}

impl ChannelNotifyServiceImpl {
    /// Unbounded channel; the receiver side is handed to whoever shows toasts.
    pub fn channel() -> (Self, flume::Receiver<NotificationCommand>) {
        let (sender, receiver) = flume::unbounded();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl NotifyService for ChannelNotifyServiceImpl {
    async fn notify(&self, command: NotificationCommand) {
        if let Err(e) = self.sender.send_async(command).await {
            tracing::warn!("Notification dropped, nobody is listening: {:?}", e.into_inner());
        }
    }
}
