//! In-process notification fan-out over a tokio broadcast channel.
//!
//! Every connected websocket client holds its own receiver. Slow receivers
//! lag and lose the oldest events; the publisher never blocks.

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::foundation::DomainError;
use crate::domain::notification::Notification;
use crate::ports::NotificationBus;

#[derive(Clone)]
pub struct BroadcastNotificationBus {
    sender: broadcast::Sender<Notification>,
}

impl BroadcastNotificationBus {
    pub fn new(channel_capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(channel_capacity.max(1));
        Self { sender }
    }

    /// Receiver for every notification published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl NotificationBus for BroadcastNotificationBus {
    async fn publish(&self, notification: Notification) -> Result<(), DomainError> {
        // No subscribers is not a failure.
        match self.sender.send(notification) {
            Ok(delivered) => tracing::trace!(subscribers = delivered, "notification broadcast"),
            Err(broadcast::error::SendError(n)) => {
                tracing::trace!(event = n.name(), "notification dropped, no subscribers")
            }
        }
        Ok(())
    }
}
