//! Notification bus adapters.
//!
//! - `BroadcastNotificationBus` - in-process fan-out to websocket clients
//! - `RedisNotificationBus` - Redis pub/sub for multi-instance deployments
//! - `FanoutNotificationBus` - publishes to several buses
//! - `RecordingNotificationBus` - captures events for tests

mod broadcast;
mod recording;
mod redis_pubsub;

pub use broadcast::BroadcastNotificationBus;
pub use recording::RecordingNotificationBus;
pub use redis_pubsub::RedisNotificationBus;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::notification::Notification;
use crate::ports::NotificationBus;

/// Publishes each notification to every inner bus.
///
/// All buses are attempted; the first failure is returned afterwards.
#[derive(Clone, Default)]
pub struct FanoutNotificationBus {
    buses: Vec<Arc<dyn NotificationBus>>,
}

impl FanoutNotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bus(mut self, bus: Arc<dyn NotificationBus>) -> Self {
        self.buses.push(bus);
        self
    }
}

#[async_trait]
impl NotificationBus for FanoutNotificationBus {
    async fn publish(&self, notification: Notification) -> Result<(), DomainError> {
        let mut first_error = None;
        for bus in &self.buses {
            if let Err(e) = bus.publish(notification.clone()).await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::QuestionId;

    #[tokio::test]
    async fn fanout_reaches_every_bus_even_after_failure() {
        let failing = RecordingNotificationBus::failing();
        let healthy = RecordingNotificationBus::new();
        let bus = FanoutNotificationBus::new()
            .with_bus(Arc::new(failing.clone()))
            .with_bus(Arc::new(healthy.clone()));

        let result = bus
            .publish(Notification::QuestionDeleted {
                question_id: QuestionId::new(),
            })
            .await;

        assert!(result.is_err());
        assert_eq!(failing.count(), 1);
        assert_eq!(healthy.names(), vec!["question_deleted"]);
    }
}
