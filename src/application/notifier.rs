//! Best-effort notification delivery.

use std::sync::Arc;

use crate::domain::notification::Notification;
use crate::ports::NotificationBus;

/// Publishes notifications, logging and swallowing delivery failures.
#[derive(Clone)]
pub struct Notifier {
    bus: Arc<dyn NotificationBus>,
}

impl Notifier {
    pub fn new(bus: Arc<dyn NotificationBus>) -> Self {
        Self { bus }
    }

    pub async fn notify(&self, notification: Notification) {
        let event = notification.name();
        let question_id = notification.question_id();
        if let Err(e) = self.bus.publish(notification).await {
            tracing::warn!(
                event,
                question_id = ?question_id,
                error = %e,
                "notification delivery failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::notifications::RecordingNotificationBus;
    use crate::domain::foundation::QuestionId;

    #[tokio::test]
    async fn delivery_failure_is_swallowed() {
        let bus = RecordingNotificationBus::failing();
        let notifier = Notifier::new(Arc::new(bus.clone()));

        notifier
            .notify(Notification::QuestionDeleted {
                question_id: QuestionId::new(),
            })
            .await;

        assert_eq!(bus.names(), vec!["question_deleted"]);
    }
}
