//! NotificationBus port - fire-and-forget broadcast to connected clients.
//!
//! Delivery is best effort. Callers log and drop publish errors; a failed
//! notification never fails the operation that produced it.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::notification::Notification;

/// Port for announcing state changes.
///
/// Implementations must preserve emission order from a single caller.
#[async_trait]
pub trait NotificationBus: Send + Sync {
    async fn publish(&self, notification: Notification) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_bus_is_object_safe() {
        fn _accepts_dyn(_bus: &dyn NotificationBus) {}
    }
}
