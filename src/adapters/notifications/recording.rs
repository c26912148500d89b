//! Recording notification bus for tests.
//!
//! # Panics
//!
//! Methods panic if the internal lock is poisoned. Test use only.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::Notification;
use crate::ports::NotificationBus;

/// Captures every published notification in order.
#[derive(Clone, Default)]
pub struct RecordingNotificationBus {
    published: Arc<Mutex<Vec<Notification>>>,
    failing: bool,
}

impl RecordingNotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus that records and then reports a delivery failure.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<Notification> {
        self.published
            .lock()
            .expect("RecordingNotificationBus: lock poisoned")
            .clone()
    }

    /// Wire names of the published events, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.published().iter().map(Notification::name).collect()
    }

    pub fn count(&self) -> usize {
        self.published
            .lock()
            .expect("RecordingNotificationBus: lock poisoned")
            .len()
    }

    pub fn clear(&self) {
        self.published
            .lock()
            .expect("RecordingNotificationBus: lock poisoned")
            .clear();
    }
}

#[async_trait]
impl NotificationBus for RecordingNotificationBus {
    async fn publish(&self, notification: Notification) -> Result<(), DomainError> {
        self.published
            .lock()
            .expect("RecordingNotificationBus: lock poisoned")
            .push(notification);
        if self.failing {
            return Err(DomainError::new(
                ErrorCode::NotificationError,
                "simulated delivery failure",
            ));
        }
        Ok(())
    }
}
