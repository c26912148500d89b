//! Redis pub/sub notification bus for multi-instance deployments.
//!
//! Each notification is published as its JSON wire form on one channel.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::notification::Notification;
use crate::ports::NotificationBus;

#[derive(Clone)]
pub struct RedisNotificationBus {
    conn: MultiplexedConnection,
    channel: String,
}

impl RedisNotificationBus {
    pub fn new(conn: MultiplexedConnection, channel: impl Into<String>) -> Self {
        Self {
            conn,
            channel: channel.into(),
        }
    }

    /// Opens a multiplexed connection to `url`.
    pub async fn connect(url: &str, channel: impl Into<String>) -> Result<Self, DomainError> {
        let client = redis::Client::open(url).map_err(redis_error)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(redis_error)?;
        Ok(Self::new(conn, channel))
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

fn redis_error(e: redis::RedisError) -> DomainError {
    DomainError::new(ErrorCode::NotificationError, format!("redis: {}", e))
}

#[async_trait]
impl NotificationBus for RedisNotificationBus {
    async fn publish(&self, notification: Notification) -> Result<(), DomainError> {
        let payload = serde_json::to_string(&notification).map_err(|e| {
            DomainError::new(
                ErrorCode::NotificationError,
                format!("Failed to serialize notification: {}", e),
            )
        })?;

        let mut conn = self.conn.clone();
        let receivers: i64 = conn
            .publish(&self.channel, payload)
            .await
            .map_err(redis_error)?;

        tracing::trace!(
            event = notification.name(),
            channel = %self.channel,
            receivers,
            "notification published to redis"
        );
        Ok(())
    }
}
