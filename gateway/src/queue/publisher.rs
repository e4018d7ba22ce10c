//! Async RabbitMQ publisher for the triage event queue.
//!
//! This module provides a connection-pooled publisher that can be shared
//! across request handler tasks. Events are appended to a single durable
//! queue; the triage worker consumes them in FIFO order.

use std::sync::Arc;

use anyhow::{Context, Result};
use lapin::{
    options::{BasicPublishOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::types::{NormalizedEvent, TRIAGE_QUEUE};

/// Async RabbitMQ publisher with connection management.
///
/// The publisher maintains a persistent connection and channel to RabbitMQ,
/// automatically reconnecting on failure. Publish failures are not retried
/// here: the orchestrator treats them as fatal for the request in flight.
#[derive(Clone)]
pub struct Publisher {
    inner: Arc<PublisherInner>,
}

struct PublisherInner {
    url: String,
    connection: RwLock<Option<Connection>>,
    channel: RwLock<Option<Channel>>,
}

impl Publisher {
    /// Create a new publisher with the given RabbitMQ URL.
    ///
    /// No connection is established until the first publish.
    pub fn new(url: String) -> Self {
        Self {
            inner: Arc::new(PublisherInner {
                url,
                connection: RwLock::new(None),
                channel: RwLock::new(None),
            }),
        }
    }

    /// Ensure we have a valid connection and channel.
    async fn ensure_connected(&self) -> Result<Channel> {
        // Check if we have a valid channel
        {
            let channel = self.inner.channel.read().await;
            if let Some(ch) = channel.as_ref() {
                if ch.status().connected() {
                    return Ok(ch.clone());
                }
            }
        }

        // Need to reconnect
        let mut connection = self.inner.connection.write().await;
        let mut channel = self.inner.channel.write().await;

        // Double-check after acquiring write lock
        if let Some(ch) = channel.as_ref() {
            if ch.status().connected() {
                return Ok(ch.clone());
            }
        }

        info!("rabbitmq_publisher_connecting");

        let conn = Connection::connect(&self.inner.url, ConnectionProperties::default())
            .await
            .context("Failed to connect to RabbitMQ")?;

        info!("rabbitmq_publisher_connected");

        let ch = conn
            .create_channel()
            .await
            .context("Failed to create channel")?;

        // Declare the queue (idempotent operation)
        ch.queue_declare(
            TRIAGE_QUEUE,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await
        .context("Failed to declare triage queue")?;

        info!(queue = TRIAGE_QUEUE, "rabbitmq_queue_declared");

        *connection = Some(conn);
        *channel = Some(ch.clone());

        Ok(ch)
    }

    /// Publish a normalized event to the triage queue.
    ///
    /// The event is serialized as UTF-8 JSON and appended to the single
    /// well-known queue. The call returns once the broker confirms the
    /// publish; there is no further acknowledgment in this direction.
    pub async fn publish(&self, event: &NormalizedEvent) -> Result<()> {
        let channel = self.ensure_connected().await?;

        let body = serde_json::to_vec(event).context("Failed to serialize event")?;

        channel
            .basic_publish(
                "",
                TRIAGE_QUEUE,
                BasicPublishOptions::default(),
                &body,
                BasicProperties::default()
                    .with_delivery_mode(2) // Persistent
                    .with_content_type("application/json".into())
                    .with_message_id(event.delivery_id.clone().into()),
            )
            .await
            .context("Failed to publish to triage queue")?
            .await
            .context("Failed to confirm publish")?;

        info!(
            queue = TRIAGE_QUEUE,
            delivery_id = %event.delivery_id,
            event_name = %event.event_name,
            body_length = body.len(),
            "rabbitmq_event_published"
        );

        Ok(())
    }

    /// Close the connection gracefully.
    pub async fn close(&self) {
        let mut connection = self.inner.connection.write().await;
        let mut channel = self.inner.channel.write().await;

        if let Some(ch) = channel.take() {
            if let Err(e) = ch.close(200, "Normal shutdown").await {
                warn!(error = %e, "rabbitmq_channel_close_error");
            }
        }

        if let Some(conn) = connection.take() {
            if let Err(e) = conn.close(200, "Normal shutdown").await {
                warn!(error = %e, "rabbitmq_connection_close_error");
            }
        }

        info!("rabbitmq_publisher_closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publisher_creation() {
        let publisher = Publisher::new("amqp://localhost:5672".to_string());
        // Creation must not connect
        assert!(Arc::strong_count(&publisher.inner) == 1);
    }
}
