//! Pub/sub publishing seam.
//!
//! The notifier only sees the [`Publisher`] trait; production wiring uses
//! [`SnsPublisher`], tests substitute their own implementations.

use anyhow::{Context, Result};
use async_trait::async_trait;

/// Something that can deliver a message body to a topic.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `message` to `topic`. Returns once the provider accepts or
    /// rejects the call; no further acknowledgement is awaited.
    async fn publish(&self, topic: &str, message: &str) -> Result<()>;
}

/// Amazon SNS publisher.
#[derive(Debug, Clone)]
pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
}

impl SnsPublisher {
    /// Build a publisher from the default AWS region/credential chain.
    pub async fn from_env() -> Self {
        // ---
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_sns::Client::new(&sdk_config))
    }

    pub fn new(client: aws_sdk_sns::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Publisher for SnsPublisher {
    async fn publish(&self, topic: &str, message: &str) -> Result<()> {
        // ---
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .message(message)
            .send()
            .await
            .with_context(|| format!("SNS publish to {} failed", topic))?;

        tracing::debug!("SNS accepted message id {:?}", output.message_id());
        Ok(())
    }
}
