//! Outbound side of the chat platform.

use async_trait::async_trait;

use crate::interaction::MessageRef;
use crate::interaction::render::MessageContent;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SinkError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Platform request failed: {0}")]
    Other(String),
}

/// Performs message and reaction operations on the chat platform.
///
/// Every call may fail when the platform rejects it. Callers treat those
/// failures as non-fatal.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(
        &self,
        channel_id: u64,
        content: &MessageContent,
    ) -> Result<MessageRef, SinkError>;

    async fn edit(&self, message: &MessageRef, content: &MessageContent) -> Result<(), SinkError>;

    async fn delete(&self, message: &MessageRef) -> Result<(), SinkError>;

    async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), SinkError>;

    async fn remove_reaction(
        &self,
        message: &MessageRef,
        emoji: &str,
        user_id: u64,
    ) -> Result<(), SinkError>;

    async fn clear_reactions(&self, message: &MessageRef) -> Result<(), SinkError>;
}
