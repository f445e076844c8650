//! Discord-backed [`MessageSink`].

use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use serenity::ChannelId;
use serenity::CreateEmbed;
use serenity::CreateEmbedFooter;
use serenity::CreateMessage;
use serenity::EditMessage;
use serenity::Http;
use serenity::MessageId;
use serenity::ReactionType;
use serenity::Timestamp;
use serenity::UserId;

use crate::interaction::MessageRef;
use crate::interaction::MessageSink;
use crate::interaction::SinkError;
use crate::interaction::render::MessageContent;

pub struct SerenityMessageSink {
    http: Arc<Http>,
}

impl SerenityMessageSink {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }
}

/// Builds the embed part of `content`, if it has one.
pub fn to_embed(content: &MessageContent) -> Option<CreateEmbed> {
    if !content.has_embed() {
        return None;
    }

    let mut embed = CreateEmbed::new();
    if let Some(title) = &content.title {
        embed = embed.title(title);
    }
    if let Some(description) = &content.description {
        embed = embed.description(description);
    }
    if let Some(colour) = content.colour {
        embed = embed.colour(colour);
    }
    for field in &content.fields {
        embed = embed.field(&field.name, &field.value, field.inline);
    }
    if let Some(footer) = &content.footer {
        embed = embed.footer(CreateEmbedFooter::new(footer));
    }
    if let Some(url) = &content.thumbnail {
        embed = embed.thumbnail(url);
    }
    if let Some(url) = &content.image {
        embed = embed.image(url);
    }
    if let Some(timestamp) = content
        .timestamp
        .and_then(|ts| Timestamp::from_unix_timestamp(ts.timestamp()).ok())
    {
        embed = embed.timestamp(timestamp);
    }
    Some(embed)
}

pub fn to_create_message(content: &MessageContent) -> CreateMessage {
    let mut message = CreateMessage::new();
    if let Some(text) = &content.text {
        message = message.content(text);
    }
    if let Some(embed) = to_embed(content) {
        message = message.embed(embed);
    }
    message
}

fn to_edit_message(content: &MessageContent) -> EditMessage {
    let mut message = EditMessage::new();
    if let Some(text) = &content.text {
        message = message.content(text);
    }
    if let Some(embed) = to_embed(content) {
        message = message.embed(embed);
    }
    message
}

fn unicode(emoji: &str) -> ReactionType {
    ReactionType::Unicode(emoji.to_string())
}

/// Maps a serenity failure onto the sink error kinds.
pub fn map_error(error: serenity::Error) -> SinkError {
    if let serenity::Error::Http(http_error) = &error {
        match http_error.status_code().map(|status| status.as_u16()) {
            Some(403) => return SinkError::PermissionDenied(error.to_string()),
            Some(404) => return SinkError::NotFound(error.to_string()),
            _ => {}
        }
    }
    SinkError::Other(error.to_string())
}

#[async_trait]
impl MessageSink for SerenityMessageSink {
    async fn send(
        &self,
        channel_id: u64,
        content: &MessageContent,
    ) -> Result<MessageRef, SinkError> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.http, to_create_message(content))
            .await
            .map_err(map_error)?;
        Ok(MessageRef::new(channel_id, message.id.get()))
    }

    async fn edit(&self, message: &MessageRef, content: &MessageContent) -> Result<(), SinkError> {
        ChannelId::new(message.channel_id)
            .edit_message(
                &self.http,
                MessageId::new(message.message_id),
                to_edit_message(content),
            )
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn delete(&self, message: &MessageRef) -> Result<(), SinkError> {
        ChannelId::new(message.channel_id)
            .delete_message(&self.http, MessageId::new(message.message_id))
            .await
            .map_err(map_error)
    }

    async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), SinkError> {
        ChannelId::new(message.channel_id)
            .create_reaction(
                &self.http,
                MessageId::new(message.message_id),
                unicode(emoji),
            )
            .await
            .map_err(map_error)
    }

    async fn remove_reaction(
        &self,
        message: &MessageRef,
        emoji: &str,
        user_id: u64,
    ) -> Result<(), SinkError> {
        ChannelId::new(message.channel_id)
            .delete_reaction(
                &self.http,
                MessageId::new(message.message_id),
                Some(UserId::new(user_id)),
                unicode(emoji),
            )
            .await
            .map_err(map_error)
    }

    async fn clear_reactions(&self, message: &MessageRef) -> Result<(), SinkError> {
        ChannelId::new(message.channel_id)
            .delete_reactions(&self.http, MessageId::new(message.message_id))
            .await
            .map_err(map_error)
    }
}
