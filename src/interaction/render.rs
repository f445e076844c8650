//! Platform-neutral descriptions of message side effects.

use chrono::DateTime;
use chrono::Utc;
use log::warn;

use crate::interaction::MessageRef;
use crate::interaction::sink::MessageSink;

/// Embed colours.
pub mod colour {
    pub const BLUE: u32 = 0x3498db;
    pub const GREEN: u32 = 0x2ecc71;
    pub const RED: u32 = 0xe74c3c;
    pub const ORANGE: u32 = 0xe67e22;
    pub const GOLD: u32 = 0xf1c40f;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Body of a message: optional plain text plus an optional rich embed.
///
/// The embed is considered present when any embed field is set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessageContent {
    pub text: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub colour: Option<u32>,
    pub fields: Vec<ContentField>,
    pub footer: Option<String>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl MessageContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text message with no embed.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        self.fields.push(ContentField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn thumbnail(mut self, url: impl Into<String>) -> Self {
        self.thumbnail = Some(url.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn has_embed(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || !self.fields.is_empty()
            || self.footer.is_some()
            || self.thumbnail.is_some()
            || self.image.is_some()
    }
}

/// One side effect against the interaction's message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderStep {
    /// Post a new message in the same channel.
    Send(MessageContent),
    Edit(MessageContent),
    Delete,
    ClearReactions,
    /// Retract one user's reaction.
    RemoveReaction { emoji: String, user_id: u64 },
}

/// Ordered list of side effects decided by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderCommand {
    steps: Vec<RenderStep>,
}

impl RenderCommand {
    /// A command that does nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(step: RenderStep) -> Self {
        Self { steps: vec![step] }
    }

    pub fn then(mut self, step: RenderStep) -> Self {
        self.steps.push(step);
        self
    }

    pub fn clear_reactions() -> Self {
        Self::single(RenderStep::ClearReactions)
    }

    pub fn retract(emoji: &str, user_id: u64) -> Self {
        Self::single(RenderStep::RemoveReaction {
            emoji: emoji.to_string(),
            user_id,
        })
    }

    pub fn steps(&self) -> &[RenderStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Applies `command` to `target` through `sink`, one step at a time.
///
/// A failed step is logged and skipped; the remaining steps still run.
/// Returns the number of failed steps.
pub async fn apply_render(
    sink: &dyn MessageSink,
    target: &MessageRef,
    command: &RenderCommand,
) -> usize {
    let mut failures = 0;

    for step in command.steps() {
        let result = match step {
            RenderStep::Send(content) => sink.send(target.channel_id, content).await.map(|_| ()),
            RenderStep::Edit(content) => sink.edit(target, content).await,
            RenderStep::Delete => sink.delete(target).await,
            RenderStep::ClearReactions => sink.clear_reactions(target).await,
            RenderStep::RemoveReaction { emoji, user_id } => {
                sink.remove_reaction(target, emoji, *user_id).await
            }
        };

        if let Err(e) = result {
            failures += 1;
            warn!(
                "Render step failed on message {} in channel {}: {}",
                target.message_id, target.channel_id, e
            );
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::interaction::sink::SinkError;

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<String>>,
        deny_edits: bool,
    }

    impl RecordingSink {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send(
            &self,
            channel_id: u64,
            content: &MessageContent,
        ) -> Result<MessageRef, SinkError> {
            self.record(format!("send {} {:?}", channel_id, content.title));
            Ok(MessageRef::new(channel_id, 999))
        }

        async fn edit(&self, message: &MessageRef, _: &MessageContent) -> Result<(), SinkError> {
            if self.deny_edits {
                return Err(SinkError::PermissionDenied("edit".into()));
            }
            self.record(format!("edit {}", message.message_id));
            Ok(())
        }

        async fn delete(&self, message: &MessageRef) -> Result<(), SinkError> {
            self.record(format!("delete {}", message.message_id));
            Ok(())
        }

        async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), SinkError> {
            self.record(format!("react {} {}", message.message_id, emoji));
            Ok(())
        }

        async fn remove_reaction(
            &self,
            message: &MessageRef,
            emoji: &str,
            user_id: u64,
        ) -> Result<(), SinkError> {
            self.record(format!("unreact {} {} {}", message.message_id, emoji, user_id));
            Ok(())
        }

        async fn clear_reactions(&self, message: &MessageRef) -> Result<(), SinkError> {
            self.record(format!("clear {}", message.message_id));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_apply_render_runs_steps_in_order() {
        let sink = RecordingSink::default();
        let target = MessageRef::new(1, 2);
        let command = RenderCommand::single(RenderStep::Send(MessageContent::new().title("Hi")))
            .then(RenderStep::Edit(MessageContent::text("page")))
            .then(RenderStep::RemoveReaction {
                emoji: "➡️".into(),
                user_id: 5,
            })
            .then(RenderStep::ClearReactions);

        let failures = apply_render(&sink, &target, &command).await;

        assert_eq!(failures, 0);
        assert_eq!(
            *sink.calls.lock().unwrap(),
            vec![
                "send 1 Some(\"Hi\")".to_string(),
                "edit 2".to_string(),
                "unreact 2 ➡️ 5".to_string(),
                "clear 2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_apply_render_continues_after_failure() {
        let sink = RecordingSink {
            deny_edits: true,
            ..Default::default()
        };
        let target = MessageRef::new(1, 2);
        let command = RenderCommand::single(RenderStep::Edit(MessageContent::text("x")))
            .then(RenderStep::ClearReactions);

        let failures = apply_render(&sink, &target, &command).await;

        assert_eq!(failures, 1);
        assert_eq!(*sink.calls.lock().unwrap(), vec!["clear 2".to_string()]);
    }

    #[test]
    fn test_plain_text_has_no_embed() {
        assert!(!MessageContent::text("hello").has_embed());
        assert!(MessageContent::new().title("t").has_embed());
    }
}
