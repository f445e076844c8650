use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use guildkeeper::interaction::Actor;
use guildkeeper::interaction::AuthorizationOracle;
use guildkeeper::interaction::MessageContent;
use guildkeeper::interaction::MessageRef;
use guildkeeper::interaction::MessageSink;
use guildkeeper::interaction::SinkError;
use uuid::Uuid;

/// Creates an empty temporary data directory.
pub async fn setup_data_dir() -> PathBuf {
    let path = std::env::temp_dir().join(format!("guildkeeper-test-{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&path)
        .await
        .expect("Failed to create data dir");
    path
}

pub async fn teardown_data_dir(path: PathBuf) {
    if path.exists() {
        let _ = tokio::fs::remove_dir_all(path).await;
    }
}

// MOCK SINK

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)]
pub enum SinkCall {
    Send(u64, MessageContent),
    Edit(u64, MessageContent),
    Delete(u64),
    AddReaction(u64, String),
    RemoveReaction(u64, String, u64),
    ClearReactions(u64),
}

/// Records every call; optionally fails reaction removal.
#[derive(Default)]
#[allow(dead_code)]
pub struct RecordingSink {
    pub calls: Mutex<Vec<SinkCall>>,
    pub fail_reaction_removal: bool,
    next_id: Mutex<u64>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn failing_reaction_removal() -> Self {
        Self {
            fail_reaction_removal: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: SinkCall) {
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
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        self.calls
            .lock()
            .unwrap()
            .push(SinkCall::Send(channel_id, content.clone()));
        Ok(MessageRef::new(channel_id, 1000 + *next_id))
    }

    async fn edit(&self, message: &MessageRef, content: &MessageContent) -> Result<(), SinkError> {
        self.record(SinkCall::Edit(message.message_id, content.clone()));
        Ok(())
    }

    async fn delete(&self, message: &MessageRef) -> Result<(), SinkError> {
        self.record(SinkCall::Delete(message.message_id));
        Ok(())
    }

    async fn add_reaction(&self, message: &MessageRef, emoji: &str) -> Result<(), SinkError> {
        self.record(SinkCall::AddReaction(message.message_id, emoji.to_string()));
        Ok(())
    }

    async fn remove_reaction(
        &self,
        message: &MessageRef,
        emoji: &str,
        user_id: u64,
    ) -> Result<(), SinkError> {
        if self.fail_reaction_removal {
            return Err(SinkError::PermissionDenied("Missing Manage Messages".to_string()));
        }
        self.record(SinkCall::RemoveReaction(
            message.message_id,
            emoji.to_string(),
            user_id,
        ));
        Ok(())
    }

    async fn clear_reactions(&self, message: &MessageRef) -> Result<(), SinkError> {
        self.record(SinkCall::ClearReactions(message.message_id));
        Ok(())
    }
}

// STATIC ORACLE

/// Fixed permission facts keyed by user id.
#[derive(Default)]
#[allow(dead_code)]
pub struct StaticOracle {
    pub administrators: Vec<u64>,
    pub roles: Vec<(u64, u64)>,
    pub granted_roles: Vec<u64>,
}

impl AuthorizationOracle for StaticOracle {
    fn has_role(&self, actor: &Actor, role_id: u64) -> bool {
        self.roles.contains(&(actor.user_id, role_id))
    }

    fn is_administrator(&self, actor: &Actor) -> bool {
        self.administrators.contains(&actor.user_id)
    }

    fn granted_roles(&self) -> Vec<u64> {
        self.granted_roles.clone()
    }
}
