//! Reaction-driven interaction engine.
//!
//! A message registered with the [`InteractionEngine`] waits for one of a
//! closed set of reaction emojis. Incoming reactions are routed by message
//! id, checked against the interaction's [`Authorization`], and fed to the
//! transition function of the interaction's kind (battle vote, paginator or
//! confirmation).
//!
//! The engine never performs I/O. Every operation returns a
//! [`RenderCommand`] describing what should happen to the message, which the
//! caller applies through a [`MessageSink`] with [`apply_render`].

pub mod authorization;
pub mod battle_vote;
pub mod clock;
pub mod confirmation;
pub mod engine;
pub mod error;
pub mod kind;
pub mod paginator;
pub mod render;
pub mod sink;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use authorization::Authorization;
pub use authorization::AuthorizationOracle;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use engine::Completion;
pub use engine::InteractionEngine;
pub use engine::InteractionHandle;
pub use engine::PendingInteraction;
pub use engine::RoutingOutcome;
pub use error::InteractionError;
pub use kind::InteractionKind;
pub use kind::InteractionState;
pub use kind::Resolution;
pub use kind::Transition;
pub use render::MessageContent;
pub use render::RenderCommand;
pub use render::RenderStep;
pub use render::apply_render;
pub use sink::MessageSink;
pub use sink::SinkError;

/// A message on the chat platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

impl MessageRef {
    pub fn new(channel_id: u64, message_id: u64) -> Self {
        Self {
            channel_id,
            message_id,
        }
    }
}

/// The account that added a reaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: u64,
    pub name: String,
    /// Any bot account, including this one.
    pub is_bot: bool,
    /// This bot's own account.
    pub is_self: bool,
}

impl Actor {
    /// Creates a regular (non-bot) actor.
    pub fn new(user_id: u64, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
            is_bot: false,
            is_self: false,
        }
    }

    /// Marks the actor as a bot account.
    pub fn bot(mut self) -> Self {
        self.is_bot = true;
        self
    }

    /// Marks the actor as this bot's own account.
    pub fn own_account(mut self) -> Self {
        self.is_bot = true;
        self.is_self = true;
        self
    }
}

/// Caller-owned value carried through an interaction untouched.
///
/// The engine has no knowledge of what a battle or a confirmation guards;
/// callers stash their own context here and downcast it when the
/// interaction resolves.
#[derive(Clone)]
pub struct Payload(Arc<dyn Any + Send + Sync>);

impl Payload {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Payload(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_downcast() {
        let payload = Payload::new(String::from("reset"));
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("reset"));
        assert!(payload.downcast_ref::<u64>().is_none());
    }

    #[test]
    fn test_own_account_is_also_a_bot() {
        let actor = Actor::new(1, "me").own_account();
        assert!(actor.is_bot);
        assert!(actor.is_self);
    }
}
