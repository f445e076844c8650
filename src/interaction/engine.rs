//! Registry and router for pending interactions.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use std::time::Duration;

use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use log::debug;

use crate::interaction::Actor;
use crate::interaction::MessageRef;
use crate::interaction::authorization::Authorization;
use crate::interaction::authorization::AuthorizationOracle;
use crate::interaction::clock::Clock;
use crate::interaction::clock::SystemClock;
use crate::interaction::error::InteractionError;
use crate::interaction::kind;
use crate::interaction::kind::InteractionKind;
use crate::interaction::kind::InteractionState;
use crate::interaction::kind::Resolution;
use crate::interaction::kind::Transition;
use crate::interaction::render::RenderCommand;

/// One message currently awaiting reaction input.
#[derive(Debug)]
pub struct PendingInteraction {
    pub message: MessageRef,
    pub kind: InteractionKind,
    pub allowed_emojis: &'static [&'static str],
    pub authorization: Authorization,
    pub state: InteractionState,
    pub created_at: DateTime<Utc>,
    /// `None` keeps the interaction until it completes or is cancelled.
    pub timeout: Option<Duration>,
}

impl PendingInteraction {
    /// Instant at which the interaction expires, if it ever does.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        let timeout = TimeDelta::from_std(self.timeout?).ok()?;
        self.created_at.checked_add_signed(timeout)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline().is_some_and(|deadline| deadline <= now)
    }
}

/// Returned by [`InteractionEngine::register`]; tells the caller which
/// reactions to seed on the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionHandle {
    pub message: MessageRef,
    pub kind: InteractionKind,
    pub allowed_emojis: &'static [&'static str],
}

#[derive(Clone, Debug)]
pub struct Completion {
    pub render: RenderCommand,
    pub resolution: Resolution,
}

#[derive(Clone, Debug)]
pub enum RoutingOutcome {
    /// Unrelated reaction. The render may retract a stray emoji.
    Ignored(RenderCommand),
    /// The actor lacks the capability; the render retracts their reaction.
    Unauthorized(RenderCommand),
    /// The interaction advanced and stays pending.
    Applied(RenderCommand),
    /// The interaction finished and has been removed.
    Completed(Completion),
}

impl RoutingOutcome {
    pub fn render(&self) -> &RenderCommand {
        match self {
            Self::Ignored(render) | Self::Unauthorized(render) | Self::Applied(render) => render,
            Self::Completed(completion) => &completion.render,
        }
    }
}

/// Single owner of all pending interactions.
///
/// Every operation runs in one critical section over the registry, so a
/// reaction being routed and a concurrent expiry sweep can never both act on
/// the same interaction.
pub struct InteractionEngine {
    registry: Mutex<HashMap<u64, PendingInteraction>>,
    clock: Arc<dyn Clock>,
}

impl InteractionEngine {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Current time according to the engine's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Starts routing reactions on `message` to a new interaction.
    pub fn register(
        &self,
        message: MessageRef,
        state: InteractionState,
        authorization: Authorization,
        timeout: Option<Duration>,
    ) -> Result<InteractionHandle, InteractionError> {
        let mut registry = self.registry();
        if registry.contains_key(&message.message_id) {
            return Err(InteractionError::DuplicateRegistration {
                message_id: message.message_id,
            });
        }

        let kind = state.kind();
        let handle = InteractionHandle {
            message,
            kind,
            allowed_emojis: kind.allowed_emojis(),
        };
        registry.insert(
            message.message_id,
            PendingInteraction {
                message,
                kind,
                allowed_emojis: kind.allowed_emojis(),
                authorization,
                state,
                created_at: self.clock.now(),
                timeout,
            },
        );
        debug!(
            "Registered {:?} interaction on message {} (timeout: {:?})",
            kind, message.message_id, timeout
        );

        Ok(handle)
    }

    /// Routes one reaction event.
    pub fn on_reaction_added(
        &self,
        message_id: u64,
        actor: &Actor,
        emoji: &str,
        oracle: &dyn AuthorizationOracle,
    ) -> RoutingOutcome {
        if actor.is_self {
            return RoutingOutcome::Ignored(RenderCommand::none());
        }

        let mut registry = self.registry();
        let Some(pending) = registry.get_mut(&message_id) else {
            return RoutingOutcome::Ignored(RenderCommand::none());
        };

        if !pending.allowed_emojis.iter().any(|allowed| *allowed == emoji) {
            let render = if pending.kind.keeps_reactions_clean() {
                RenderCommand::retract(emoji, actor.user_id)
            } else {
                RenderCommand::none()
            };
            return RoutingOutcome::Ignored(render);
        }

        if !pending.authorization.permits(actor, oracle) {
            debug!(
                "User {} is not authorized for interaction on message {}",
                actor.user_id, message_id
            );
            return RoutingOutcome::Unauthorized(RenderCommand::retract(emoji, actor.user_id));
        }

        let Some(transition) = kind::step(&pending.state, actor, emoji) else {
            return RoutingOutcome::Ignored(RenderCommand::none());
        };

        match transition {
            Transition::Continue { state, render } => {
                pending.state = state;
                RoutingOutcome::Applied(render)
            }
            Transition::Terminal { render, resolution } => {
                registry.remove(&message_id);
                debug!(
                    "Interaction on message {} completed by user {}",
                    message_id, actor.user_id
                );
                RoutingOutcome::Completed(Completion { render, resolution })
            }
        }
    }

    /// Removes every interaction whose deadline is at or before `now`.
    ///
    /// Each removed interaction yields a clear-reactions render. Entries are
    /// ordered by message id.
    pub fn expire_if_timed_out(&self, now: DateTime<Utc>) -> Vec<(MessageRef, RenderCommand)> {
        let mut registry = self.registry();
        let mut expired: Vec<u64> = registry
            .values()
            .filter(|pending| pending.is_expired(now))
            .map(|pending| pending.message.message_id)
            .collect();
        expired.sort_unstable();

        let removed: Vec<_> = expired
            .into_iter()
            .filter_map(|message_id| registry.remove(&message_id))
            .map(|pending| (pending.message, RenderCommand::clear_reactions()))
            .collect();

        if !removed.is_empty() {
            debug!("Expired {} pending interactions", removed.len());
        }
        removed
    }

    /// Drops the interaction on `message_id`. Returns whether one existed.
    pub fn cancel(&self, message_id: u64) -> bool {
        let existed = self.registry().remove(&message_id).is_some();
        if existed {
            debug!("Cancelled interaction on message {}", message_id);
        }
        existed
    }

    pub fn contains(&self, message_id: u64) -> bool {
        self.registry().contains_key(&message_id)
    }

    pub fn len(&self) -> usize {
        self.registry().len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    fn registry(&self) -> MutexGuard<'_, HashMap<u64, PendingInteraction>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InteractionEngine {
    fn default() -> Self {
        Self::new()
    }
}
