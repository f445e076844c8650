//! Yes/no prompt guarding a destructive action.

use crate::interaction::Actor;
use crate::interaction::Payload;
use crate::interaction::kind::Resolution;
use crate::interaction::kind::Transition;
use crate::interaction::render::MessageContent;
use crate::interaction::render::RenderCommand;
use crate::interaction::render::RenderStep;

pub const CONFIRM: &str = "✅";
pub const DENY: &str = "❌";
pub const EMOJIS: &[&str] = &[CONFIRM, DENY];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Answer {
    Confirm,
    Deny,
}

impl Answer {
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        match emoji {
            CONFIRM => Some(Self::Confirm),
            DENY => Some(Self::Deny),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ConfirmationState {
    /// Identifies the guarded effect; handed back on either answer.
    pub on_confirm_token: Payload,
    /// Message body after confirming.
    pub confirmed: MessageContent,
    /// Message body after denying.
    pub denied: MessageContent,
}

impl ConfirmationState {
    pub fn new(on_confirm_token: Payload, confirmed: MessageContent, denied: MessageContent) -> Self {
        Self {
            on_confirm_token,
            confirmed,
            denied,
        }
    }
}

pub fn transition(
    state: &ConfirmationState,
    _actor: &Actor,
    answer: Answer,
) -> Transition<ConfirmationState> {
    let token = state.on_confirm_token.clone();
    let (content, resolution) = match answer {
        Answer::Confirm => (state.confirmed.clone(), Resolution::Confirmed(token)),
        Answer::Deny => (state.denied.clone(), Resolution::Denied(token)),
    };

    Transition::Terminal {
        render: RenderCommand::single(RenderStep::Edit(content)).then(RenderStep::ClearReactions),
        resolution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ConfirmationState {
        ConfirmationState::new(
            Payload::new("Alpha".to_string()),
            MessageContent::text("Match log cleared."),
            MessageContent::text("Reset cancelled."),
        )
    }

    #[test]
    fn test_confirm_branch() {
        let result = transition(&state(), &Actor::new(1, "admin"), Answer::Confirm);
        let Transition::Terminal { render, resolution } = result else {
            panic!("Expected terminal transition");
        };
        assert!(matches!(resolution, Resolution::Confirmed(_)));
        assert_eq!(
            render.steps(),
            &[
                RenderStep::Edit(MessageContent::text("Match log cleared.")),
                RenderStep::ClearReactions
            ]
        );
    }

    #[test]
    fn test_deny_branch_returns_token() {
        let result = transition(&state(), &Actor::new(1, "admin"), Answer::Deny);
        let Transition::Terminal { resolution, .. } = result else {
            panic!("Expected terminal transition");
        };
        match resolution {
            Resolution::Denied(token) => {
                assert_eq!(token.downcast_ref::<String>().map(String::as_str), Some("Alpha"))
            }
            other => panic!("Unexpected resolution: {:?}", other),
        }
    }
}
