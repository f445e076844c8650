//! Tagged dispatch over the interaction kinds.

use crate::interaction::Actor;
use crate::interaction::Payload;
use crate::interaction::battle_vote;
use crate::interaction::battle_vote::BattleDecision;
use crate::interaction::battle_vote::BattleVoteState;
use crate::interaction::battle_vote::Side;
use crate::interaction::confirmation;
use crate::interaction::confirmation::Answer;
use crate::interaction::confirmation::ConfirmationState;
use crate::interaction::paginator;
use crate::interaction::paginator::PageInput;
use crate::interaction::paginator::PaginatorState;
use crate::interaction::render::RenderCommand;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    BattleVote,
    Paginator,
    Confirmation,
}

impl InteractionKind {
    /// The closed set of emojis this kind reacts to.
    pub fn allowed_emojis(self) -> &'static [&'static str] {
        match self {
            Self::BattleVote => battle_vote::EMOJIS,
            Self::Paginator => paginator::EMOJIS,
            Self::Confirmation => confirmation::EMOJIS,
        }
    }

    /// Whether reactions outside the allowed set get retracted.
    ///
    /// Paginators re-render on every press, so stray reactions are left alone.
    pub fn keeps_reactions_clean(self) -> bool {
        !matches!(self, Self::Paginator)
    }
}

#[derive(Clone, Debug)]
pub enum InteractionState {
    BattleVote(BattleVoteState),
    Paginator(PaginatorState),
    Confirmation(ConfirmationState),
}

impl InteractionState {
    pub fn kind(&self) -> InteractionKind {
        match self {
            Self::BattleVote(_) => InteractionKind::BattleVote,
            Self::Paginator(_) => InteractionKind::Paginator,
            Self::Confirmation(_) => InteractionKind::Confirmation,
        }
    }
}

/// Result of feeding one authorized reaction to a kind.
#[derive(Debug)]
pub enum Transition<S> {
    /// The interaction stays pending with a new state.
    Continue { state: S, render: RenderCommand },
    /// The interaction is finished and must be removed.
    Terminal {
        render: RenderCommand,
        resolution: Resolution,
    },
}

impl<S> Transition<S> {
    pub fn map_state<T>(self, f: impl FnOnce(S) -> T) -> Transition<T> {
        match self {
            Self::Continue { state, render } => Transition::Continue {
                state: f(state),
                render,
            },
            Self::Terminal { render, resolution } => Transition::Terminal { render, resolution },
        }
    }
}

/// What a terminal transition decided, for the caller to act on.
#[derive(Clone, Debug)]
pub enum Resolution {
    BattleDecided(BattleDecision),
    Confirmed(Payload),
    Denied(Payload),
}

/// Runs the transition for `state`'s kind. `None` when `emoji` is not one of
/// the kind's inputs.
pub(crate) fn step(
    state: &InteractionState,
    actor: &Actor,
    emoji: &str,
) -> Option<Transition<InteractionState>> {
    match state {
        InteractionState::BattleVote(s) => Side::from_emoji(emoji).map(|side| {
            battle_vote::transition(s, actor, side).map_state(InteractionState::BattleVote)
        }),
        InteractionState::Paginator(s) => PageInput::from_emoji(emoji).map(|input| {
            paginator::transition(s, actor, input).map_state(InteractionState::Paginator)
        }),
        InteractionState::Confirmation(s) => Answer::from_emoji(emoji).map(|answer| {
            confirmation::transition(s, actor, answer).map_state(InteractionState::Confirmation)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_a_closed_emoji_set() {
        for kind in [
            InteractionKind::BattleVote,
            InteractionKind::Paginator,
            InteractionKind::Confirmation,
        ] {
            assert_eq!(kind.allowed_emojis().len(), 2);
        }
    }

    #[test]
    fn test_only_paginator_tolerates_stray_reactions() {
        assert!(InteractionKind::BattleVote.keeps_reactions_clean());
        assert!(InteractionKind::Confirmation.keeps_reactions_clean());
        assert!(!InteractionKind::Paginator.keeps_reactions_clean());
    }
}
