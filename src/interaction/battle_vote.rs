//! Two-option vote where the first authorized reaction decides.

use crate::interaction::Actor;
use crate::interaction::Payload;
use crate::interaction::kind::Resolution;
use crate::interaction::kind::Transition;
use crate::interaction::render::MessageContent;
use crate::interaction::render::RenderCommand;
use crate::interaction::render::RenderStep;
use crate::interaction::render::colour;

pub const OPTION_A: &str = "1️⃣";
pub const OPTION_B: &str = "2️⃣";
pub const EMOJIS: &[&str] = &[OPTION_A, OPTION_B];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn from_emoji(emoji: &str) -> Option<Self> {
        match emoji {
            OPTION_A => Some(Self::A),
            OPTION_B => Some(Self::B),
            _ => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::A => OPTION_A,
            Self::B => OPTION_B,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BattleVoteState {
    pub option_a_label: String,
    pub option_b_label: String,
    /// What is being fought over, shown in the announcement.
    pub subject: String,
    pub tally_context: Payload,
}

impl BattleVoteState {
    pub fn new(
        option_a_label: impl Into<String>,
        option_b_label: impl Into<String>,
        subject: impl Into<String>,
        tally_context: Payload,
    ) -> Self {
        Self {
            option_a_label: option_a_label.into(),
            option_b_label: option_b_label.into(),
            subject: subject.into(),
            tally_context,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BattleDecision {
    pub winner: Side,
    pub winner_label: String,
    pub loser_label: String,
    pub decided_by: u64,
    pub context: Payload,
}

/// Every vote is terminal: there is no aggregation across voters.
pub fn transition(state: &BattleVoteState, actor: &Actor, side: Side) -> Transition<BattleVoteState> {
    let (winner, loser) = match side {
        Side::A => (&state.option_a_label, &state.option_b_label),
        Side::B => (&state.option_b_label, &state.option_a_label),
    };

    let announcement = MessageContent::new()
        .title("Team Battle Result")
        .description(format!(
            "🏆 {} has defeated {} in {}!",
            winner, loser, state.subject
        ))
        .colour(colour::GOLD)
        .field("Winner", winner.as_str(), true)
        .field("Loser", loser.as_str(), true)
        .field("Game", state.subject.as_str(), false)
        .footer(format!("Battle winner selected by {}", actor.name));

    Transition::Terminal {
        render: RenderCommand::single(RenderStep::Send(announcement)),
        resolution: Resolution::BattleDecided(BattleDecision {
            winner: side,
            winner_label: winner.clone(),
            loser_label: loser.clone(),
            decided_by: actor.user_id,
            context: state.tally_context.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> BattleVoteState {
        BattleVoteState::new("TeamX", "TeamY", "Chess", Payload::new(7u32))
    }

    #[test]
    fn test_side_from_emoji() {
        assert_eq!(Side::from_emoji("1️⃣"), Some(Side::A));
        assert_eq!(Side::from_emoji("2️⃣"), Some(Side::B));
        assert_eq!(Side::from_emoji("3️⃣"), None);
    }

    #[test]
    fn test_option_b_wins() {
        let actor = Actor::new(9, "referee");
        let Transition::Terminal { render, resolution } = transition(&state(), &actor, Side::B)
        else {
            panic!("Expected terminal transition");
        };

        let Resolution::BattleDecided(decision) = resolution else {
            panic!("Expected battle decision");
        };
        assert_eq!(decision.winner, Side::B);
        assert_eq!(decision.winner_label, "TeamY");
        assert_eq!(decision.loser_label, "TeamX");
        assert_eq!(decision.decided_by, 9);
        assert_eq!(decision.context.downcast_ref::<u32>(), Some(&7));

        match render.steps() {
            [RenderStep::Send(content)] => {
                assert_eq!(
                    content.description.as_deref(),
                    Some("🏆 TeamY has defeated TeamX in Chess!")
                );
                assert_eq!(
                    content.footer.as_deref(),
                    Some("Battle winner selected by referee")
                );
            }
            other => panic!("Unexpected render: {:?}", other),
        }
    }
}
