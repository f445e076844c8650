//! Feeds reaction events into the interaction engine.

use std::time::Duration;

use log::debug;
use log::warn;
use poise::serenity_prelude as serenity;
use serenity::Reaction;
use serenity::ReactionType;
use serenity::UserId;

use crate::bot::Data;
use crate::bot::checks::MemberFacts;
use crate::bot::commands::Error;
use crate::bot::commands::teams;
use crate::interaction::Actor;
use crate::interaction::Authorization;
use crate::interaction::InteractionState;
use crate::interaction::MessageContent;
use crate::interaction::MessageRef;
use crate::interaction::RoutingOutcome;
use crate::interaction::apply_render;

pub async fn on_reaction_add(ctx: &serenity::Context, reaction: &Reaction, data: &Data) {
    let message_id = reaction.message_id.get();
    if !data.interactions.contains(message_id) {
        return;
    }
    let Some(user_id) = reaction.user_id else {
        return;
    };

    let Some((actor, facts)) = resolve_actor(ctx, reaction, user_id).await else {
        return;
    };
    let facts = facts.with_granted_roles(data.services.teams.battle_roles().await);
    let emoji = emoji_name(&reaction.emoji);

    let outcome = data
        .interactions
        .on_reaction_added(message_id, &actor, &emoji, &facts);
    debug!(
        "Reaction {} by {} on {}: {:?}",
        emoji, actor.user_id, message_id, outcome
    );

    if let RoutingOutcome::Completed(completion) = &outcome {
        teams::on_interaction_resolved(data, &completion.resolution).await;
    }

    let target = MessageRef::new(reaction.channel_id.get(), message_id);
    let failed = apply_render(data.sink.as_ref(), &target, outcome.render()).await;
    if failed > 0 {
        warn!(
            "{} render step(s) failed for interaction on message {}",
            failed, message_id
        );
    }
}

/// Posts `content`, registers the interaction on the new message and seeds its
/// reactions. Seeding failures are logged; the interaction stays registered.
pub async fn post_interaction(
    data: &Data,
    channel_id: u64,
    content: &MessageContent,
    state: InteractionState,
    authorization: Authorization,
    timeout: Option<Duration>,
) -> Result<MessageRef, Error> {
    let message = data.sink.send(channel_id, content).await?;
    let handle = data
        .interactions
        .register(message, state, authorization, timeout)?;

    for emoji in handle.allowed_emojis {
        if let Err(e) = data.sink.add_reaction(&handle.message, emoji).await {
            warn!(
                "Failed to seed {} on message {}: {}",
                emoji, handle.message.message_id, e
            );
        }
    }
    Ok(handle.message)
}

async fn resolve_actor(
    ctx: &serenity::Context,
    reaction: &Reaction,
    user_id: UserId,
) -> Option<(Actor, MemberFacts)> {
    if user_id == ctx.cache.current_user().id {
        let actor = Actor::new(user_id.get(), "").own_account();
        return Some((actor, MemberFacts::default()));
    }

    if let (Some(guild_id), Some(member)) = (reaction.guild_id, &reaction.member) {
        let mut actor = Actor::new(user_id.get(), member.user.name.clone());
        if member.user.bot {
            actor = actor.bot();
        }
        return Some((actor, MemberFacts::resolve(ctx, guild_id, member)));
    }

    match user_id.to_user(ctx).await {
        Ok(user) => {
            let mut actor = Actor::new(user_id.get(), user.name.clone());
            if user.bot {
                actor = actor.bot();
            }
            Some((actor, MemberFacts::new(user_id.get(), false, Vec::new())))
        }
        Err(e) => {
            warn!("Failed to resolve reacting user {}: {}", user_id, e);
            None
        }
    }
}

fn emoji_name(emoji: &ReactionType) -> String {
    match emoji {
        ReactionType::Unicode(name) => name.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unicode_emoji_name_is_verbatim() {
        assert_eq!(
            emoji_name(&ReactionType::Unicode("➡️".to_string())),
            "➡️"
        );
    }
}
