use poise::serenity_prelude as serenity;
use serenity::Permissions;

use crate::bot::commands::Context;
use crate::bot::commands::Error;
use crate::bot::error::BotError;
use crate::interaction::Actor;
use crate::interaction::AuthorizationOracle;

/// Guild permission facts about one member, resolved before routing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemberFacts {
    pub user_id: u64,
    pub is_administrator: bool,
    pub role_ids: Vec<u64>,
    /// Roles currently allowed to decide battles.
    pub granted_roles: Vec<u64>,
}

impl MemberFacts {
    pub fn new(user_id: u64, is_administrator: bool, role_ids: Vec<u64>) -> Self {
        Self {
            user_id,
            is_administrator,
            role_ids,
            granted_roles: Vec::new(),
        }
    }

    pub fn with_granted_roles(mut self, granted_roles: Vec<u64>) -> Self {
        self.granted_roles = granted_roles;
        self
    }

    /// Reads the member's roles and administrator bit from the guild cache.
    pub fn resolve(
        ctx: &serenity::Context,
        guild_id: serenity::GuildId,
        member: &serenity::Member,
    ) -> Self {
        let is_administrator = ctx
            .cache
            .guild(guild_id)
            .map(|guild| {
                guild
                    .member_permissions(member)
                    .contains(Permissions::ADMINISTRATOR)
            })
            .unwrap_or(false);

        Self::new(
            member.user.id.get(),
            is_administrator,
            member.roles.iter().map(|role| role.get()).collect(),
        )
    }
}

impl AuthorizationOracle for MemberFacts {
    fn has_role(&self, actor: &Actor, role_id: u64) -> bool {
        actor.user_id == self.user_id && self.role_ids.contains(&role_id)
    }

    fn is_administrator(&self, actor: &Actor) -> bool {
        actor.user_id == self.user_id && self.is_administrator
    }

    fn granted_roles(&self) -> Vec<u64> {
        self.granted_roles.clone()
    }
}

/// Administrators always may; otherwise the member needs one of `allowed_roles`.
pub fn can_select_winner(is_administrator: bool, member_roles: &[u64], allowed_roles: &[u64]) -> bool {
    is_administrator || member_roles.iter().any(|role| allowed_roles.contains(role))
}

/// Resolves the invoking member's facts. Fails outside guilds.
pub async fn author_facts(ctx: Context<'_>) -> Result<MemberFacts, Error> {
    let guild_id = ctx.guild_id().ok_or(BotError::GuildOnlyCommand)?;
    let member = ctx
        .author_member()
        .await
        .ok_or(BotError::GuildOnlyCommand)?;
    Ok(MemberFacts::resolve(ctx.serenity_context(), guild_id, &member))
}
