//! New Accounts Be Gone: kicks accounts created on the day they join.

use chrono::DateTime;
use chrono::Utc;
use log::info;
use log::warn;
use poise::serenity_prelude as serenity;
use serenity::CreateMessage;
use serenity::GuildChannel;
use serenity::Member;
use serenity::Timestamp;

use crate::bot::Data;
use crate::bot::commands::Cog;
use crate::bot::commands::Context;
use crate::bot::commands::Error;
use crate::bot::commands::reply;
use crate::bot::error::BotError;
use crate::interaction::MessageContent;
use crate::interaction::render::colour;
use crate::service::nabg_service::KICK_REASON;
use crate::service::nabg_service::NabgSettings;
use crate::service::nabg_service::account_age_days;
use crate::service::nabg_service::is_account_created_today;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

pub struct NabgCog;

impl NabgCog {
    /// NABG - New Accounts Be Gone configuration
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "MANAGE_GUILD",
        subcommands(
            "Self::enable",
            "Self::disable",
            "Self::logchannel",
            "Self::message",
            "Self::test"
        )
    )]
    pub async fn nabg(ctx: Context<'_>) -> Result<(), Error> {
        let guild_id = ctx.guild_id().ok_or(BotError::GuildOnlyCommand)?;
        let settings = ctx.data().services.nabg.settings(guild_id.get()).await;
        let log_channel = settings.log_channel.filter(|id| {
            ctx.guild()
                .is_some_and(|guild| guild.channels.contains_key(&serenity::ChannelId::new(*id)))
        });
        reply(ctx, status_view(&settings, log_channel)).await
    }

    /// Enable NABG protection
    #[poise::command(prefix_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn enable(ctx: Context<'_>) -> Result<(), Error> {
        let guild_id = ctx.guild_id().ok_or(BotError::GuildOnlyCommand)?;
        ctx.data()
            .services
            .nabg
            .set_enabled(guild_id.get(), true)
            .await?;
        reply(
            ctx,
            MessageContent::new()
                .title("NABG Enabled")
                .description("✅ New account protection is now active. Users with accounts created today will be kicked.")
                .colour(colour::GREEN),
        )
        .await
    }

    /// Disable NABG protection
    #[poise::command(prefix_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn disable(ctx: Context<'_>) -> Result<(), Error> {
        let guild_id = ctx.guild_id().ok_or(BotError::GuildOnlyCommand)?;
        ctx.data()
            .services
            .nabg
            .set_enabled(guild_id.get(), false)
            .await?;
        reply(
            ctx,
            MessageContent::new()
                .title("NABG Disabled")
                .description("❌ New account protection is now inactive.")
                .colour(colour::RED),
        )
        .await
    }

    /// Set the channel for NABG logs, or clear it when omitted
    #[poise::command(prefix_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn logchannel(
        ctx: Context<'_>,
        #[description = "Channel to post kick logs in"] channel: Option<GuildChannel>,
    ) -> Result<(), Error> {
        let guild_id = ctx.guild_id().ok_or(BotError::GuildOnlyCommand)?;
        let channel_id = channel.as_ref().map(|c| c.id.get());
        ctx.data()
            .services
            .nabg
            .set_log_channel(guild_id.get(), channel_id)
            .await?;

        let text = match channel_id {
            Some(id) => format!("Log channel set to <#{}>", id),
            None => "Log channel cleared.".to_string(),
        };
        reply(ctx, MessageContent::text(text)).await
    }

    /// Set the DM message sent to kicked users
    #[poise::command(prefix_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn message(
        ctx: Context<'_>,
        #[rest]
        #[description = "Message to send before kicking"]
        message: String,
    ) -> Result<(), Error> {
        let guild_id = ctx.guild_id().ok_or(BotError::GuildOnlyCommand)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(BotError::InvalidCommandArgument {
                parameter: "message".to_string(),
                reason: "The kick message cannot be empty.".to_string(),
            }
            .into());
        }
        ctx.data()
            .services
            .nabg
            .set_kick_message(guild_id.get(), message)
            .await?;
        reply(
            ctx,
            MessageContent::text(format!("Kick message updated to: {}", message)),
        )
        .await
    }

    /// Test account age checking on a member (defaults to yourself)
    #[poise::command(prefix_command, guild_only, required_permissions = "MANAGE_GUILD")]
    pub async fn test(
        ctx: Context<'_>,
        #[description = "Member to check"] member: Option<Member>,
    ) -> Result<(), Error> {
        let member = match member {
            Some(member) => member,
            None => ctx
                .author_member()
                .await
                .ok_or(BotError::GuildOnlyCommand)?
                .into_owned(),
        };
        let created_at = to_utc(member.user.created_at());
        reply(
            ctx,
            age_test_view(member.user.id.get(), created_at, Utc::now()),
        )
        .await
    }
}

impl Cog for NabgCog {
    fn commands(&self) -> Vec<poise::Command<Data, Error>> {
        vec![Self::nabg()]
    }
}

/// Kicks `member` when their account was created today and the guild has
/// protection enabled.
pub async fn on_member_join(ctx: &serenity::Context, member: &Member, data: &Data) {
    let guild_id = member.guild_id;
    let settings = data.services.nabg.settings(guild_id.get()).await;
    if !settings.enabled {
        return;
    }

    let bot_id = ctx.cache.current_user().id;
    let can_kick = ctx.cache.guild(guild_id).and_then(|guild| {
        guild
            .members
            .get(&bot_id)
            .map(|me| guild.member_permissions(me).kick_members())
    });

    let now = Utc::now();
    let created_at = to_utc(member.user.created_at());
    let user = &member.user;
    match decide_join(can_kick, created_at, now) {
        JoinDecision::Allow => return,
        JoinDecision::CannotKick => {
            warn!(
                "Kick Members not confirmed in guild {}; leaving new account {} ({}) alone",
                guild_id, user.name, user.id
            );
            return;
        }
        JoinDecision::Kick => {}
    }

    if let Err(e) = user
        .direct_message(ctx, CreateMessage::new().content(&settings.kick_message))
        .await
    {
        info!("Could not DM user {} ({}): {}", user.name, user.id, e);
    }

    if let Err(e) = member.kick_with_reason(ctx, KICK_REASON).await {
        warn!(
            "Failed to kick user {} ({}) from guild {}: {}",
            user.name, user.id, guild_id, e
        );
        return;
    }

    if let Some(channel_id) = settings.log_channel {
        let log = kick_log_view(&user.name, user.id.get(), created_at, now);
        if let Err(e) = data.sink.send(channel_id, &log).await {
            warn!(
                "Cannot send to log channel {} in guild {}: {}",
                channel_id, guild_id, e
            );
        }
    }

    info!(
        "Kicked user {} ({}) from guild {} - account created today",
        user.name, user.id, guild_id
    );
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinDecision {
    Allow,
    Kick,
    /// New account, but the bot is not known to hold Kick Members.
    CannotKick,
}

/// `can_kick` is `None` when the bot's own member is missing from the cache.
/// Unknown permission never kicks, so the member is not warned for nothing.
pub fn decide_join(
    can_kick: Option<bool>,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> JoinDecision {
    if !is_account_created_today(created_at, now) {
        return JoinDecision::Allow;
    }
    match can_kick {
        Some(true) => JoinDecision::Kick,
        Some(false) | None => JoinDecision::CannotKick,
    }
}

fn to_utc(timestamp: Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0).unwrap_or(DateTime::UNIX_EPOCH)
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

pub fn status_view(settings: &NabgSettings, log_channel: Option<u64>) -> MessageContent {
    MessageContent::new()
        .title("NABG - New Accounts Be Gone")
        .description("Configuration for automatic new account detection")
        .colour(colour::BLUE)
        .field(
            "Status",
            if settings.enabled {
                "✅ Enabled"
            } else {
                "❌ Disabled"
            },
            true,
        )
        .field(
            "Log Channel",
            log_channel
                .map(|id| format!("<#{}>", id))
                .unwrap_or_else(|| "Not set".to_string()),
            true,
        )
        .field(
            "Function",
            "Kicks users whose accounts were created today",
            false,
        )
}

pub fn age_test_view(user_id: u64, created_at: DateTime<Utc>, now: DateTime<Utc>) -> MessageContent {
    let created_today = is_account_created_today(created_at, now);
    MessageContent::new()
        .title("Account Age Test")
        .colour(colour::ORANGE)
        .field("User", format!("<@{}>", user_id), true)
        .field(
            "Account Created",
            created_at.format(DATE_FORMAT).to_string(),
            true,
        )
        .field(
            "Account Age",
            format!("{} days", account_age_days(created_at, now)),
            true,
        )
        .field("Created Today?", yes_no(created_today), true)
        .field("Would be kicked?", yes_no(created_today), true)
}

pub fn kick_log_view(
    user_name: &str,
    user_id: u64,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> MessageContent {
    MessageContent::new()
        .title("NABG - Account Kicked")
        .description(format!(
            "**User:** {} ({})\n**Account Created:** {}\n**Reason:** Account created today",
            user_name,
            user_id,
            created_at.format(DATE_FORMAT)
        ))
        .colour(colour::ORANGE)
        .timestamp(now)
}
