use poise::serenity_prelude as serenity;
use serenity::ChannelId;
use serenity::CreateInvite;
use serenity::EditChannel;

use crate::bot::Data;
use crate::bot::commands::Cog;
use crate::bot::commands::Context;
use crate::bot::commands::Error;
use crate::bot::commands::reply;
use crate::bot::error::BotError;
use crate::bot::sink::map_error;
use crate::interaction::MessageContent;
use crate::interaction::SinkError;
use crate::interaction::render::colour;

pub const MAX_PARTY_SIZE: i64 = 10;
const INVITE_MAX_AGE_SECS: u32 = 3600;

pub struct LfgCog;

impl LfgCog {
    /// Post a looking-for-group message for your current voice channel
    #[poise::command(prefix_command, guild_only)]
    pub async fn lfg(
        ctx: Context<'_>,
        #[description = "What you are looking for"] message: String,
        #[description = "Game to play"] game: String,
        #[description = "Party size (1-10)"] number_of_people: i64,
    ) -> Result<(), Error> {
        let author = ctx.author();
        let voice = ctx.guild().and_then(|guild| {
            let channel_id = guild.voice_states.get(&author.id)?.channel_id?;
            let name = guild
                .channels
                .get(&channel_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| channel_id.to_string());
            Some((channel_id, name))
        });
        let Some((channel_id, channel_name)) = voice else {
            return Err(BotError::NotInVoiceChannel(format!(
                "<@{}>, you must be connected to a voice channel to use this command.",
                author.id
            ))
            .into());
        };

        let party_size = validate_party_size(number_of_people)?;

        if let Err(e) = set_user_limit(ctx, channel_id, party_size).await {
            let text = match e {
                SinkError::PermissionDenied(_) => {
                    "I do not have permission to edit this voice channel.".to_string()
                }
                other => format!(
                    "Something went wrong while editing the voice channel: {}",
                    other
                ),
            };
            return reply(ctx, MessageContent::text(text)).await;
        }

        let invite = match channel_id
            .create_invite(
                ctx,
                CreateInvite::new()
                    .max_age(INVITE_MAX_AGE_SECS)
                    .max_uses(0)
                    .unique(true)
                    .audit_log_reason("LFG Command"),
            )
            .await
        {
            Ok(invite) => invite,
            Err(e) => {
                return reply(
                    ctx,
                    MessageContent::text(format!("Failed to create an invite link: {}", e)),
                )
                .await;
            }
        };

        reply(
            ctx,
            lfg_view(
                &game,
                &message,
                &channel_name,
                party_size,
                &invite.url(),
                author.display_name(),
            ),
        )
        .await
    }
}

impl Cog for LfgCog {
    fn commands(&self) -> Vec<poise::Command<Data, Error>> {
        vec![Self::lfg()]
    }
}

async fn set_user_limit(
    ctx: Context<'_>,
    channel_id: ChannelId,
    party_size: u32,
) -> Result<(), SinkError> {
    channel_id
        .edit(ctx, EditChannel::new().user_limit(party_size))
        .await
        .map(|_| ())
        .map_err(map_error)
}

pub fn validate_party_size(number_of_people: i64) -> Result<u32, BotError> {
    if (1..=MAX_PARTY_SIZE).contains(&number_of_people) {
        Ok(number_of_people as u32)
    } else {
        Err(BotError::InvalidCommandArgument {
            parameter: "number_of_people".to_string(),
            reason: format!("please enter a number of people between 1 and {}.", MAX_PARTY_SIZE),
        })
    }
}

pub fn lfg_view(
    game: &str,
    message: &str,
    channel_name: &str,
    party_size: u32,
    invite_url: &str,
    creator: &str,
) -> MessageContent {
    MessageContent::new()
        .title(format!("Looking For Group - {}", game))
        .description(message)
        .colour(colour::BLUE)
        .field("Voice Channel", channel_name, true)
        .field("Players Needed", party_size.to_string(), true)
        .field("Join Here", invite_url, false)
        .footer(format!("Created by {}", creator))
}
