use poise::Command;
use poise::CreateReply;

use crate::bot::Data;
use crate::bot::sink::to_embed;
use crate::config::Features;
use crate::interaction::MessageContent;

pub mod lfg;
pub mod nabg;
pub mod teams;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub use lfg::LfgCog;
pub use nabg::NabgCog;
pub use teams::TeamsCog;

pub trait Cog {
    fn commands(&self) -> Vec<Command<Data, Error>>;
}

/// Replies in the invoking channel with `content`.
pub async fn reply(ctx: Context<'_>, content: MessageContent) -> Result<(), Error> {
    let mut reply = CreateReply::default();
    if let Some(text) = content.text.clone() {
        reply = reply.content(text);
    }
    if let Some(embed) = to_embed(&content) {
        reply = reply.embed(embed);
    }
    ctx.send(reply).await?;
    Ok(())
}

/// Shows the command list, or help for one command.
#[poise::command(prefix_command, track_edits)]
pub async fn help(
    ctx: Context<'_>,
    #[rest]
    #[description = "Command to show help for"]
    command: Option<String>,
) -> Result<(), Error> {
    poise::builtins::help(
        ctx,
        command.as_deref(),
        poise::builtins::HelpConfiguration {
            extra_text_at_bottom: "Arguments with spaces must be wrapped in quotes.",
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}

/// Every enabled cog's commands, plus `help`.
pub struct Cogs {
    features: Features,
}

impl Cogs {
    pub fn new(features: Features) -> Self {
        Self { features }
    }
}

impl Cog for Cogs {
    fn commands(&self) -> Vec<Command<Data, Error>> {
        let mut commands = vec![help()];
        if self.features.nabg {
            commands.extend(NabgCog.commands());
        }
        if self.features.teams {
            commands.extend(TeamsCog.commands());
        }
        if self.features.lfg {
            commands.extend(LfgCog.commands());
        }
        commands
    }
}
