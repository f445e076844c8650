//! Error handling for Discord bot commands.

use log::error;
use poise::CreateReply;
use poise::FrameworkError;
use poise::serenity_prelude::CreateEmbed;

use crate::bot::Data;
use crate::bot::Error;
use crate::bot::error::BotError;
use crate::error::AppError;
use crate::interaction::render::colour;
use crate::service::error::ServiceError;

/// Handles framework errors and sends appropriate responses to users.
pub struct ErrorHandler;

impl ErrorHandler {
    /// Handles a framework error by classifying and responding appropriately.
    pub async fn handle(error: FrameworkError<'_, Data, Error>) {
        match error {
            FrameworkError::Command { error, ctx, .. } => {
                let (title, description) = Self::classify_error(&error, &ctx);
                let embed = CreateEmbed::new()
                    .title(title)
                    .description(description)
                    .field("Command", format!("`{}`", ctx.command().qualified_name), false)
                    .colour(colour::RED);
                Self::send_embed(&ctx, embed).await;
            }
            FrameworkError::ArgumentParse { error, ctx, .. } => {
                let embed = CreateEmbed::new()
                    .title("⚠️ Invalid Arguments")
                    .description(error.to_string())
                    .field(
                        "Usage",
                        format!("`{}help {}`", ctx.prefix(), ctx.command().qualified_name),
                        false,
                    )
                    .colour(colour::ORANGE);
                Self::send_embed(&ctx, embed).await;
            }
            error => {
                if let Err(e) = poise::builtins::on_error(error).await {
                    error!("Error while handling error: {}", e);
                }
            }
        }
    }

    /// Classifies an error and returns user-friendly title and description.
    fn classify_error(
        error: &Error,
        ctx: &poise::Context<'_, Data, Error>,
    ) -> (&'static str, String) {
        if let Some(bot_error) = error.downcast_ref::<BotError>() {
            ("❌ Action Failed", bot_error.to_string())
        } else if let Some(service_error) = error.downcast_ref::<ServiceError>() {
            ("❌ Service Error", service_error.to_string())
        } else {
            let ref_id = AppError::log_with_ref(error.as_ref());
            error!(
                "Unexpected error in command `{}`: {:?}",
                ctx.command().name,
                error
            );
            (
                "❌ Internal Error",
                format!(
                    "An unexpected error occurred. Please contact the bot developer.\nReference ID: `{}`",
                    ref_id
                ),
            )
        }
    }

    async fn send_embed(ctx: &poise::Context<'_, Data, Error>, embed: CreateEmbed) {
        if let Err(e) = ctx.send(CreateReply::default().embed(embed)).await {
            error!("Failed to send error reply: {}", e);
        }
    }
}
