//! Discord bot implementation and command handling.

pub mod checks;
pub mod commands;
pub mod error;
pub mod error_handler;
pub mod reactions;
pub mod sink;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use anyhow::anyhow;
use log::error;
use log::info;
use poise::Framework;
use poise::FrameworkContext;
use poise::FrameworkOptions;
use poise::serenity_prelude as serenity;
use serenity::Client;
use serenity::ClientBuilder;
use serenity::FullEvent;
use serenity::GatewayIntents;
use serenity::Http;

pub type Error = Box<dyn std::error::Error + Send + Sync>;

use crate::bot::commands::Cog;
use crate::bot::commands::Cogs;
use crate::bot::error_handler::ErrorHandler;
use crate::bot::sink::SerenityMessageSink;
use crate::config::Config;
use crate::interaction::InteractionEngine;
use crate::interaction::MessageSink;
use crate::service::Services;

/// Data shared across bot commands and contexts.
pub struct Data {
    pub config: Arc<Config>,
    pub services: Arc<Services>,
    pub interactions: Arc<InteractionEngine>,
    pub sink: Arc<dyn MessageSink>,
}

/// Discord bot client and framework.
pub struct Bot {
    pub http: Arc<Http>,
    client: Option<Client>,
}

impl Bot {
    /// Creates a new bot instance with all required components.
    pub async fn new(
        config: Arc<Config>,
        services: Arc<Services>,
        interactions: Arc<InteractionEngine>,
    ) -> Result<Self> {
        info!("Initializing bot...");

        let http = Arc::new(Http::new(&config.discord_token));
        let data = Data {
            config: config.clone(),
            services,
            interactions,
            sink: Arc::new(SerenityMessageSink::new(http.clone())),
        };
        let framework = Self::create_framework(&config, data);

        let client = ClientBuilder::new(&config.discord_token, Self::intents())
            .framework(framework)
            .await?;

        Ok(Self {
            http,
            client: Some(client),
        })
    }

    /// Starts the bot client in a background task.
    pub fn start(&mut self) -> Result<()> {
        info!("Starting bot client...");
        let mut client = self
            .client
            .take()
            .ok_or_else(|| anyhow!("Bot client already started"))?;

        tokio::spawn(async move {
            info!("Connecting bot to Discord...");
            if let Err(e) = client.start().await {
                error!("Bot client stopped: {}", e);
            }
        });

        info!("Bot client start initiated.");
        Ok(())
    }

    /// Creates the Poise framework with commands and configuration.
    fn create_framework(config: &Config, data: Data) -> Framework<Data, Error> {
        let cogs = Cogs::new(config.features.clone());
        let options = FrameworkOptions::<Data, Error> {
            commands: cogs.commands(),
            on_error: |error| Box::pin(Self::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(BotEventHandler::dispatch(ctx, event, framework, data))
            },
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                edit_tracker: Some(Arc::new(poise::EditTracker::for_timespan(
                    Duration::from_secs(3600),
                ))),
                ..Default::default()
            },
            ..Default::default()
        };

        poise::Framework::builder()
            .options(options)
            .setup(move |_ctx, ready, _framework| {
                Box::pin(async move {
                    info!("Logged in as {}", ready.user.name);
                    Ok(data)
                })
            })
            .build()
    }

    fn intents() -> GatewayIntents {
        GatewayIntents::non_privileged()
            | GatewayIntents::MESSAGE_CONTENT
            | GatewayIntents::GUILD_MEMBERS
    }

    /// Handles framework errors by delegating to the error handler.
    async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
        ErrorHandler::handle(error).await;
    }
}

/// Routes gateway events to the reaction engine and the join guard.
pub struct BotEventHandler;

impl BotEventHandler {
    pub async fn dispatch(
        ctx: &serenity::Context,
        event: &FullEvent,
        _framework: FrameworkContext<'_, Data, Error>,
        data: &Data,
    ) -> Result<(), Error> {
        match event {
            FullEvent::ReactionAdd { add_reaction } => {
                reactions::on_reaction_add(ctx, add_reaction, data).await;
            }
            FullEvent::GuildMemberAddition { new_member } if data.config.features.nabg => {
                commands::nabg::on_member_join(ctx, new_member, data).await;
            }
            _ => {}
        }
        Ok(())
    }
}
