//! Team management, battles, and match history.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use log::debug;
use log::error;
use log::warn;
use poise::serenity_prelude as serenity;
use serenity::Member;
use serenity::Role;
use serenity::UserId;

use crate::bot::Data;
use crate::bot::checks::author_facts;
use crate::bot::checks::can_select_winner;
use crate::bot::commands::Cog;
use crate::bot::commands::Context;
use crate::bot::commands::Error;
use crate::bot::commands::reply;
use crate::bot::error::BotError;
use crate::bot::reactions::post_interaction;
use crate::interaction::Authorization;
use crate::interaction::InteractionState;
use crate::interaction::MessageContent;
use crate::interaction::Payload;
use crate::interaction::Resolution;
use crate::interaction::battle_vote::BattleVoteState;
use crate::interaction::confirmation::ConfirmationState;
use crate::interaction::paginator::PaginatorState;
use crate::service::team_service::BattleSetup;

pub mod views;

use views::PAGE_SIZE;

/// Effects guarded by a confirmation prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TeamAction {
    ResetMatchLog(String),
}

pub struct TeamsCog;

impl TeamsCog {
    /// Add a role that can select battle winners
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn addbattlerole(
        ctx: Context<'_>,
        #[description = "Role to allow"] role: Role,
    ) -> Result<(), Error> {
        let added = ctx
            .data()
            .services
            .teams
            .add_battle_role(role.id.get())
            .await?;
        let text = if added {
            format!("Role {} can now select battle winners.", role.name)
        } else {
            format!(
                "Role {} is already allowed to select battle winners.",
                role.name
            )
        };
        reply(ctx, MessageContent::text(text)).await
    }

    /// Remove a role's ability to select battle winners
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn removebattlerole(
        ctx: Context<'_>,
        #[description = "Role to disallow"] role: Role,
    ) -> Result<(), Error> {
        let removed = ctx
            .data()
            .services
            .teams
            .remove_battle_role(role.id.get())
            .await?;
        let text = if removed {
            format!("Role {} can no longer select battle winners.", role.name)
        } else {
            format!(
                "Role {} was not in the list of roles that can select battle winners.",
                role.name
            )
        };
        reply(ctx, MessageContent::text(text)).await
    }

    /// List roles that can select battle winners
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn listbattleroles(ctx: Context<'_>) -> Result<(), Error> {
        let guild_roles: HashMap<u64, String> = ctx
            .guild()
            .map(|guild| {
                guild
                    .roles
                    .iter()
                    .map(|(id, role)| (id.get(), role.name.clone()))
                    .collect()
            })
            .ok_or(BotError::GuildOnlyCommand)?;

        let kept = ctx
            .data()
            .services
            .teams
            .prune_battle_roles(|id| guild_roles.contains_key(&id))
            .await?;
        if kept.is_empty() {
            return reply(
                ctx,
                MessageContent::text("No roles are currently allowed to select battle winners."),
            )
            .await;
        }

        let names: Vec<String> = kept
            .iter()
            .filter_map(|id| guild_roles.get(id).cloned())
            .collect();
        reply(ctx, views::battle_roles(&names)).await
    }

    /// Team management
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR",
        subcommands(
            "Self::create",
            "Self::delete",
            "Self::setlogo",
            "Self::add",
            "Self::remove",
            "Self::list",
            "Self::info",
            "Self::resetlog"
        )
    )]
    pub async fn team(ctx: Context<'_>) -> Result<(), Error> {
        reply(
            ctx,
            MessageContent::text(format!(
                "Invalid team command. Use {}team create/delete/setlogo/add/remove/list/info/resetlog",
                ctx.prefix()
            )),
        )
        .await
    }

    /// Create a new team with an optional logo and description
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn create(
        ctx: Context<'_>,
        #[description = "Team name"] name: String,
        #[description = "Logo image URL"] logo_url: Option<String>,
        #[rest]
        #[description = "Team description"]
        description: Option<String>,
    ) -> Result<(), Error> {
        let (logo_url, description) = split_logo_and_description(logo_url, description);
        let created = ctx
            .data()
            .services
            .teams
            .create_team(&name, logo_url.as_deref(), description.as_deref())
            .await?;

        if created.logo_rejected {
            reply(
                ctx,
                MessageContent::text("Invalid logo URL. The team will be created without a logo."),
            )
            .await?;
        }
        reply(ctx, views::team_created(&name, &created.team)).await
    }

    /// Delete a team and its records
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn delete(
        ctx: Context<'_>,
        #[description = "Team name"] name: String,
    ) -> Result<(), Error> {
        ctx.data().services.teams.delete_team(&name).await?;
        reply(
            ctx,
            MessageContent::text(format!("Team '{}' has been deleted successfully!", name)),
        )
        .await
    }

    /// Set or update a team's logo
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn setlogo(
        ctx: Context<'_>,
        #[description = "Team name"] name: String,
        #[description = "Logo image URL"] logo_url: String,
    ) -> Result<(), Error> {
        ctx.data().services.teams.set_logo(&name, &logo_url).await?;
        reply(ctx, views::logo_updated(&name, &logo_url)).await
    }

    /// Add a member to a team
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn add(
        ctx: Context<'_>,
        #[description = "Team name"] name: String,
        #[description = "Member to add"] member: Member,
    ) -> Result<(), Error> {
        ctx.data()
            .services
            .teams
            .add_member(&name, member.user.id.get())
            .await?;
        reply(
            ctx,
            MessageContent::text(format!("<@{}> added to team '{}'!", member.user.id, name)),
        )
        .await
    }

    /// Remove a member from a team by user id
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn remove(
        ctx: Context<'_>,
        #[description = "Team name"] name: String,
        #[description = "User id to remove"] user_id: u64,
    ) -> Result<(), Error> {
        ctx.data()
            .services
            .teams
            .remove_member(&name, user_id)
            .await?;
        reply(
            ctx,
            MessageContent::text(format!("User {} removed from team '{}'!", user_id, name)),
        )
        .await
    }

    /// List all existing teams
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn list(ctx: Context<'_>) -> Result<(), Error> {
        let data = ctx.data();
        let teams = data.services.teams.list_teams().await;
        if teams.is_empty() {
            return reply(ctx, MessageContent::text("No teams have been created yet!")).await;
        }

        let teams = Arc::new(teams);
        let state = PaginatorState::new(teams.len(), PAGE_SIZE, {
            let teams = teams.clone();
            move |start| views::team_list_page(&teams, start)
        });
        post_pages(ctx, state).await
    }

    /// Show details about a team
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn info(
        ctx: Context<'_>,
        #[description = "Team name"] name: String,
    ) -> Result<(), Error> {
        let team = ctx.data().services.teams.get_team(&name).await?;
        let member_lines: Vec<String> = {
            let guild = ctx.guild();
            team.members
                .iter()
                .map(|id| {
                    let known = guild
                        .as_ref()
                        .is_some_and(|g| g.members.contains_key(&UserId::new(*id)));
                    if known {
                        format!("<@{}>", id)
                    } else {
                        format!("Unknown User ({})", id)
                    }
                })
                .collect()
        };
        reply(ctx, views::team_info(&name, &team, &member_lines)).await
    }

    /// Clear a team's match history after confirmation
    #[poise::command(
        prefix_command,
        guild_only,
        required_permissions = "ADMINISTRATOR"
    )]
    pub async fn resetlog(
        ctx: Context<'_>,
        #[description = "Team name"] name: String,
    ) -> Result<(), Error> {
        let data = ctx.data();
        data.services.teams.get_team(&name).await?;

        let state = ConfirmationState::new(
            Payload::new(TeamAction::ResetMatchLog(name.clone())),
            views::reset_confirmed(&name),
            views::reset_denied(&name),
        );
        post_interaction(
            data,
            ctx.channel_id().get(),
            &views::reset_prompt(&name),
            InteractionState::Confirmation(state),
            Authorization::Invoker(ctx.author().id.get()),
            Some(data.config.interaction_timeout),
        )
        .await?;
        Ok(())
    }

    /// Start a team battle; the winner is picked with 1️⃣ or 2️⃣
    #[poise::command(prefix_command, guild_only)]
    pub async fn battle(
        ctx: Context<'_>,
        #[description = "First team"] team1: String,
        #[description = "Second team"] team2: String,
        #[rest]
        #[description = "Game being played"]
        game: Option<String>,
    ) -> Result<(), Error> {
        let data = ctx.data();
        let facts = author_facts(ctx).await?;
        let roles = data.services.teams.battle_roles().await;
        if !can_select_winner(facts.is_administrator, &facts.role_ids, &roles) {
            return Err(BotError::PermissionDenied(
                "You do not have permission to create team battles.".to_string(),
            )
            .into());
        }

        let teams = &data.services.teams;
        let setup = teams
            .prepare_battle(&team1, &team2, game.as_deref(), battle_date(ctx))
            .await?;
        let first = teams.get_team(&setup.team1).await?;
        let second = teams.get_team(&setup.team2).await?;

        let state = BattleVoteState::new(
            setup.team1.clone(),
            setup.team2.clone(),
            setup.game_name.clone(),
            Payload::new(setup.clone()),
        );
        post_interaction(
            data,
            ctx.channel_id().get(),
            &views::battle_setup(&setup, &first, &second),
            InteractionState::BattleVote(state),
            Authorization::AdministratorOrGrantedRoles,
            None,
        )
        .await?;
        Ok(())
    }

    /// View a team's match history
    #[poise::command(prefix_command, guild_only)]
    pub async fn matchlog(
        ctx: Context<'_>,
        #[description = "Team name"] name: String,
    ) -> Result<(), Error> {
        let log = ctx.data().services.teams.match_log(&name).await?;
        if log.is_empty() {
            return reply(
                ctx,
                MessageContent::text(format!("No match history for {}.", name)),
            )
            .await;
        }

        let log = Arc::new(log);
        let state = PaginatorState::new(log.len(), PAGE_SIZE, move |start| {
            views::match_log_page(&name, &log, start)
        });
        post_pages(ctx, state).await
    }
}

impl Cog for TeamsCog {
    fn commands(&self) -> Vec<poise::Command<Data, Error>> {
        vec![
            Self::addbattlerole(),
            Self::removebattlerole(),
            Self::listbattleroles(),
            Self::team(),
            Self::battle(),
            Self::matchlog(),
        ]
    }
}

/// Posts the first page; only multi-page listings become interactive.
async fn post_pages(ctx: Context<'_>, state: PaginatorState) -> Result<(), Error> {
    let data = ctx.data();
    let first_page = state.render_current();
    if !state.is_multipage() {
        return reply(ctx, first_page).await;
    }

    post_interaction(
        data,
        ctx.channel_id().get(),
        &first_page,
        InteractionState::Paginator(state),
        Authorization::Invoker(ctx.author().id.get()),
        Some(data.config.interaction_timeout),
    )
    .await?;
    Ok(())
}

fn battle_date(ctx: Context<'_>) -> String {
    DateTime::<Utc>::from_timestamp(ctx.created_at().unix_timestamp(), 0)
        .unwrap_or_else(Utc::now)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}

/// Treats the optional second argument as a logo only when it looks like a
/// URL; otherwise it is the first word of the description.
pub fn split_logo_and_description(
    logo_url: Option<String>,
    description: Option<String>,
) -> (Option<String>, Option<String>) {
    match logo_url {
        Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
            (Some(url), description)
        }
        Some(word) => {
            let description = match description {
                Some(rest) => format!("{} {}", word, rest),
                None => word,
            };
            (None, Some(description))
        }
        None => (None, description),
    }
}

/// Applies the domain effect of a finished interaction.
pub async fn on_interaction_resolved(data: &Data, resolution: &Resolution) {
    let teams = &data.services.teams;
    match resolution {
        Resolution::BattleDecided(decision) => {
            let Some(setup) = decision.context.downcast_ref::<BattleSetup>() else {
                warn!("Battle decided without a battle setup attached");
                return;
            };
            if let Err(e) = teams.record_battle(setup, &decision.winner_label).await {
                error!(
                    "Failed to record battle {} vs {}: {}",
                    setup.team1, setup.team2, e
                );
            }
        }
        Resolution::Confirmed(token) => {
            if let Some(TeamAction::ResetMatchLog(name)) = token.downcast_ref::<TeamAction>()
                && let Err(e) = teams.reset_match_log(name).await
            {
                error!("Failed to reset match log of team {}: {}", name, e);
            }
        }
        Resolution::Denied(token) => {
            debug!("Confirmation denied: {:?}", token.downcast_ref::<TeamAction>());
        }
    }
}
