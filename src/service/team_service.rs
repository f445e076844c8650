use std::collections::BTreeMap;
use std::path::Path;

use log::info;
use serde::Deserialize;
use serde::Serialize;

use crate::service::error::ServiceError;
use crate::service::logo::LogoValidator;
use crate::service::store::JsonStore;

pub const TEAMS_FILE: &str = "teams_data.json";
pub const BATTLE_CONFIG_FILE: &str = "team_battle_config.json";
pub const DEFAULT_DESCRIPTION: &str = "No description provided";
pub const DEFAULT_GAME: &str = "Unspecified Game";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct MatchRecord {
    pub team1: String,
    pub team2: String,
    pub winner: String,
    pub loser: String,
    pub game_name: String,
    pub battle_date: String,
}

impl MatchRecord {
    /// One line describing the match from `team`'s point of view.
    pub fn summary_for(&self, team: &str) -> String {
        let opponent = if self.team1 == team {
            &self.team2
        } else {
            &self.team1
        };
        let verb = if self.winner == team {
            "defeated"
        } else {
            "lost to"
        };
        format!(
            "{} {} {} in {} on {}",
            team, verb, opponent, self.game_name, self.battle_date
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Team {
    pub description: String,
    #[serde(default)]
    pub members: Vec<u64>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub match_log: Vec<MatchRecord>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

impl Team {
    pub fn new(description: impl Into<String>, logo_url: Option<String>) -> Self {
        Self {
            description: description.into(),
            members: Vec::new(),
            wins: 0,
            losses: 0,
            match_log: Vec::new(),
            logo_url,
        }
    }
}

pub type TeamsDocument = BTreeMap<String, Team>;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct BattleConfig {
    #[serde(default)]
    pub battle_winner_roles: Vec<u64>,
}

/// A battle waiting for its winner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleSetup {
    pub team1: String,
    pub team2: String,
    pub game_name: String,
    pub battle_date: String,
}

#[derive(Debug)]
pub struct CreatedTeam {
    pub team: Team,
    /// A logo URL was supplied but failed validation and was dropped.
    pub logo_rejected: bool,
}

/// Teams, their records, and who may decide battles.
pub struct TeamService {
    teams: JsonStore<TeamsDocument>,
    config: JsonStore<BattleConfig>,
    logos: LogoValidator,
}

impl TeamService {
    pub async fn new(data_path: &Path) -> Result<Self, ServiceError> {
        Ok(Self {
            teams: JsonStore::open(data_path.join(TEAMS_FILE)).await?,
            config: JsonStore::open(data_path.join(BATTLE_CONFIG_FILE)).await?,
            logos: LogoValidator::new(),
        })
    }

    pub async fn create_team(
        &self,
        name: &str,
        logo_url: Option<&str>,
        description: Option<&str>,
    ) -> Result<CreatedTeam, ServiceError> {
        if self.teams.read(|teams| teams.contains_key(name)).await {
            return Err(ServiceError::TeamExists {
                name: name.to_string(),
            });
        }

        let logo = match logo_url {
            Some(url) if self.logos.is_valid(url).await => Some(url.to_string()),
            _ => None,
        };
        let logo_rejected = logo_url.is_some() && logo.is_none();
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION);
        let team = Team::new(description, logo);

        self.teams
            .update(|teams| {
                if teams.contains_key(name) {
                    return Err(ServiceError::TeamExists {
                        name: name.to_string(),
                    });
                }
                teams.insert(name.to_string(), team.clone());
                Ok(())
            })
            .await?;

        info!("Created team {}", name);
        Ok(CreatedTeam {
            team,
            logo_rejected,
        })
    }

    pub async fn delete_team(&self, name: &str) -> Result<(), ServiceError> {
        self.teams
            .update(|teams| {
                teams
                    .remove(name)
                    .map(|_| ())
                    .ok_or_else(|| not_found(name))
            })
            .await?;
        info!("Deleted team {}", name);
        Ok(())
    }

    pub async fn set_logo(&self, name: &str, logo_url: &str) -> Result<(), ServiceError> {
        self.get_team(name).await?;
        if !self.logos.is_valid(logo_url).await {
            return Err(ServiceError::InvalidLogo);
        }
        self.update_team(name, |team| {
            team.logo_url = Some(logo_url.to_string());
            Ok(())
        })
        .await
    }

    pub async fn add_member(&self, name: &str, user_id: u64) -> Result<(), ServiceError> {
        self.update_team(name, |team| {
            if team.members.contains(&user_id) {
                return Err(ServiceError::AlreadyMember { user_id });
            }
            team.members.push(user_id);
            Ok(())
        })
        .await
    }

    pub async fn remove_member(&self, name: &str, user_id: u64) -> Result<(), ServiceError> {
        self.update_team(name, |team| {
            let before = team.members.len();
            team.members.retain(|id| *id != user_id);
            if team.members.len() == before {
                return Err(ServiceError::NotMember { user_id });
            }
            Ok(())
        })
        .await
    }

    /// All teams ordered by name.
    pub async fn list_teams(&self) -> Vec<(String, Team)> {
        self.teams
            .read(|teams| {
                teams
                    .iter()
                    .map(|(name, team)| (name.clone(), team.clone()))
                    .collect()
            })
            .await
    }

    pub async fn get_team(&self, name: &str) -> Result<Team, ServiceError> {
        self.teams
            .read(|teams| teams.get(name).cloned())
            .await
            .ok_or_else(|| not_found(name))
    }

    pub async fn match_log(&self, name: &str) -> Result<Vec<MatchRecord>, ServiceError> {
        Ok(self.get_team(name).await?.match_log)
    }

    pub async fn reset_match_log(&self, name: &str) -> Result<(), ServiceError> {
        self.update_team(name, |team| {
            team.match_log.clear();
            Ok(())
        })
        .await?;
        info!("Cleared match log of team {}", name);
        Ok(())
    }

    /// Checks that both teams exist and differ, and captures the battle details.
    pub async fn prepare_battle(
        &self,
        team1: &str,
        team2: &str,
        game_name: Option<&str>,
        battle_date: String,
    ) -> Result<BattleSetup, ServiceError> {
        if team1 == team2 {
            return Err(ServiceError::SameTeam);
        }
        self.get_team(team1).await?;
        self.get_team(team2).await?;

        let game_name = game_name
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .unwrap_or(DEFAULT_GAME);
        Ok(BattleSetup {
            team1: team1.to_string(),
            team2: team2.to_string(),
            game_name: game_name.to_string(),
            battle_date,
        })
    }

    /// Credits `winner` with a win, the other team with a loss, and appends the
    /// match to both logs.
    pub async fn record_battle(
        &self,
        setup: &BattleSetup,
        winner: &str,
    ) -> Result<MatchRecord, ServiceError> {
        let loser = if winner == setup.team1 {
            setup.team2.clone()
        } else {
            setup.team1.clone()
        };
        let record = MatchRecord {
            team1: setup.team1.clone(),
            team2: setup.team2.clone(),
            winner: winner.to_string(),
            loser: loser.clone(),
            game_name: setup.game_name.clone(),
            battle_date: setup.battle_date.clone(),
        };

        self.teams
            .update(|teams| {
                for name in [&setup.team1, &setup.team2] {
                    if !teams.contains_key(name.as_str()) {
                        return Err(not_found(name));
                    }
                }
                for (name, team) in teams.iter_mut() {
                    if *name == record.winner {
                        team.wins += 1;
                    } else if *name == record.loser {
                        team.losses += 1;
                    } else {
                        continue;
                    }
                    team.match_log.push(record.clone());
                }
                Ok(())
            })
            .await?;

        info!(
            "Recorded battle: {} defeated {} in {}",
            record.winner, record.loser, record.game_name
        );
        Ok(record)
    }

    pub async fn battle_roles(&self) -> Vec<u64> {
        self.config
            .read(|config| config.battle_winner_roles.clone())
            .await
    }

    /// Returns false when the role was already allowed.
    pub async fn add_battle_role(&self, role_id: u64) -> Result<bool, ServiceError> {
        self.config
            .update(|config| {
                if config.battle_winner_roles.contains(&role_id) {
                    return Ok(false);
                }
                config.battle_winner_roles.push(role_id);
                Ok(true)
            })
            .await
    }

    /// Returns false when the role was not in the list.
    pub async fn remove_battle_role(&self, role_id: u64) -> Result<bool, ServiceError> {
        self.config
            .update(|config| {
                let before = config.battle_winner_roles.len();
                config.battle_winner_roles.retain(|id| *id != role_id);
                Ok(config.battle_winner_roles.len() != before)
            })
            .await
    }

    /// Drops battle roles for which `exists` is false and returns the rest.
    pub async fn prune_battle_roles(
        &self,
        exists: impl Fn(u64) -> bool,
    ) -> Result<Vec<u64>, ServiceError> {
        let roles = self.battle_roles().await;
        if roles.iter().all(|id| exists(*id)) {
            return Ok(roles);
        }
        self.config
            .update(|config| {
                config.battle_winner_roles.retain(|id| exists(*id));
                Ok(config.battle_winner_roles.clone())
            })
            .await
    }

    async fn update_team(
        &self,
        name: &str,
        f: impl FnOnce(&mut Team) -> Result<(), ServiceError>,
    ) -> Result<(), ServiceError> {
        self.teams
            .update(|teams| {
                let team = teams.get_mut(name).ok_or_else(|| not_found(name))?;
                f(team)
            })
            .await
    }
}

fn not_found(name: &str) -> ServiceError {
    ServiceError::TeamNotFound {
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(winner: &str) -> MatchRecord {
        let loser = if winner == "Red" { "Blue" } else { "Red" };
        MatchRecord {
            team1: "Red".to_string(),
            team2: "Blue".to_string(),
            winner: winner.to_string(),
            loser: loser.to_string(),
            game_name: "Chess".to_string(),
            battle_date: "2024-05-01 18:00:00 UTC".to_string(),
        }
    }

    #[test]
    fn test_summary_for_names_the_opponent() {
        assert_eq!(
            record("Red").summary_for("Red"),
            "Red defeated Blue in Chess on 2024-05-01 18:00:00 UTC"
        );
        assert_eq!(
            record("Red").summary_for("Blue"),
            "Blue lost to Red in Chess on 2024-05-01 18:00:00 UTC"
        );
        assert_eq!(
            record("Blue").summary_for("Red"),
            "Red lost to Blue in Chess on 2024-05-01 18:00:00 UTC"
        );
    }

    #[test]
    fn test_team_deserializes_with_missing_fields() {
        let team: Team = serde_json::from_str(r#"{"description": "d"}"#).unwrap();
        assert_eq!(team, Team::new("d", None));
    }
}
