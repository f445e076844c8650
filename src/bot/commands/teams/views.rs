//! Message bodies for the team commands.

use crate::interaction::MessageContent;
use crate::interaction::render::colour;
use crate::service::team_service::BattleSetup;
use crate::service::team_service::MatchRecord;
use crate::service::team_service::Team;

pub const PAGE_SIZE: usize = 5;

fn page_footer(start: usize, total: usize, page_size: usize) -> String {
    let pages = total.div_ceil(page_size).max(1);
    format!("Page {}/{}", start / page_size + 1, pages)
}

pub fn team_created(name: &str, team: &Team) -> MessageContent {
    let mut content = MessageContent::new()
        .title("Team Created")
        .colour(colour::GREEN)
        .field("Team Name", name, false)
        .field("Description", &team.description, false);
    if let Some(url) = &team.logo_url {
        content = content.thumbnail(url);
    }
    content
}

pub fn logo_updated(name: &str, logo_url: &str) -> MessageContent {
    MessageContent::new()
        .title("Team Logo Updated")
        .colour(colour::BLUE)
        .field("Team Name", name, false)
        .thumbnail(logo_url)
}

/// One page of the team list starting at item `start`.
pub fn team_list_page(teams: &[(String, Team)], start: usize) -> MessageContent {
    let mut content = MessageContent::new().title("Team List").colour(colour::BLUE);
    for (name, team) in teams.iter().skip(start).take(PAGE_SIZE) {
        content = content.field(
            name,
            format!(
                "Members: {}\nWins: {}\nLosses: {}",
                team.members.len(),
                team.wins,
                team.losses
            ),
            false,
        );
    }
    if teams.len() > PAGE_SIZE {
        content = content.footer(page_footer(start, teams.len(), PAGE_SIZE));
    }
    content
}

pub fn team_info(name: &str, team: &Team, member_lines: &[String]) -> MessageContent {
    let members = if member_lines.is_empty() {
        "No members".to_string()
    } else {
        member_lines.join("\n")
    };
    let mut content = MessageContent::new()
        .title(format!("Team: {}", name))
        .description(&team.description)
        .colour(colour::GREEN)
        .field("Members", members, false)
        .field("Wins", team.wins.to_string(), true)
        .field("Losses", team.losses.to_string(), true);
    if let Some(url) = &team.logo_url {
        content = content.thumbnail(url);
    }
    content
}

pub fn battle_setup(setup: &BattleSetup, team1: &Team, team2: &Team) -> MessageContent {
    let mut content = MessageContent::new()
        .title("Team Battle Setup")
        .description(format!("Game: {}", setup.game_name))
        .colour(colour::BLUE)
        .field(
            &setup.team1,
            format!("Wins: {}\nLosses: {}", team1.wins, team1.losses),
            true,
        )
        .field(
            &setup.team2,
            format!("Wins: {}\nLosses: {}", team2.wins, team2.losses),
            true,
        )
        .footer(format!(
            "React 1️⃣ if {} wins or 2️⃣ if {} wins",
            setup.team1, setup.team2
        ));
    if let Some(url) = &team1.logo_url {
        content = content.image(url);
    }
    if let Some(url) = &team2.logo_url {
        content = content.thumbnail(url);
    }
    content
}

/// One page of `team`'s match history starting at record `start`.
pub fn match_log_page(team: &str, records: &[MatchRecord], start: usize) -> MessageContent {
    let mut content = MessageContent::new()
        .title(format!("{} - Match History", team))
        .colour(colour::BLUE);
    for (offset, record) in records.iter().skip(start).take(PAGE_SIZE).enumerate() {
        content = content.field(
            format!("Match {}", start + offset + 1),
            record.summary_for(team),
            false,
        );
    }
    if records.len() > PAGE_SIZE {
        content = content.footer(page_footer(start, records.len(), PAGE_SIZE));
    }
    content
}

pub fn battle_roles(role_names: &[String]) -> MessageContent {
    MessageContent::new()
        .title("Roles Allowed to Select Battle Winners")
        .description(role_names.join("\n"))
        .colour(colour::BLUE)
}

pub fn reset_prompt(team: &str) -> MessageContent {
    MessageContent::new()
        .title("Reset Match Log")
        .description(format!(
            "Clear the entire match history of **{}**? This cannot be undone.\nReact with ✅ to confirm or ❌ to cancel.",
            team
        ))
        .colour(colour::ORANGE)
}

pub fn reset_confirmed(team: &str) -> MessageContent {
    MessageContent::new()
        .title("Match Log Reset")
        .description(format!("Match history of **{}** has been cleared.", team))
        .colour(colour::GREEN)
}

pub fn reset_denied(team: &str) -> MessageContent {
    MessageContent::new()
        .title("Reset Cancelled")
        .description(format!("Match history of **{}** was kept.", team))
        .colour(colour::RED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(count: usize) -> Vec<MatchRecord> {
        (0..count)
            .map(|i| MatchRecord {
                team1: "Red".to_string(),
                team2: "Blue".to_string(),
                winner: "Red".to_string(),
                loser: "Blue".to_string(),
                game_name: format!("Game {}", i),
                battle_date: "2024-05-01 18:00:00 UTC".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_match_log_pages_number_matches_globally() {
        let log = records(7);
        let first = match_log_page("Red", &log, 0);
        let second = match_log_page("Red", &log, 5);

        assert_eq!(first.fields.len(), 5);
        assert_eq!(second.fields.len(), 2);
        assert_eq!(second.fields[0].name, "Match 6");
        assert_eq!(second.footer.as_deref(), Some("Page 2/2"));
    }

    #[test]
    fn test_single_page_has_no_footer() {
        let page = match_log_page("Red", &records(3), 0);
        assert_eq!(page.footer, None);
    }

    #[test]
    fn test_team_info_without_members() {
        let team = Team::new("The reds", None);
        let view = team_info("Red", &team, &[]);
        assert_eq!(view.fields[0].value, "No members");
        assert_eq!(view.description.as_deref(), Some("The reds"));
    }
}
