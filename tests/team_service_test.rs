use guildkeeper::service::error::ServiceError;
use guildkeeper::service::nabg_service::DEFAULT_KICK_MESSAGE;
use guildkeeper::service::nabg_service::NabgService;
use guildkeeper::service::team_service::DEFAULT_DESCRIPTION;
use guildkeeper::service::team_service::DEFAULT_GAME;
use guildkeeper::service::team_service::TEAMS_FILE;
use guildkeeper::service::team_service::TeamService;

mod common;

#[tokio::test]
async fn test_team_lifecycle_persists() {
    let data_dir = common::setup_data_dir().await;
    let service = TeamService::new(&data_dir).await.unwrap();

    // 1. Create
    let created = service.create_team("Alpha", None, None).await.unwrap();
    assert_eq!(created.team.description, DEFAULT_DESCRIPTION);
    assert!(!created.logo_rejected);
    assert!(matches!(
        service.create_team("Alpha", None, None).await,
        Err(ServiceError::TeamExists { .. })
    ));

    // 2. Members
    service.add_member("Alpha", 10).await.unwrap();
    assert!(matches!(
        service.add_member("Alpha", 10).await,
        Err(ServiceError::AlreadyMember { user_id: 10 })
    ));
    assert!(matches!(
        service.remove_member("Alpha", 11).await,
        Err(ServiceError::NotMember { user_id: 11 })
    ));

    // 3. Reload from disk
    let reloaded = TeamService::new(&data_dir).await.unwrap();
    let team = reloaded.get_team("Alpha").await.unwrap();
    assert_eq!(team.members, vec![10]);

    // 4. Delete
    reloaded.delete_team("Alpha").await.unwrap();
    assert!(matches!(
        reloaded.get_team("Alpha").await,
        Err(ServiceError::TeamNotFound { .. })
    ));

    common::teardown_data_dir(data_dir).await;
}

#[tokio::test]
async fn test_malformed_teams_file_is_reset() {
    let data_dir = common::setup_data_dir().await;
    tokio::fs::write(data_dir.join(TEAMS_FILE), "[1, 2")
        .await
        .unwrap();

    let service = TeamService::new(&data_dir).await.unwrap();
    assert!(service.list_teams().await.is_empty());

    common::teardown_data_dir(data_dir).await;
}

#[tokio::test]
async fn test_battle_bookkeeping_and_reset() {
    let data_dir = common::setup_data_dir().await;
    let service = TeamService::new(&data_dir).await.unwrap();
    service.create_team("Red", None, Some("reds")).await.unwrap();
    service.create_team("Blue", None, None).await.unwrap();

    assert!(matches!(
        service.prepare_battle("Red", "Red", None, "today".to_string()).await,
        Err(ServiceError::SameTeam)
    ));
    assert!(matches!(
        service.prepare_battle("Red", "Green", None, "today".to_string()).await,
        Err(ServiceError::TeamNotFound { .. })
    ));

    let setup = service
        .prepare_battle("Red", "Blue", None, "today".to_string())
        .await
        .unwrap();
    assert_eq!(setup.game_name, DEFAULT_GAME);

    let record = service.record_battle(&setup, "Blue").await.unwrap();
    assert_eq!(record.loser, "Red");

    let red = service.get_team("Red").await.unwrap();
    let blue = service.get_team("Blue").await.unwrap();
    assert_eq!((red.wins, red.losses), (0, 1));
    assert_eq!((blue.wins, blue.losses), (1, 0));
    assert_eq!(service.match_log("Red").await.unwrap(), vec![record]);

    service.reset_match_log("Red").await.unwrap();
    assert!(service.match_log("Red").await.unwrap().is_empty());
    assert_eq!(service.match_log("Blue").await.unwrap().len(), 1);
    // Resetting the log keeps the win/loss record.
    assert_eq!(service.get_team("Red").await.unwrap().losses, 1);

    common::teardown_data_dir(data_dir).await;
}

#[tokio::test]
async fn test_battle_roles() {
    let data_dir = common::setup_data_dir().await;
    let service = TeamService::new(&data_dir).await.unwrap();

    assert!(service.add_battle_role(1).await.unwrap());
    assert!(!service.add_battle_role(1).await.unwrap());
    assert!(service.add_battle_role(2).await.unwrap());
    assert!(service.remove_battle_role(2).await.unwrap());
    assert!(!service.remove_battle_role(2).await.unwrap());
    service.add_battle_role(3).await.unwrap();

    let kept = service.prune_battle_roles(|id| id != 1).await.unwrap();
    assert_eq!(kept, vec![3]);

    let reloaded = TeamService::new(&data_dir).await.unwrap();
    assert_eq!(reloaded.battle_roles().await, vec![3]);

    common::teardown_data_dir(data_dir).await;
}

#[tokio::test]
async fn test_nabg_settings_per_guild() {
    let data_dir = common::setup_data_dir().await;
    let service = NabgService::new(&data_dir).await.unwrap();

    let defaults = service.settings(1).await;
    assert!(!defaults.enabled);
    assert_eq!(defaults.kick_message, DEFAULT_KICK_MESSAGE);

    service.set_enabled(1, true).await.unwrap();
    service.set_log_channel(1, Some(55)).await.unwrap();
    service.set_kick_message(1, "Come back tomorrow").await.unwrap();

    let reloaded = NabgService::new(&data_dir).await.unwrap();
    let settings = reloaded.settings(1).await;
    assert!(settings.enabled);
    assert_eq!(settings.log_channel, Some(55));
    assert_eq!(settings.kick_message, "Come back tomorrow");
    assert!(!reloaded.settings(2).await.enabled);

    common::teardown_data_dir(data_dir).await;
}
