//! Supervisor tests for custom bots: token validation pipeline, process
//! starts, and the daily reconciliation against the process manager.

use std::sync::Arc;

use uuid::Uuid;

use helpdesk::{
    data::custom_bot::CustomBotRepository,
    error::{custom_bot::CustomBotError, AppError},
    model::custom_bot::{CustomBotStatus, Tier},
    service::custom_bot::CustomBotsManager,
};
use test_utils::{
    builder::TestBuilder,
    context::TestContext,
    factory,
    fake::{FakeBotApi, FakeProcessManager},
};

const SUBSCRIBER: &str = "100000";

/// Builds a test database and a manager wired to recording fakes.
async fn harness() -> (
    TestContext,
    Arc<CustomBotsManager>,
    Arc<FakeBotApi>,
    Arc<FakeProcessManager>,
) {
    let test = TestBuilder::new()
        .with_custom_bot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.clone().unwrap();

    let api = Arc::new(FakeBotApi::new(SUBSCRIBER));
    let process_manager = Arc::new(FakeProcessManager::new());
    let manager = Arc::new(CustomBotsManager::new(
        db,
        api.clone(),
        process_manager.clone(),
        "run-custom-bot.sh".to_string(),
    ));

    (test, manager, api, process_manager)
}

fn assert_custom_bot_error(
    result: Result<impl std::fmt::Debug, AppError>,
    expected: CustomBotError,
) {
    match result {
        Err(AppError::CustomBotErr(err)) => assert_eq!(err, expected),
        other => panic!("expected {:?}, got {:?}", expected, other),
    }
}

#[tokio::test]
async fn create_registers_validated_bot() {
    let (test, manager, _api, _pm) = harness().await;

    let bot = manager.create(SUBSCRIBER, "token-abc", 1).await.unwrap();

    assert_eq!(bot.username, "test-bot");
    assert!(bot.validation);

    let db = test.db.as_ref().unwrap();
    let stored = CustomBotRepository::new(db)
        .find_by_id(bot.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.token, "token-abc");
}

#[tokio::test]
async fn verified_bot_fails_before_any_guild_query() {
    let (_test, manager, api, _pm) = harness().await;
    api.set_verified();

    assert_custom_bot_error(
        manager.create(SUBSCRIBER, "token-abc", 1).await,
        CustomBotError::VerifiedBot,
    );

    // The pipeline stopped at the bot stage: no application or guild lookup.
    assert_eq!(api.calls(), vec!["current_user"]);
}

#[tokio::test]
async fn rejected_token_invalidates_existing_record() {
    let (test, manager, api, _pm) = harness().await;
    let db = test.db.as_ref().unwrap();

    let existing = factory::custom_bot::CustomBotFactory::new(db)
        .user_id(SUBSCRIBER)
        .token("rotten-token")
        .tier_id(3)
        .build()
        .await
        .unwrap();

    api.set_unauthorized();

    assert_custom_bot_error(
        manager.create(SUBSCRIBER, "rotten-token", 3).await,
        CustomBotError::TokenInvalid,
    );

    let stored = CustomBotRepository::new(db)
        .find_by_id(existing.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.validation);
}

#[tokio::test]
async fn foreign_application_is_rejected() {
    let (_test, manager, api, _pm) = harness().await;
    api.set_owner("someone-else");

    assert_custom_bot_error(
        manager.create(SUBSCRIBER, "token-abc", 1).await,
        CustomBotError::NotApplicationOwner,
    );
}

#[tokio::test]
async fn private_application_is_rejected() {
    let (_test, manager, api, _pm) = harness().await;
    api.set_public(false);

    assert_custom_bot_error(
        manager.create(SUBSCRIBER, "token-abc", 1).await,
        CustomBotError::ApplicationNotPublic,
    );
}

#[tokio::test]
async fn missing_intent_is_rejected() {
    let (_test, manager, api, _pm) = harness().await;
    api.clear_intent();

    assert_custom_bot_error(
        manager.create(SUBSCRIBER, "token-abc", 1).await,
        CustomBotError::MissingIntent,
    );
}

#[tokio::test]
async fn guild_count_above_tier_cap_is_rejected() {
    let (_test, manager, api, _pm) = harness().await;
    api.set_guild_count(2);

    assert_custom_bot_error(
        manager.create(SUBSCRIBER, "token-abc", 1).await,
        CustomBotError::GuildLimitExceeded { count: 2, cap: 1 },
    );
}

#[tokio::test]
async fn tier_quantity_cap_limits_registrations() {
    let (test, manager, _api, _pm) = harness().await;
    let db = test.db.as_ref().unwrap();

    factory::custom_bot::CustomBotFactory::new(db)
        .user_id(SUBSCRIBER)
        .build()
        .await
        .unwrap();

    assert_custom_bot_error(
        manager.create(SUBSCRIBER, "token-abc", 1).await,
        CustomBotError::QuotaExceeded,
    );
}

#[tokio::test]
async fn start_spawns_child_process() {
    let (_test, manager, _api, pm) = harness().await;

    let bot = manager.create(SUBSCRIBER, "token-abc", 1).await.unwrap();
    manager.start(&bot).await.unwrap();

    assert_eq!(manager.status(&bot).await, CustomBotStatus::Provisioning);

    let spawned = pm.spawned();
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].name, bot.id.to_string());
    assert_eq!(spawned[0].script, "run-custom-bot.sh");
    assert!(spawned[0].args.contains(&"token-abc".to_string()));
}

#[tokio::test]
async fn start_requires_offline_status() {
    let (_test, manager, _api, _pm) = harness().await;

    let bot = manager.create(SUBSCRIBER, "token-abc", 1).await.unwrap();
    manager.start(&bot).await.unwrap();

    assert_custom_bot_error(manager.start(&bot).await, CustomBotError::NotOffline);
}

#[tokio::test]
async fn start_rejects_invalidated_records() {
    let (test, manager, _api, _pm) = harness().await;
    let db = test.db.as_ref().unwrap();

    let row = factory::custom_bot::CustomBotFactory::new(db)
        .user_id(SUBSCRIBER)
        .validation(false)
        .build()
        .await
        .unwrap();
    let bot = CustomBotRepository::new(db)
        .find_by_id(row.id)
        .await
        .unwrap()
        .unwrap();

    assert_custom_bot_error(manager.start(&bot).await, CustomBotError::TokenInvalid);
}

#[tokio::test]
async fn failed_revalidation_rolls_back_the_start() {
    let (_test, manager, api, pm) = harness().await;

    let bot = manager.create(SUBSCRIBER, "token-abc", 1).await.unwrap();
    api.set_unauthorized();

    assert_custom_bot_error(manager.start(&bot).await, CustomBotError::TokenInvalid);

    // The provisioning mark was rolled back and nothing was spawned.
    assert_eq!(manager.status(&bot).await, CustomBotStatus::Offline);
    assert!(pm.spawned().is_empty());
}

#[tokio::test]
async fn failed_spawn_rolls_back_the_start() {
    let (_test, manager, _api, pm) = harness().await;

    let bot = manager.create(SUBSCRIBER, "token-abc", 1).await.unwrap();
    pm.fail_spawns();

    assert!(manager.start(&bot).await.is_err());
    assert_eq!(manager.status(&bot).await, CustomBotStatus::Offline);
}

#[tokio::test]
async fn fetch_truncates_to_tier_quantity_cap() {
    let (test, manager, _api, _pm) = harness().await;
    let db = test.db.as_ref().unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        let row = factory::create_custom_bot(db).await.unwrap();
        ids.push(row.id);
    }

    let list = manager.fetch(&ids, Tier::from_id(1)).await.unwrap();
    assert_eq!(list.items.len(), 1);
    assert_eq!(list.remaining, 0);

    let roomy = manager.fetch(&ids[..1], Tier::from_id(3)).await.unwrap();
    assert_eq!(roomy.items.len(), 1);
    assert_eq!(roomy.remaining, 2);
}

#[tokio::test]
async fn reconciliation_confirms_active_processes() {
    let (_test, manager, _api, pm) = harness().await;

    let bot = manager.create(SUBSCRIBER, "token-abc", 1).await.unwrap();
    pm.register_process(&bot.id.to_string());

    manager.validate_running_processes().await.unwrap();

    assert_eq!(manager.status(&bot).await, CustomBotStatus::Running);
}

#[tokio::test]
async fn reconciliation_deletes_processes_without_subscription() {
    let (_test, manager, _api, pm) = harness().await;

    let orphan = Uuid::new_v4().to_string();
    pm.register_process(&orphan);

    manager.validate_running_processes().await.unwrap();

    assert!(pm.killed().contains(&orphan));
    assert!(!pm.running().contains(&orphan));
}

#[tokio::test]
async fn reconciliation_drops_stale_in_memory_entries() {
    let (_test, manager, _api, pm) = harness().await;

    let bot = manager.create(SUBSCRIBER, "token-abc", 1).await.unwrap();
    pm.register_process(&bot.id.to_string());
    manager.validate_running_processes().await.unwrap();
    assert_eq!(manager.status(&bot).await, CustomBotStatus::Running);

    // The process dies outside the manager's control.
    pm.drop_process(&bot.id.to_string());
    manager.validate_running_processes().await.unwrap();

    assert!(pm.killed().contains(&bot.id.to_string()));
    assert_eq!(manager.status(&bot).await, CustomBotStatus::Offline);
}

#[tokio::test]
async fn reconciliation_ignores_foreign_process_names() {
    let (_test, manager, _api, pm) = harness().await;

    pm.register_process("logrotate");

    manager.validate_running_processes().await.unwrap();

    assert!(pm.killed().is_empty());
    assert!(pm.running().contains(&"logrotate".to_string()));
}

#[tokio::test]
async fn disconnected_process_manager_fails_fast() {
    let (_test, manager, _api, pm) = harness().await;
    pm.disconnect();

    let result = manager.validate_running_processes().await;
    assert!(matches!(
        result,
        Err(AppError::ProcessErr(
            helpdesk::process::ProcessError::NotConnected
        ))
    ));
}
