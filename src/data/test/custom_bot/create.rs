use super::*;

/// Tests creating a custom bot record.
///
/// Expected: Ok with a validated record carrying the provided fields
#[tokio::test]
async fn creates_validated_record() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_custom_bot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = CustomBotRepository::new(db);
    let bot = repo
        .create(CreateCustomBotParams {
            user_id: "100".to_string(),
            username: "helper-bot".to_string(),
            token: "token-abc".to_string(),
            tier_id: 2,
            activity_type: Some("playing".to_string()),
            activity_name: Some("support".to_string()),
        })
        .await?;

    assert_eq!(bot.user_id, "100");
    assert_eq!(bot.username, "helper-bot");
    assert!(bot.validation);
    assert_eq!(bot.tier_id, 2);

    let stored = repo.find_by_id(bot.id).await?.unwrap();
    assert_eq!(stored, bot);

    Ok(())
}
