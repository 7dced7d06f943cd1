use super::*;

/// Tests listing and counting a user's custom bots.
///
/// Expected: Ok with only the user's bots
#[tokio::test]
async fn scopes_to_the_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_custom_bot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::custom_bot::CustomBotFactory::new(db)
        .user_id("100")
        .build()
        .await?;
    factory::custom_bot::CustomBotFactory::new(db)
        .user_id("100")
        .build()
        .await?;
    factory::custom_bot::CustomBotFactory::new(db)
        .user_id("200")
        .build()
        .await?;

    let repo = CustomBotRepository::new(db);
    let bots = repo.find_by_user("100").await?;
    let count = repo.count_by_user("100").await?;

    assert_eq!(bots.len(), 2);
    assert_eq!(count, 2);
    assert!(bots.iter().all(|bot| bot.user_id == "100"));

    Ok(())
}

/// Tests the bulk id lookup.
///
/// Expected: Ok with exactly the requested records
#[tokio::test]
async fn finds_by_ids() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_custom_bot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::create_custom_bot(db).await?;
    factory::create_custom_bot(db).await?;

    let repo = CustomBotRepository::new(db);
    let bots = repo.find_by_ids(&[first.id]).await?;

    assert_eq!(bots.len(), 1);
    assert_eq!(bots[0].id, first.id);

    Ok(())
}
