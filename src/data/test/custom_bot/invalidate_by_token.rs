use super::*;

/// Tests marking a record as failed validation by its token.
///
/// Expected: Ok with validation flipped to false for the matching record only
#[tokio::test]
async fn flips_validation_for_matching_token() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_custom_bot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let rotten = factory::custom_bot::CustomBotFactory::new(db)
        .token("rotten-token")
        .build()
        .await?;
    let healthy = factory::create_custom_bot(db).await?;

    let repo = CustomBotRepository::new(db);
    repo.invalidate_by_token("rotten-token").await?;

    assert!(!repo.find_by_id(rotten.id).await?.unwrap().validation);
    assert!(repo.find_by_id(healthy.id).await?.unwrap().validation);

    Ok(())
}

/// Tests that an unknown token is a no-op.
///
/// Expected: Ok with no records touched
#[tokio::test]
async fn ignores_unknown_token() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_custom_bot_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let bot = factory::create_custom_bot(db).await?;

    let repo = CustomBotRepository::new(db);
    repo.invalidate_by_token("unknown").await?;

    assert!(repo.find_by_id(bot.id).await?.unwrap().validation);

    Ok(())
}
