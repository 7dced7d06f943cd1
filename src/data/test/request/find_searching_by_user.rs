use super::*;

/// Tests finding a user's open request.
///
/// Expected: Ok with the searching request
#[tokio::test]
async fn finds_open_request() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::assist_request::create_request_for_user(db, "100").await?;

    let repo = AssistRequestRepository::new(db);
    let request = repo.find_searching_by_user("100").await?.unwrap();

    assert_eq!(request.id, row.id);
    assert_eq!(request.status(), RequestStatus::Searching);

    Ok(())
}

/// Tests that accepted and closed requests do not count as open.
///
/// An accepted request has a thread row, a cancelled one has a status row;
/// neither blocks the user from opening a new request.
///
/// Expected: Ok(None) in both cases
#[tokio::test]
async fn ignores_accepted_and_closed_requests() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let accepted = factory::assist_request::create_request_for_user(db, "100").await?;
    factory::assist_request::accept_request(db, accepted.id, "300").await?;

    let cancelled = factory::assist_request::create_request_for_user(db, "101").await?;
    factory::assist_request::close_request(db, cancelled.id, Utc::now(), false).await?;

    let repo = AssistRequestRepository::new(db);
    assert!(repo.find_searching_by_user("100").await?.is_none());
    assert!(repo.find_searching_by_user("101").await?.is_none());

    Ok(())
}

/// Tests that the lookup is not scoped to a guild.
///
/// Expected: Ok with the request raised in another guild
#[tokio::test]
async fn finds_request_across_guilds() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::assist_request::AssistRequestFactory::new(db)
        .user_id("100")
        .guild_id("777")
        .build()
        .await?;

    let repo = AssistRequestRepository::new(db);
    let request = repo.find_searching_by_user("100").await?.unwrap();

    assert_eq!(request.guild_id, "777");

    Ok(())
}
