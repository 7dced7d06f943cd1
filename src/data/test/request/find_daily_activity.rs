use super::*;

/// Tests that requests created since the bound are returned.
///
/// Expected: Ok with only today's creations
#[tokio::test]
async fn returns_requests_created_since() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let day_start = Utc::now() - Duration::hours(2);

    factory::assist_request::AssistRequestFactory::new(db)
        .user_id("100")
        .requested_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;
    factory::assist_request::AssistRequestFactory::new(db)
        .user_id("100")
        .requested_at(Utc::now() - Duration::days(2))
        .build()
        .await?;

    let repo = AssistRequestRepository::new(db);
    let activity = repo.find_daily_activity("100", day_start).await?;

    assert_eq!(activity.len(), 1);

    Ok(())
}

/// Tests that an old request closed since the bound is included.
///
/// The quota on terminal dispositions counts closures of the day, even when
/// the request itself was opened earlier.
///
/// Expected: Ok including the freshly closed request
#[tokio::test]
async fn includes_old_requests_closed_since() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let day_start = Utc::now() - Duration::hours(2);

    let old = factory::assist_request::AssistRequestFactory::new(db)
        .user_id("100")
        .requested_at(Utc::now() - Duration::days(3))
        .build()
        .await?;
    factory::assist_request::accept_request(db, old.id, "300").await?;
    factory::assist_request::close_request(db, old.id, Utc::now(), true).await?;

    let repo = AssistRequestRepository::new(db);
    let activity = repo.find_daily_activity("100", day_start).await?;

    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].status(), RequestStatus::Inactive);

    Ok(())
}

/// Tests that other users' activity is not returned.
///
/// Expected: Ok with an empty list
#[tokio::test]
async fn scopes_to_the_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::assist_request::create_request_for_user(db, "200").await?;

    let repo = AssistRequestRepository::new(db);
    let activity = repo
        .find_daily_activity("100", Utc::now() - Duration::hours(2))
        .await?;

    assert!(activity.is_empty());

    Ok(())
}
