use super::*;

/// Tests looking a request up by the id of its support thread.
///
/// Expected: Ok with the owning request
#[tokio::test]
async fn resolves_request_through_thread() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::create_request(db).await?;
    let thread = factory::assist_request::accept_request(db, row.id, "300").await?;

    let repo = AssistRequestRepository::new(db);
    let request = repo.find_by_thread_id(&thread.thread_id).await?.unwrap();

    assert_eq!(request.id, row.id);
    assert_eq!(request.status(), RequestStatus::Active);

    Ok(())
}

/// Tests the lookup with a thread id no request owns.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_thread() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AssistRequestRepository::new(db);
    let request = repo.find_by_thread_id("999999").await?;

    assert!(request.is_none());

    Ok(())
}
