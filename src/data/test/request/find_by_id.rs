use super::*;

/// Tests rehydrating a request together with its thread and status rows.
///
/// Verifies that the join shape (request, thread, thread status) assembles
/// into a single domain model carrying the assistant, thread id and
/// disposition.
///
/// Expected: Ok with a solved request
#[tokio::test]
async fn assembles_thread_and_status_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::create_request(db).await?;
    let thread = factory::assist_request::accept_request(db, row.id, "300").await?;
    factory::assist_request::close_request(db, row.id, Utc::now(), false).await?;

    let repo = AssistRequestRepository::new(db);
    let request = repo.find_by_id(row.id).await?.unwrap();

    assert_eq!(request.thread_id.as_deref(), Some(thread.thread_id.as_str()));
    assert_eq!(request.assistant_id.as_deref(), Some("300"));
    assert!(request.closed_at.is_some());
    assert_eq!(request.status(), RequestStatus::Solved);

    Ok(())
}

/// Tests the lookup of a request that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = AssistRequestRepository::new(db);
    let request = repo.find_by_id(Uuid::new_v4()).await?;

    assert!(request.is_none());

    Ok(())
}
