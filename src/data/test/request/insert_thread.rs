use super::*;

/// Tests recording an acceptance.
///
/// Expected: Ok with the thread row visible through the request
#[tokio::test]
async fn records_acceptance_once() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::create_request(db).await?;

    let repo = AssistRequestRepository::new(db);
    repo.insert_thread(row.id, "555", "300", Utc::now()).await?;

    let request = repo.find_by_id(row.id).await?.unwrap();
    assert_eq!(request.thread_id.as_deref(), Some("555"));
    assert_eq!(request.status(), RequestStatus::Active);

    Ok(())
}

/// Tests that a second acceptance is rejected at the storage layer.
///
/// The thread row is keyed by the request id, so the primary key stops a
/// double write even if the in-memory guard were bypassed.
///
/// Expected: Err(DbErr) on the second insert
#[tokio::test]
async fn rejects_second_acceptance() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::create_request(db).await?;

    let repo = AssistRequestRepository::new(db);
    repo.insert_thread(row.id, "555", "300", Utc::now()).await?;
    let second = repo.insert_thread(row.id, "556", "301", Utc::now()).await;

    assert!(second.is_err());

    Ok(())
}
