use super::*;

/// Tests persisting a freshly created request.
///
/// Verifies that the repository writes the core row and that a subsequent
/// read reassembles a searching request with the same fields.
///
/// Expected: Ok with the request round-tripped
#[tokio::test]
async fn inserts_core_row() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let request = AssistRequest {
        id: Uuid::new_v4(),
        user_id: "100".to_string(),
        guild_id: "200".to_string(),
        issue: "payment failed".to_string(),
        locale: "en-US".to_string(),
        interaction_id: "1180000000000000000".to_string(),
        requested_at: Utc::now(),
        thread_id: None,
        thread_created_at: None,
        assistant_id: None,
        closed_at: None,
        requester_inactive: false,
        webhook_token: None,
    };

    let repo = AssistRequestRepository::new(db);
    repo.insert(&request).await?;

    let stored = repo.find_by_id(request.id).await?.unwrap();
    assert_eq!(stored.user_id, "100");
    assert_eq!(stored.issue, "payment failed");
    assert_eq!(stored.status(), RequestStatus::Searching);

    Ok(())
}

/// Tests that request ids are unique.
///
/// Expected: Err(DbErr) on inserting the same id twice
#[tokio::test]
async fn rejects_duplicate_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_request_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let row = factory::create_request(db).await?;
    let repo = AssistRequestRepository::new(db);
    let duplicate = repo.find_by_id(row.id).await?.unwrap();

    let result = repo.insert(&duplicate).await;
    assert!(result.is_err());

    Ok(())
}
