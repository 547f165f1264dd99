mod common;

use common::{account_request, Fixture, RecordingNotifier, ADMIN_TOKEN, INSTRUCTOR_TOKEN};
use intake_core::models::{AccountRequestData, AccountRequestStatus, AccountRequestsData, MessageOutput};
use intake_core::server::api::create_api_routes;
use serde_json::json;
use std::sync::Arc;

const MAX_BODY_SIZE: u64 = 16 * 1024;

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

fn message(body: &[u8]) -> String {
    serde_json::from_slice::<MessageOutput>(body).unwrap().message
}

#[tokio::test]
async fn test_put_updates_and_approves() {
    let record = account_request("Pending Instructor", "pending@uni.edu", AccountRequestStatus::Pending);
    let notifier = Arc::new(RecordingNotifier::default());
    let fixture = Fixture::new(notifier.clone(), vec![record.clone()]);
    let api = create_api_routes(Arc::clone(&fixture.actions), MAX_BODY_SIZE);

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/webapi/account/request?id={}", record.id))
        .header("authorization", bearer(ADMIN_TOKEN))
        .json(&json!({
            "name": "Pending Instructor",
            "email": "pending@uni.edu",
            "institute": "Intake Test Institute 1",
            "status": "APPROVED",
            "comments": null
        }))
        .reply(&api)
        .await;

    assert_eq!(response.status(), 200);
    let data: AccountRequestData = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(data.status, AccountRequestStatus::Approved);
    assert_eq!(data.comments, None);
    assert_eq!(notifier.sent.read().await.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert!(body.get("registeredAt").is_some());
    assert!(body.get("createdAt").is_some());
}

#[tokio::test]
async fn test_put_error_statuses() {
    let record = account_request("Pending Instructor", "pending@uni.edu", AccountRequestStatus::Pending);
    let fixture = Fixture::new(Arc::new(RecordingNotifier::default()), vec![record.clone()]);
    let api = create_api_routes(Arc::clone(&fixture.actions), MAX_BODY_SIZE);
    let body = json!({
        "name": "Pending Instructor",
        "email": "invalid email",
        "institute": "Intake Test Institute 1",
        "status": "PENDING"
    });

    let response = warp::test::request()
        .method("PUT")
        .path("/webapi/account/request?id=invalid")
        .header("authorization", bearer(ADMIN_TOKEN))
        .json(&body)
        .reply(&api)
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(message(response.body()), "Invalid UUID string: invalid");

    let response = warp::test::request()
        .method("PUT")
        .path("/webapi/account/request")
        .header("authorization", bearer(ADMIN_TOKEN))
        .json(&body)
        .reply(&api)
        .await;
    assert_eq!(response.status(), 400);
    assert_eq!(message(response.body()), "The [id] HTTP parameter is null.");

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/webapi/account/request?id={}", record.id))
        .header("authorization", bearer(ADMIN_TOKEN))
        .json(&body)
        .reply(&api)
        .await;
    assert_eq!(response.status(), 400);
    assert!(message(response.body()).starts_with("\"invalid email\" is not acceptable"));

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/webapi/account/request?id={}", record.id))
        .json(&body)
        .reply(&api)
        .await;
    assert_eq!(response.status(), 401);

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/webapi/account/request?id={}", record.id))
        .header("authorization", bearer(INSTRUCTOR_TOKEN))
        .json(&body)
        .reply(&api)
        .await;
    assert_eq!(response.status(), 403);

    // Missing id is not revealed to unauthenticated callers
    let response = warp::test::request()
        .method("PUT")
        .path("/webapi/account/request")
        .json(&body)
        .reply(&api)
        .await;
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_unknown_id_returns_not_found() {
    let fixture = Fixture::new(Arc::new(RecordingNotifier::default()), Vec::new());
    let api = create_api_routes(Arc::clone(&fixture.actions), MAX_BODY_SIZE);
    let unknown = uuid::Uuid::new_v4();

    let response = warp::test::request()
        .method("GET")
        .path(&format!("/webapi/account/request?id={}", unknown))
        .header("authorization", bearer(ADMIN_TOKEN))
        .reply(&api)
        .await;

    assert_eq!(response.status(), 404);
    assert_eq!(
        message(response.body()),
        format!("Account request with id = {} not found", unknown)
    );
}

#[tokio::test]
async fn test_create_search_and_delete() {
    let fixture = Fixture::new(Arc::new(RecordingNotifier::default()), Vec::new());
    let api = create_api_routes(Arc::clone(&fixture.actions), MAX_BODY_SIZE);

    let response = warp::test::request()
        .method("POST")
        .path("/webapi/account/request")
        .header("authorization", bearer(ADMIN_TOKEN))
        .json(&json!({
            "name": "Jane Doe",
            "email": "jane@uni.edu",
            "institute": "Uni of Testing",
            "comments": "Please"
        }))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 201);
    let created: AccountRequestData = serde_json::from_slice(response.body()).unwrap();

    let response = warp::test::request()
        .method("GET")
        .path("/webapi/search/accountrequests?searchkey=jane")
        .header("authorization", bearer(ADMIN_TOKEN))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);
    let results: AccountRequestsData = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(results.account_requests.len(), 1);
    assert_eq!(results.account_requests[0].id, created.id);

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/webapi/account/request?id={}", created.id))
        .header("authorization", bearer(ADMIN_TOKEN))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(message(response.body()), "Account request successfully deleted.");
    assert!(fixture.store.is_empty());
}

#[tokio::test]
async fn test_register_and_reset_routes() {
    let record = account_request("Jane Doe", "jane@uni.edu", AccountRequestStatus::Approved);
    let fixture = Fixture::new(Arc::new(RecordingNotifier::default()), vec![record.clone()]);
    let api = create_api_routes(Arc::clone(&fixture.actions), MAX_BODY_SIZE);

    let response = warp::test::request()
        .method("PUT")
        .path(&format!(
            "/webapi/account/request/register?key={}",
            record.registration_key
        ))
        .header("authorization", bearer(INSTRUCTOR_TOKEN))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);
    let registered: AccountRequestData = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(registered.status, AccountRequestStatus::Registered);

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/webapi/account/request/reset?id={}", record.id))
        .header("authorization", bearer(INSTRUCTOR_TOKEN))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 403);

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/webapi/account/request/reset?id={}", record.id))
        .header("authorization", bearer(ADMIN_TOKEN))
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);
    let reset: AccountRequestData = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(reset.status, AccountRequestStatus::Approved);
    assert_eq!(reset.registered_at, None);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let record = account_request("Jane Doe", "jane@uni.edu", AccountRequestStatus::Pending);
    let fixture = Fixture::new(Arc::new(RecordingNotifier::default()), vec![record.clone()]);
    let api = create_api_routes(Arc::clone(&fixture.actions), 64);

    let response = warp::test::request()
        .method("PUT")
        .path(&format!("/webapi/account/request?id={}", record.id))
        .header("authorization", bearer(ADMIN_TOKEN))
        .json(&json!({ "comments": "x".repeat(256) }))
        .reply(&api)
        .await;

    assert_eq!(response.status(), 413);
    assert_eq!(message(response.body()), "Request body is too large");
}

#[tokio::test]
async fn test_health_and_unknown_route() {
    let record = account_request("Jane Doe", "jane@uni.edu", AccountRequestStatus::Pending);
    let fixture = Fixture::new(Arc::new(RecordingNotifier::default()), vec![record]);
    let api = create_api_routes(Arc::clone(&fixture.actions), MAX_BODY_SIZE);

    let response = warp::test::request()
        .method("GET")
        .path("/webapi/health")
        .reply(&api)
        .await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["accountRequests"], 1);
    assert!(body.get("account_requests").is_none());

    let response = warp::test::request()
        .method("GET")
        .path("/webapi/nothing")
        .reply(&api)
        .await;
    assert_eq!(response.status(), 404);
}
