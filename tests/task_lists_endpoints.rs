//! Integration tests for the `/tasks-lists/` endpoints.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use rstest::rstest;
use serde_json::json;

const MISSING_ID: &str = "0123456789abcdef01234567";

#[rstest]
#[tokio::test]
async fn owner_crud_reflects_every_mutation() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let created = app.create_task_list(&token, "Home").await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Home");
    assert_eq!(created["color"], "#fff");
    assert_eq!(created["hidden"], false);
    assert_eq!(created["CreatedAt"], created["UpdatedAt"]);

    let listed = app.send(Method::GET, "/tasks-lists/", Some(&token), None).await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.result().as_array().unwrap().len(), 1);
    assert_eq!(listed.result()[0]["id"], id.as_str());

    let updated = app
        .send(
            Method::PATCH,
            "/tasks-lists/",
            Some(&token),
            Some(json!({ "id": id, "name": "Work", "color": "#000", "hidden": true })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.result()["id"], id.as_str());
    assert_eq!(updated.result()["name"], "Work");
    assert_eq!(updated.result()["color"], "#000");
    assert_eq!(updated.result()["hidden"], true);
    assert_eq!(updated.result()["CreatedAt"], created["CreatedAt"]);

    let deleted = app
        .send(Method::DELETE, "/tasks-lists/", Some(&token), Some(json!({ "id": id })))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.result(), id.as_str());

    let listed = app.send(Method::GET, "/tasks-lists/", Some(&token), None).await;
    assert!(listed.result().as_array().unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn list_is_empty_array_for_new_user() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let response = app.send(Method::GET, "/tasks-lists/", Some(&token), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.result(), &json!([]));
}

#[rstest]
#[tokio::test]
async fn list_returns_lists_in_creation_order() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;
    for name in ["first", "second", "third"] {
        app.create_task_list(&token, name).await;
    }

    let response = app.send(Method::GET, "/tasks-lists/", Some(&token), None).await;

    let names: Vec<&str> = response
        .result()
        .as_array()
        .unwrap()
        .iter()
        .map(|list| list["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);
}

#[rstest]
#[tokio::test]
async fn other_user_cannot_see_or_touch_list() {
    let app = TestApp::new();
    let owner = app.signed_in("a@x.com").await;
    let intruder = app.signed_in("b@x.com").await;
    let id = app.create_task_list(&owner, "Home").await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let listed = app
        .send(Method::GET, "/tasks-lists/", Some(&intruder), None)
        .await;
    assert_eq!(listed.result(), &json!([]));

    let updated = app
        .send(
            Method::PATCH,
            "/tasks-lists/",
            Some(&intruder),
            Some(json!({ "id": id, "name": "Mine", "color": "#000", "hidden": false })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(updated.error(), "tasks list not found");

    let deleted = app
        .send(Method::DELETE, "/tasks-lists/", Some(&intruder), Some(json!({ "id": id })))
        .await;
    assert_eq!(deleted.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(deleted.error(), "tasks list not found");

    let listed = app.send(Method::GET, "/tasks-lists/", Some(&owner), None).await;
    assert_eq!(listed.result()[0]["name"], "Home");
}

#[rstest]
#[tokio::test]
async fn delete_of_missing_list_is_not_found() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let response = app
        .send(
            Method::DELETE,
            "/tasks-lists/",
            Some(&token),
            Some(json!({ "id": MISSING_ID })),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "tasks list not found");
}

#[rstest]
#[case(json!({ "id": "short" }), StatusCode::BAD_REQUEST)]
#[case(json!({}), StatusCode::BAD_REQUEST)]
#[case(json!({ "id": "zzzzzzzzzzzzzzzzzzzzzzzz" }), StatusCode::INTERNAL_SERVER_ERROR)]
#[tokio::test]
async fn delete_with_malformed_identifier_fails(
    #[case] body: serde_json::Value,
    #[case] expected: StatusCode,
) {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let response = app
        .send(Method::DELETE, "/tasks-lists/", Some(&token), Some(body))
        .await;

    assert_eq!(response.status, expected);
}

#[rstest]
#[case(json!({ "name": "", "color": "#fff", "hidden": false }))]
#[case(json!({ "name": "Home", "color": "", "hidden": false }))]
#[case(json!({ "name": "Home", "color": "#fff" }))]
#[case(json!({ "name": "Home", "color": "#fff", "hidden": "no" }))]
#[tokio::test]
async fn create_rejects_invalid_body(#[case] body: serde_json::Value) {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let response = app
        .send(Method::POST, "/tasks-lists/", Some(&token), Some(body))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[tokio::test]
async fn update_with_unparsable_identifier_is_internal_error() {
    let app = TestApp::new();
    let token = app.signed_in("a@x.com").await;

    let response = app
        .send(
            Method::PATCH,
            "/tasks-lists/",
            Some(&token),
            Some(json!({ "id": "not-an-id", "name": "Home", "color": "#fff", "hidden": false })),
        )
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error(), "invalid identifier: 'not-an-id'");
}

#[rstest]
#[case(Method::GET)]
#[case(Method::POST)]
#[case(Method::PATCH)]
#[case(Method::DELETE)]
#[tokio::test]
async fn every_method_requires_session(#[case] method: Method) {
    let app = TestApp::new();

    let response = app.send(method, "/tasks-lists/", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
