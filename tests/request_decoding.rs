//! Property tests for request body decoding.
//!
//! An unrecognized member makes every body a 400, whatever the recognized
//! members hold.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use proptest::prelude::*;
use serde_json::{Value, json};

const KNOWN_FIELDS: &[&str] = &[
    "id", "email", "password", "name", "color", "hidden", "list_id", "title", "note", "subs",
    "complete",
];

fn unknown_field() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,15}"
        .prop_filter("must not be a recognized member", |name| {
            !KNOWN_FIELDS.contains(&name.as_str())
        })
}

fn with_extra(mut body: Value, field: &str, value: Value) -> Value {
    body.as_object_mut()
        .unwrap()
        .insert(field.to_string(), value);
    body
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Registration never accepts a body with an extra member.
    #[test]
    fn register_rejects_unknown_member(
        field in unknown_field(),
        extra in any::<i64>(),
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
        password in "[a-zA-Z0-9]{1,16}",
    ) {
        let status = runtime().block_on(async {
            let app = TestApp::new();
            let body = with_extra(
                json!({ "email": email, "password": password }),
                &field,
                json!(extra),
            );
            app.send(Method::POST, "/users/register", None, Some(body)).await.status
        });

        prop_assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// Task list creation never accepts a body with an extra member.
    #[test]
    fn create_task_list_rejects_unknown_member(
        field in unknown_field(),
        name in "[a-zA-Z ]{1,16}",
        color in "#[0-9a-f]{3}",
        hidden in any::<bool>(),
    ) {
        let status = runtime().block_on(async {
            let app = TestApp::new();
            let token = app.signed_in("a@x.com").await;
            let body = with_extra(
                json!({ "name": name, "color": color, "hidden": hidden }),
                &field,
                json!("value"),
            );
            app.send(Method::POST, "/tasks-lists/", Some(&token), Some(body)).await.status
        });

        prop_assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// Task creation never accepts a body with an extra member.
    #[test]
    fn create_task_rejects_unknown_member(
        field in unknown_field(),
        title in "[a-zA-Z ]{1,16}",
        complete in any::<bool>(),
    ) {
        let status = runtime().block_on(async {
            let app = TestApp::new();
            let token = app.signed_in("a@x.com").await;
            let body = with_extra(
                json!({ "title": title, "complete": complete }),
                &field,
                Value::Null,
            );
            app.send(Method::POST, "/tasks/", Some(&token), Some(body)).await.status
        });

        prop_assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
