//! Common test helpers for integration tests.
//!
//! Builds the real router over in-memory repositories and drives it with
//! `tower::ServiceExt::oneshot`.
//!
//! # Usage
//!
//! ```ignore
//! mod common;
//! use common::TestApp;
//! ```
//!
//! # Note
//!
//! `#![allow(dead_code)]` is needed because every integration test file is
//! compiled as its own crate and uses a different subset of these helpers.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use task_lists_api::api::{self, AppState, SESSION_COOKIE};
use task_lists_api::config::Config;
use task_lists_api::infrastructure::Repositories;

// =============================================================================
// Test Application
// =============================================================================

/// The application router over fresh in-memory repositories.
#[derive(Clone)]
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub set_cookie: Option<String>,
}

impl TestResponse {
    /// Returns the `result` member of a success envelope.
    pub fn result(&self) -> &Value {
        assert_eq!(self.body["success"], true, "expected success: {}", self.body);
        &self.body["result"]
    }

    /// Returns the `error` member of an error envelope.
    pub fn error(&self) -> &str {
        assert_eq!(self.body["success"], false, "expected failure: {}", self.body);
        self.body["error"].as_str().unwrap_or_default()
    }

    /// Returns the session token carried by `Set-Cookie`, if any.
    pub fn session_token(&self) -> Option<String> {
        let cookie = self.set_cookie.as_deref()?;
        let value = cookie.strip_prefix(&format!("{SESSION_COOKIE}="))?;
        Some(value.split(';').next().unwrap_or_default().to_string())
    }
}

impl TestApp {
    /// Creates an application with empty in-memory storage and sessions.
    pub fn new() -> Self {
        let state = AppState::from_repositories(Repositories::in_memory());
        let router = api::router(state.clone(), &Config::default());
        Self { router, state }
    }

    /// Sends a request with an optional session token and JSON body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let body = body.map(|value| value.to_string());
        self.send_raw(method, path, token, body).await
    }

    /// Sends a request with an optional session token and a raw body.
    pub async fn send_raw(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::COOKIE, format!("{SESSION_COOKIE}={token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            body,
            set_cookie,
        }
    }

    /// Registers a user and returns the new id.
    pub async fn register(&self, email: &str, password: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/users/register",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.result().as_str().unwrap().to_string()
    }

    /// Logs in and returns the session token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/users/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.session_token().unwrap()
    }

    /// Registers and logs in a user, returning the session token.
    pub async fn signed_in(&self, email: &str) -> String {
        self.register(email, "secret").await;
        self.login(email, "secret").await
    }

    /// Creates a task list and returns its JSON projection.
    pub async fn create_task_list(&self, token: &str, name: &str) -> Value {
        let response = self
            .send(
                Method::POST,
                "/tasks-lists/",
                Some(token),
                Some(json!({ "name": name, "color": "#fff", "hidden": false })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.result().clone()
    }

    /// Creates a task and returns its JSON projection.
    pub async fn create_task(&self, token: &str, list_id: Option<&str>, title: &str) -> Value {
        let response = self
            .send(
                Method::POST,
                "/tasks/",
                Some(token),
                Some(json!({
                    "list_id": list_id,
                    "title": title,
                    "note": "",
                    "subs": [{ "title": "step", "complete": false }],
                    "complete": false,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        response.result().clone()
    }
}
