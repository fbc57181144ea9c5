//! Shared test utilities and fixtures
//!
//! A wiremock stand-in for a Convex deployment and helpers for driving the app on
//! the real clock.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use tokio::time::Instant;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use anora_engine::{App, AppSettings, FormTimings};

/// Start a mock server that simulates a Convex deployment
pub async fn start_convex_mock() -> MockServer {
    MockServer::start().await
}

fn endpoint(kind: &str) -> String {
    format!("/api/{kind}")
}

/// Answer calls to `function` with a success envelope around `value`.
pub async fn mount_success(server: &MockServer, kind: &str, function: &str, value: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint(kind)))
        .and(body_partial_json(json!({ "path": function })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "value": value,
            })),
        )
        .mount(server)
        .await;
}

/// Answer calls to `function` the way Convex reports a thrown error.
pub async fn mount_function_error(server: &MockServer, kind: &str, function: &str, message: &str) {
    Mock::given(method("POST"))
        .and(path(endpoint(kind)))
        .and(body_partial_json(json!({ "path": function })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "errorMessage": message,
        })))
        .mount(server)
        .await;
}

/// Expect exactly one `waitlist:add` mutation with these arguments.
pub async fn expect_single_add(server: &MockServer, name: &str, email: &str, id: &str) {
    Mock::given(method("POST"))
        .and(path(endpoint("mutation")))
        .and(body_partial_json(json!({
            "path": "waitlist:add",
            "args": { "name": name, "email": email },
            "format": "json",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "value": id,
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// A stored entry as the deployment returns it.
pub fn entry_json(id: &str, name: &str, email: &str, created_at: f64) -> Value {
    json!({
        "_id": id,
        "_creationTime": created_at,
        "name": name,
        "email": email,
        "createdAt": created_at,
    })
}

/// Default animation, form timers shortened for real-clock tests.
pub fn quick_settings() -> AppSettings {
    AppSettings {
        form: FormTimings {
            reveal_delay: Duration::from_millis(5),
            step_delay: Duration::from_millis(5),
            focus_delay: Duration::from_millis(5),
            success_display: Duration::from_millis(50),
        },
        ..AppSettings::default()
    }
}

/// Tick the app on the real clock until `done` holds. Panics after five seconds.
pub async fn tick_until(app: &mut App, what: &str, mut done: impl FnMut(&App) -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        app.tick(Instant::now());
        if done(app) {
            return;
        }
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}
