//! End-to-end signup flow against a mock Convex deployment.

use std::sync::Arc;

use anora_engine::{App, ConvexClient, EditOp, Field, FormStep, Region};

use crate::common::{
    expect_single_add, mount_function_error, quick_settings, start_convex_mock, tick_until,
};

fn client(uri: &str) -> Arc<ConvexClient> {
    Arc::new(ConvexClient::new(uri, None).unwrap())
}

async fn submit(app: &mut App, name: &str, email: &str) {
    app.press_enter();
    tick_until(app, "name focus", |app| {
        app.form().focused_field() == Some(Field::Name)
    })
    .await;
    app.edit(EditOp::Paste(name.to_string()));
    app.press_enter();
    tick_until(app, "email focus", |app| {
        app.form().focused_field() == Some(Field::Email)
    })
    .await;
    app.edit(EditOp::Paste(email.to_string()));
    app.press_enter();
}

#[tokio::test]
async fn signup_reaches_the_deployment_once_and_resets() {
    let server = start_convex_mock().await;
    expect_single_add(&server, "Ada", "ada@example.com", "j57a2b").await;

    let mut app = App::new(quick_settings(), client(&server.uri()));
    submit(&mut app, "Ada", " ada@example.com ").await;
    assert_eq!(app.step(), FormStep::Submitting);

    tick_until(&mut app, "success message", |app| {
        app.visibility().success_message
    })
    .await;
    assert_eq!(app.in_flight(), 0);

    tick_until(&mut app, "reset", |app| app.form().is_pristine()).await;
    assert_eq!(app.visibility().regions(), vec![Region::WaitlistButton]);
    // The mock verifies `expect(1)` when the server drops.
}

#[tokio::test]
async fn rejected_signup_still_shows_success() {
    let server = start_convex_mock().await;
    mount_function_error(&server, "mutation", "waitlist:add", "Uncaught Error: nope").await;

    let mut app = App::new(quick_settings(), client(&server.uri()));
    submit(&mut app, "Ada", "ada@example.com").await;

    tick_until(&mut app, "success message", |app| {
        app.visibility().success_message
    })
    .await;
    tick_until(&mut app, "reset", |app| app.form().is_pristine()).await;
}

#[tokio::test]
async fn unreachable_deployment_still_shows_success() {
    // Nothing listens on the port once the server is gone.
    let uri = {
        let server = start_convex_mock().await;
        server.uri()
    };

    let mut app = App::new(quick_settings(), client(&uri));
    submit(&mut app, "Ada", "ada@example.com").await;

    tick_until(&mut app, "success message", |app| {
        app.visibility().success_message
    })
    .await;
}

#[tokio::test]
async fn second_cycle_submits_again() {
    let server = start_convex_mock().await;
    crate::common::mount_success(&server, "mutation", "waitlist:add", "j57a2b".into()).await;

    let mut app = App::new(quick_settings(), client(&server.uri()));
    for name in ["Ada", "Grace"] {
        submit(&mut app, name, &format!("{}@example.com", name.to_lowercase())).await;
        tick_until(&mut app, "reset", |app| app.form().is_pristine()).await;
    }

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(second["args"]["name"], "Grace");
}
