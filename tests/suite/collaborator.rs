//! Waitlist collaborator contract, in memory and over the Convex wire format.

use serde_json::json;

use anora_types::{NonEmptyString, Signup};
use anora_waitlist::{ConvexClient, MemoryWaitlist, WaitlistBackend, WaitlistError};

use crate::common::{entry_json, mount_function_error, mount_success, start_convex_mock};

fn signup(name: &str, email: &str) -> Signup {
    Signup {
        name: NonEmptyString::new(name).unwrap(),
        email: NonEmptyString::new(email).unwrap(),
    }
}

#[tokio::test]
async fn memory_backend_is_idempotent_per_email() {
    let backend = MemoryWaitlist::new();
    let first = backend.add(signup("Ada", "ada@example.com")).await.unwrap();
    backend
        .add(signup("Grace", "grace@example.com"))
        .await
        .unwrap();
    let again = backend
        .add(signup("Ada Lovelace", "ada@example.com"))
        .await
        .unwrap();
    assert_eq!(first, again);

    let entries = backend.list().await.unwrap();
    assert_eq!(backend.count().await.unwrap(), 2);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].email, "grace@example.com");
    assert_eq!(entries[1].name, "Ada Lovelace");
}

#[tokio::test]
async fn convex_list_and_count_round_trip() {
    let server = start_convex_mock().await;
    mount_success(
        &server,
        "query",
        "waitlist:list",
        json!([
            entry_json("b", "Grace", "grace@example.com", 1_730_000_100_000.0),
            entry_json("a", "Ada", "ada@example.com", 1_730_000_000_000.0),
        ]),
    )
    .await;
    mount_success(&server, "query", "waitlist:count", json!(2.0)).await;

    let client = ConvexClient::new(server.uri(), None).unwrap();
    let entries = client.list().await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id.as_str(), "b");
    assert!(entries[0].created_at > entries[1].created_at);
    assert_eq!(client.count().await.unwrap(), 2);
}

#[tokio::test]
async fn convex_function_error_is_reported_with_its_message() {
    let server = start_convex_mock().await;
    mount_function_error(&server, "mutation", "waitlist:add", "Server Error").await;

    let client = ConvexClient::new(server.uri(), None).unwrap();
    let err = client
        .add(signup("Ada", "ada@example.com"))
        .await
        .unwrap_err();
    match &err {
        WaitlistError::Backend { function, message } => {
            assert_eq!(*function, "waitlist:add");
            assert_eq!(message, "Server Error");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.function(), Some("waitlist:add"));
}

#[tokio::test]
async fn trailing_slash_in_endpoint_is_ignored() {
    let server = start_convex_mock().await;
    mount_success(&server, "query", "waitlist:count", json!(0)).await;

    let client = ConvexClient::new(format!("{}/", server.uri()), None).unwrap();
    assert_eq!(client.base_url(), server.uri());
    assert_eq!(client.count().await.unwrap(), 0);
}
