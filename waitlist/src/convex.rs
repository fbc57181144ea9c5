//! Convex HTTP function API client.
//!
//! Every call is a `POST {deployment}/api/{mutation|query}` with
//! `{"path", "args", "format": "json"}`. The body answers with
//! `{"status": "success", "value": ...}` or `{"status": "error", "errorMessage": ...}`.

use std::time::Duration;

use futures_util::FutureExt;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    ADD_FUNCTION, COUNT_FUNCTION, EntryId, LIST_FUNCTION, Signup, WaitlistBackend, WaitlistEntry,
    WaitlistError, WaitlistFut,
};

const CONNECT_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;
const MAX_ERROR_BODY_BYTES: usize = 32 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Mutation,
    Query,
}

impl FunctionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mutation => "mutation",
            Self::Query => "query",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ConvexResponse {
    Success {
        value: Value,
    },
    Error {
        #[serde(rename = "errorMessage")]
        error_message: String,
    },
}

#[derive(Debug, Clone)]
pub struct ConvexClient {
    base_url: String,
    client: reqwest::Client,
}

impl ConvexClient {
    /// Build a client for the deployment at `base_url`.
    ///
    /// `timeout` bounds each whole request; `None` waits for the deployment to answer.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, WaitlistError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("anora/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(WaitlistError::Client)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run one Convex function and return its JSON value.
    pub fn call(
        &self,
        kind: FunctionKind,
        function: &'static str,
        args: Value,
    ) -> WaitlistFut<Value> {
        let url = format!("{}/api/{}", self.base_url, kind.as_str());
        let client = self.client.clone();
        async move {
            let body = json!({ "path": function, "args": args, "format": "json" });
            tracing::debug!(%url, function, "Calling Convex function");

            let response = client
                .post(&url)
                .json(&body)
                .send()
                .await
                .map_err(|source| WaitlistError::Transport { function, source })?;

            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|source| WaitlistError::Transport { function, source })?;

            if !status.is_success() {
                // Convex reports function errors with a 4xx/5xx and the usual envelope.
                if let Ok(ConvexResponse::Error { error_message }) =
                    serde_json::from_str::<ConvexResponse>(&text)
                {
                    return Err(WaitlistError::Backend {
                        function,
                        message: error_message,
                    });
                }
                return Err(WaitlistError::Status {
                    function,
                    status: status.as_u16(),
                    body: truncate_body(text),
                });
            }

            match serde_json::from_str::<ConvexResponse>(&text) {
                Ok(ConvexResponse::Success { value }) => Ok(value),
                Ok(ConvexResponse::Error { error_message }) => Err(WaitlistError::Backend {
                    function,
                    message: error_message,
                }),
                Err(e) => Err(WaitlistError::Decode {
                    function,
                    reason: e.to_string(),
                }),
            }
        }
        .boxed()
    }
}

fn truncate_body(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...");
    }
    body
}

fn decode<T: serde::de::DeserializeOwned>(
    function: &'static str,
    value: Value,
) -> Result<T, WaitlistError> {
    serde_json::from_value(value).map_err(|e| WaitlistError::Decode {
        function,
        reason: e.to_string(),
    })
}

impl WaitlistBackend for ConvexClient {
    fn add(&self, signup: Signup) -> WaitlistFut<EntryId> {
        let call = self.call(
            FunctionKind::Mutation,
            ADD_FUNCTION,
            json!({ "name": signup.name.as_str(), "email": signup.email.as_str() }),
        );
        async move { decode(ADD_FUNCTION, call.await?) }.boxed()
    }

    fn list(&self) -> WaitlistFut<Vec<WaitlistEntry>> {
        let call = self.call(FunctionKind::Query, LIST_FUNCTION, json!({}));
        async move { decode(LIST_FUNCTION, call.await?) }.boxed()
    }

    fn count(&self) -> WaitlistFut<u64> {
        let call = self.call(FunctionKind::Query, COUNT_FUNCTION, json!({}));
        async move {
            let value = call.await?;
            // JSON numbers from the deployment may be encoded as floats.
            match value.as_f64() {
                Some(n) if n.is_finite() && n >= 0.0 => Ok(n as u64),
                _ => Err(WaitlistError::Decode {
                    function: COUNT_FUNCTION,
                    reason: format!("expected a non-negative number, got {value}"),
                }),
            }
        }
        .boxed()
    }

    fn describe(&self) -> String {
        format!("convex ({})", self.base_url)
    }
}
