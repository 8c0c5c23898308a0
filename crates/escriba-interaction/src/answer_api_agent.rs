//! HostedAnswerAgent - client for the hosted answering function.
//!
//! Invokes the `chat-cartorial` function on the hosted backend with the
//! conversation so far and returns the structured answer payload.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use escriba_core::config::BackendConfig;
use escriba_core::conversation::{AnswerPayload, AnsweringAgent, ChatMessage};
use escriba_core::error::{EscribaError, Result};

const ANSWER_FUNCTION: &str = "chat-cartorial";

/// Agent implementation that talks to the hosted answering function.
#[derive(Clone)]
pub struct HostedAnswerAgent {
    client: Client,
    endpoint: String,
    anon_key: String,
    access_token: Option<String>,
}

impl HostedAnswerAgent {
    /// Creates an agent from the backend configuration.
    ///
    /// The underlying client carries the configured request timeout; there
    /// is no retry around the call.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| EscribaError::internal(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            endpoint: config.function_url(ANSWER_FUNCTION),
            anon_key: config.anon_key.clone(),
            access_token: None,
        })
    }

    /// Attaches the signed-in user's access token to subsequent calls.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }

    async fn send_request(&self, body: &InvokeRequest<'_>) -> Result<AnswerPayload> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
            .json(body)
            .send()
            .await
            .map_err(|err| EscribaError::Remote {
                status: err.status().map(|s| s.as_u16()),
                message: format!("Answer request failed: {err}"),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        response
            .json::<AnswerPayload>()
            .await
            .map_err(|err| EscribaError::remote(format!("Failed to parse answer payload: {err}")))
    }
}

#[async_trait]
impl AnsweringAgent for HostedAnswerAgent {
    async fn answer(&self, messages: &[ChatMessage]) -> Result<AnswerPayload> {
        tracing::debug!(count = messages.len(), "Invoking answering function");
        let request = InvokeRequest { messages };
        self.send_request(&request).await
    }
}

#[derive(Serialize)]
struct InvokeRequest<'a> {
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

fn map_http_error(status: StatusCode, body: String) -> EscribaError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error)
        .unwrap_or_else(|_| body.clone());
    EscribaError::remote_with_status(status.as_u16(), message)
}
