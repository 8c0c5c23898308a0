//! Client for the hosted identity provider.
//!
//! Only the password grant and local sign-out are needed: account
//! management and session refresh stay on the hosted platform.

use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use escriba_core::config::BackendConfig;
use escriba_core::error::{EscribaError, Result};

use crate::session::{Session, SessionStore, UserInfo};

/// Client for the hosted auth endpoints.
pub struct AuthClient {
    client: Client,
    config: BackendConfig,
}

impl AuthClient {
    pub fn new(config: BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| EscribaError::internal(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { client, config })
    }

    /// Signs in with email/password and publishes the session to `store`.
    pub async fn sign_in(
        &self,
        store: &SessionStore,
        email: &str,
        password: &str,
    ) -> Result<Session> {
        let url = self.config.auth_url("token?grant_type=password");
        let response = self
            .client
            .post(url)
            .header("apikey", &self.config.anon_key)
            .json(&PasswordGrantRequest { email, password })
            .send()
            .await
            .map_err(|err| EscribaError::auth(format!("Sign-in request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(map_auth_error(status, body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|err| EscribaError::auth(format!("Failed to parse token response: {err}")))?;

        let session = token.into_session();
        store.set(session.clone());
        tracing::debug!(user = %session.user.email, "Signed in");
        Ok(session)
    }

    /// Signs out locally. The hosted platform invalidates tokens on its own
    /// schedule; the client only drops its session state.
    pub fn sign_out(&self, store: &SessionStore) {
        store.clear();
        tracing::debug!("Signed out");
    }
}

#[derive(Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: UserInfo,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            expires_at: self
                .expires_in
                .map(|seconds| Utc::now() + Duration::seconds(seconds)),
            user: self.user,
        }
    }
}

#[derive(Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn map_auth_error(status: StatusCode, body: String) -> EscribaError {
    let message = serde_json::from_str::<AuthErrorBody>(&body)
        .ok()
        .and_then(|parsed| parsed.error_description.or(parsed.msg).or(parsed.error))
        .unwrap_or_else(|| format!("Sign-in rejected (HTTP {})", status.as_u16()));
    EscribaError::auth(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_becomes_session_with_expiry() {
        let token: TokenResponse = serde_json::from_str(
            r#"{"access_token":"jwt","expires_in":3600,"user":{"id":"u1","email":"a@b.c"}}"#,
        )
        .unwrap();
        let session = token.into_session();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.user.id, "u1");
        let expires_at = session.expires_at.unwrap();
        assert!(expires_at > Utc::now() + Duration::minutes(55));
        assert!(!session.is_expired());
    }

    #[test]
    fn token_response_without_expiry_never_expires_locally() {
        let token: TokenResponse = serde_json::from_str(
            r#"{"access_token":"jwt","user":{"id":"u1","email":"a@b.c"}}"#,
        )
        .unwrap();
        let session = token.into_session();
        assert_eq!(session.expires_at, None);
        assert!(!session.is_expired());
    }

    #[test]
    fn auth_error_uses_provider_description() {
        let err = map_auth_error(
            StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#
                .to_string(),
        );
        assert_eq!(
            err.to_string(),
            "Authentication error: Invalid login credentials"
        );
    }

    #[test]
    fn auth_error_falls_back_to_status() {
        let err = map_auth_error(StatusCode::UNAUTHORIZED, "not json".to_string());
        assert!(err.to_string().contains("HTTP 401"));
    }
}
