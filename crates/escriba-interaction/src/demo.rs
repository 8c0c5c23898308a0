//! Demo-account provisioning client.
//!
//! Consumes the `create-demo-account` function: an empty POST that returns
//! throwaway credentials for a demo session. The serverless handler behind
//! it is a single admin API call on the hosted platform.

use reqwest::Client;
use serde::Deserialize;

use escriba_core::config::BackendConfig;
use escriba_core::error::{EscribaError, Result};

const DEMO_FUNCTION: &str = "create-demo-account";

/// Credentials for a freshly provisioned demo account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemoCredentials {
    pub email: String,
    pub password: String,
    pub user_id: String,
}

#[derive(Deserialize)]
struct DemoErrorBody {
    error: String,
}

/// Client for the demo-provisioning endpoint.
pub struct DemoAccessClient {
    client: Client,
    endpoint: String,
    anon_key: String,
}

impl DemoAccessClient {
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|err| EscribaError::internal(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            endpoint: config.function_url(DEMO_FUNCTION),
            anon_key: config.anon_key.clone(),
        })
    }

    /// Provisions a demo account and returns its credentials.
    pub async fn create_demo_account(&self) -> Result<DemoCredentials> {
        tracing::debug!("Requesting demo account");
        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|err| EscribaError::remote(format!("Demo request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<DemoErrorBody>(&body)
                .map(|parsed| parsed.error)
                .unwrap_or_else(|_| "Erro ao criar conta demo".to_string());
            return Err(EscribaError::remote_with_status(status, message));
        }

        response
            .json::<DemoCredentials>()
            .await
            .map_err(|err| EscribaError::remote(format!("Credenciais demo não recebidas: {err}")))
    }
}
