//! HTTP client for the game server's session registration API.

use std::time::Duration;

use session_common::{
    session_id_from_url, unregister_path, RegisterRequest, RegisterResponse,
    RegistrationOutcome, SessionError, SessionResult, HEALTH_PATH,
};
use tracing::{debug, info, instrument};

use crate::config::HookConfig;

/// Registers and unregisters simulated sessions.
#[derive(Debug, Clone)]
pub struct SessionRegistrar {
    client: reqwest::Client,
    config: HookConfig,
}

impl SessionRegistrar {
    /// Create a registrar with its own HTTP client.
    pub fn new(config: HookConfig) -> SessionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SessionError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Create a registrar sharing an existing HTTP client.
    pub fn with_client(client: reqwest::Client, config: HookConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    /// Register a session and return the websocket path the server assigned.
    #[instrument(skip(self), fields(game_id = request.game_id, user_id = request.user_id))]
    pub async fn register(&self, request: RegisterRequest) -> SessionResult<RegisterResponse> {
        let url = self.config.register_url();

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        let registered = RegistrationOutcome::from_body(&body).into_result()?;

        debug!(url = %registered.url, "Session registered");
        Ok(registered)
    }

    /// Register a session and return the full websocket target.
    pub async fn register_target(&self, request: RegisterRequest) -> SessionResult<String> {
        let registered = self.register(request).await?;
        Ok(self.config.target_for(&registered.url))
    }

    /// Remove a session from the server. Accepts the registered path or the
    /// full websocket target. Returns the session id that was removed.
    #[instrument(skip(self))]
    pub async fn unregister(&self, url: &str) -> SessionResult<String> {
        let session_id = session_id_from_url(url)?.to_string();
        let endpoint = self.config.endpoint(&unregister_path(&session_id));

        let response = self.client.delete(&endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::UnexpectedStatus {
                status: status.as_u16(),
                url: endpoint,
            });
        }

        info!(session_id = %session_id, "Session unregistered");
        Ok(session_id)
    }

    /// Check the registration host's health endpoint.
    pub async fn health(&self) -> SessionResult<()> {
        let endpoint = self.config.endpoint(HEALTH_PATH);

        let response = self
            .client
            .get(&endpoint)
            .timeout(Duration::from_secs(5))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SessionError::UnexpectedStatus {
                status: response.status().as_u16(),
                url: endpoint,
            });
        }

        Ok(())
    }
}
