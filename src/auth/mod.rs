//! Server-to-server OAuth token exchange.
//!
//! One call per run; the token lives only for the process duration and no
//! refresh or expiry handling is done.

use anyhow::{Context, Result};
use serde::Deserialize;

pub struct Authenticator {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl Authenticator {
    /// Create an authenticator against the given OAuth base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Exchange account credentials for a bearer token.
    ///
    /// Any non-success status or transport failure is fatal to the run.
    pub async fn access_token(
        &self,
        account_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/oauth/token?grant_type=account_credentials&account_id={}",
            self.base_url, account_id
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(client_id, Some(client_secret))
            .send()
            .await
            .context("Failed to reach the OAuth token endpoint")?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(anyhow::anyhow!(
                "Token exchange failed ({}): {}",
                status,
                body
            ));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).context("Failed to parse token response")?;

        Ok(token.access_token)
    }
}
