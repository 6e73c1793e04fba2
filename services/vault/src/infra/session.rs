use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::domain::repository::SessionPort;
use crate::error::VaultServiceError;

/// Verifies web session tokens against the identity provider's introspection
/// endpoint.
#[derive(Clone)]
pub struct HttpSessionVerifier {
    client: reqwest::Client,
    verify_url: String,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VerifyResponse {
    user_id: String,
}

impl HttpSessionVerifier {
    pub fn new(verify_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url,
        }
    }
}

impl SessionPort for HttpSessionVerifier {
    async fn subject(&self, token: &str) -> Result<Option<String>, VaultServiceError> {
        let response = self
            .client
            .post(&self.verify_url)
            .json(&VerifyRequest { token })
            .send()
            .await
            .context("session verify request")?;

        // Any non-2xx answer means the token is not a live session.
        if !response.status().is_success() {
            return Ok(None);
        }
        let body: VerifyResponse = response
            .json()
            .await
            .context("decode session verify response")?;
        Ok(Some(body.user_id))
    }
}
