use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::UpstreamError;

pub const CREDENTIAL_HEADER: &str = "api-key-id";
pub const MOVEMENTS_PATH: &str = "/account_movements";

const MAX_ERROR_BODY_CHARS: usize = 2048;

/// Query parameters of the account-movements endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementsQuery {
    pub page: u32,
    pub limit: u32,
    pub from_created_date: String,
    pub until_created_date: String,
    #[serde(rename = "type")]
    pub tx_type: String,
    pub withdrawal_id: String,
    pub reason: String,
}

impl Default for MovementsQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 15,
            from_created_date: "2019-08-24".to_string(),
            until_created_date: "2019-08-24".to_string(),
            tx_type: "credit".to_string(),
            withdrawal_id: "string".to_string(),
            reason: "withdrawal".to_string(),
        }
    }
}

/// Client for the reference account-movements API
#[derive(Clone)]
pub struct ReferenceClient {
    base_url: String,
    credential: String,
    client: reqwest::Client,
}

impl ReferenceClient {
    pub fn new(
        base_url: impl Into<String>,
        credential: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            credential: credential.into(),
            client,
        })
    }

    /// Build a client whose credential comes from the named environment variable
    pub fn from_env(
        base_url: impl Into<String>,
        credential_env: &str,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let credential = std::env::var(credential_env)
            .map_err(|_| UpstreamError::MissingCredential(credential_env.to_string()))?;
        Self::new(base_url, credential, timeout)
    }

    /// Fetch one page of account movements as raw JSON
    pub async fn fetch_movements(
        &self,
        query: &MovementsQuery,
    ) -> Result<serde_json::Value, UpstreamError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), MOVEMENTS_PATH);
        let response = self
            .client
            .get(&url)
            .header(CREDENTIAL_HEADER, self.credential.as_str())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                status,
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        Ok(response.json::<serde_json::Value>().await?)
    }
}

/// Call the reference API and discard the outcome.
///
/// The response does not feed generation, so failures are only logged.
pub async fn probe_reference(client: &ReferenceClient, query: &MovementsQuery) {
    match client.fetch_movements(query).await {
        Ok(body) => {
            let items = body
                .get("results")
                .and_then(serde_json::Value::as_array)
                .map(Vec::len);
            info!(?items, "reference API responded");
        }
        Err(err) => warn!(error = %err, "reference API call failed, continuing without it"),
    }
}
