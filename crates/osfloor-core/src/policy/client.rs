//! Management API client for device compliance policies.

use std::collections::HashSet;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use url::Url;

use super::{CompliancePolicy, Platform, PolicyPage, UpdatePayload};
use crate::auth::TokenSource;
use crate::error::{ApiError, ConfigError, CoreError, Result, ValidationError};
use crate::json;

const USER_AGENT: &str = concat!("osfloor/", env!("CARGO_PKG_VERSION"));
const COLLECTION_PATH: &str = "deviceManagement/deviceCompliancePolicies";

/// Reads and patches compliance policies through the management API.
pub struct PolicyClient {
    base_url: Url,
    tokens: Box<dyn TokenSource>,
    http_client: Client,
}

impl PolicyClient {
    /// Create a client rooted at `base_url` (e.g. `https://graph.microsoft.com/beta/`).
    pub fn new(base_url: &str, tokens: Box<dyn TokenSource>) -> Result<Self> {
        let http_client = Client::builder().user_agent(USER_AGENT).build()?;
        Self::with_http_client(base_url, tokens, http_client)
    }

    /// Same as [`PolicyClient::new`] but reusing an existing HTTP client.
    pub fn with_http_client(
        base_url: &str,
        tokens: Box<dyn TokenSource>,
        http_client: Client,
    ) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidValue {
            key: "graph.base_url".into(),
            message: e.to_string(),
        })?;

        Ok(Self {
            base_url,
            tokens,
            http_client,
        })
    }

    fn collection_url(&self) -> Result<Url> {
        self.base_url.join(COLLECTION_PATH).map_err(|e| {
            CoreError::from(ConfigError::InvalidValue {
                key: "graph.base_url".into(),
                message: e.to_string(),
            })
        })
    }

    fn policy_url(&self, id: &str) -> Result<Url> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidValue {
                key: "graph.base_url".into(),
                message: "base URL cannot carry a path".into(),
            })?
            .push(id);
        Ok(url)
    }

    /// Fetch every compliance policy, following `@odata.nextLink` paging.
    ///
    /// With `platform` set, only policies of that platform are returned.
    pub async fn list_policies(&self, platform: Option<Platform>) -> Result<Vec<CompliancePolicy>> {
        let mut url = self.collection_url()?;
        let mut policies = Vec::new();
        let mut pages = 0usize;
        let mut visited = HashSet::new();

        loop {
            visited.insert(url.clone());
            let token = self.tokens.access_token()?;
            let resp = self
                .http_client
                .get(url.clone())
                .bearer_auth(&token)
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            let page: PolicyPage = check_status(resp).await?.json().await?;
            pages += 1;
            policies.extend(page.value);

            match page.next_link {
                Some(next) => {
                    let next = Url::parse(&next).map_err(|e| ValidationError::InvalidValue {
                        field: "@odata.nextLink".into(),
                        message: e.to_string(),
                    })?;
                    if visited.contains(&next) {
                        tracing::warn!(next_link = %next, pages, "nextLink repeats an earlier page, stopping");
                        break;
                    }
                    url = next;
                }
                None => break,
            }
        }

        tracing::debug!(count = policies.len(), pages, "fetched compliance policies");

        if let Some(platform) = platform {
            policies.retain(|p| p.platform() == Some(platform));
        }
        Ok(policies)
    }

    /// PATCH policy `id` with a raw JSON body.
    ///
    /// The body is validated first; malformed JSON never reaches the network.
    pub async fn update_policy(&self, id: &str, payload: &str) -> Result<()> {
        json::ensure_valid_json(payload)?;

        let url = self.policy_url(id)?;
        let token = self.tokens.access_token()?;
        let resp = self
            .http_client
            .patch(url)
            .bearer_auth(&token)
            .header(CONTENT_TYPE, "application/json")
            .body(payload.to_string())
            .send()
            .await?;

        check_status(resp).await?;
        tracing::info!(policy_id = id, "compliance policy updated");
        Ok(())
    }

    /// Serialize `payload` and PATCH policy `id` with it.
    pub async fn update_policy_with(&self, id: &str, payload: &UpdatePayload) -> Result<()> {
        let body = serde_json::to_string(payload)?;
        self.update_policy(id, &body).await
    }
}

/// Map a non-success response to [`ApiError`] carrying the server's detail.
async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let err = ApiError::from_body(status.as_u16(), &body);
    tracing::error!(status = err.status, code = %err.code, message = %err.message, "management API request failed");
    Err(err.into())
}
