//! HTTP binding for the personal account endpoints.

use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{AccountResponse, AuthApi, StatusResponse};
use crate::error::{Error, Result};
use crate::models::ProfileUpdate;
use crate::util::{excerpt, normalize_base_url};

const ACCOUNT_ROUTE: &str = "/v1/user/account";

/// Account API client authenticated with a bearer access token.
#[derive(Clone)]
pub struct HttpAccountApi {
    base_url: String,
    access_token: String,
    client: Client,
}

impl fmt::Debug for HttpAccountApi {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HttpAccountApi")
            .field("base_url", &self.base_url)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl HttpAccountApi {
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let access_token = access_token.into().trim().to_string();
        if access_token.is_empty() {
            return Err(Error::Config("access token must not be empty".to_string()));
        }

        Ok(Self {
            base_url,
            access_token,
            client: Client::builder().build()?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn account_url(&self) -> String {
        format!("{}{ACCOUNT_ROUTE}", self.base_url)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(parse_api_error(status, &body)));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl AuthApi for HttpAccountApi {
    async fn fetch_personal_account(&self) -> Result<AccountResponse> {
        tracing::debug!(url = %self.account_url(), "fetching personal account");
        self.send_json(self.client.get(self.account_url())).await
    }

    async fn update_personal_account(&self, payload: &ProfileUpdate) -> Result<StatusResponse> {
        tracing::debug!(fields = payload.len(), "updating personal account");
        self.send_json(self.client.put(self.account_url()).json(payload))
            .await
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = excerpt(body);
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{trimmed} ({})", status.as_u16())
    }
}
