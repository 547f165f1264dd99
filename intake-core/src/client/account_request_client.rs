use crate::models::{
    AccountRequestCreateRequest, AccountRequestData, AccountRequestUpdateRequest,
    AccountRequestsData, MessageOutput,
};
use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;

/// Body of GET /webapi/health
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub account_requests: usize,
}

pub struct AccountRequestClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl AccountRequestClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base = base_url.into();
        let base = base.trim_end_matches('/').to_string();
        Self {
            base_url: base,
            token,
            client: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn a non-2xx response into an error carrying the server's message
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<MessageOutput>(&body)
                .map(|output| output.message)
                .unwrap_or_else(|_| body.trim().to_string());
            Err(anyhow::anyhow!("Server error {}: {}", status, message))
        }
    }

    pub async fn create(&self, request: &AccountRequestCreateRequest) -> Result<AccountRequestData> {
        let response = self
            .authorized(self.client.post(self.endpoint("webapi/account/request")))
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<AccountRequestData>()
            .await
            .context("Failed to parse account request creation response")
    }

    pub async fn get(&self, id: &str) -> Result<AccountRequestData> {
        let response = self
            .authorized(self.client.get(self.endpoint("webapi/account/request")))
            .query(&[("id", id)])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<AccountRequestData>()
            .await
            .context("Failed to parse account request response")
    }

    pub async fn search(&self, search_key: &str) -> Result<Vec<AccountRequestData>> {
        let response = self
            .authorized(self.client.get(self.endpoint("webapi/search/accountrequests")))
            .query(&[("searchkey", search_key)])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let payload = response
            .json::<AccountRequestsData>()
            .await
            .context("Failed to parse account request search response")?;
        Ok(payload.account_requests)
    }

    pub async fn update(
        &self,
        id: &str,
        request: &AccountRequestUpdateRequest,
    ) -> Result<AccountRequestData> {
        let response = self
            .authorized(self.client.put(self.endpoint("webapi/account/request")))
            .query(&[("id", id)])
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<AccountRequestData>()
            .await
            .context("Failed to parse account request update response")
    }

    pub async fn reset(&self, id: &str) -> Result<AccountRequestData> {
        let response = self
            .authorized(self.client.put(self.endpoint("webapi/account/request/reset")))
            .query(&[("id", id)])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<AccountRequestData>()
            .await
            .context("Failed to parse account request reset response")
    }

    pub async fn register(&self, registration_key: &str) -> Result<AccountRequestData> {
        let response = self
            .authorized(self.client.put(self.endpoint("webapi/account/request/register")))
            .query(&[("key", registration_key)])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<AccountRequestData>()
            .await
            .context("Failed to parse registration response")
    }

    pub async fn delete(&self, id: &str) -> Result<String> {
        let response = self
            .authorized(self.client.delete(self.endpoint("webapi/account/request")))
            .query(&[("id", id)])
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        let output = response
            .json::<MessageOutput>()
            .await
            .context("Failed to parse account request deletion response")?;
        Ok(output.message)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.endpoint("webapi/health")).send().await?;

        let response = Self::ensure_success(response).await?;
        response
            .json::<HealthStatus>()
            .await
            .context("Failed to parse health response")
    }
}
