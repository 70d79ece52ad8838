//! HTTP implementation of the array store gateway.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use bucket_model::{
    ArrayId, ArrayRecord, CreateArrayRequest, ListResponse, Page, SortOutcome, SortRequest,
    UpdateArrayRequest,
};

use crate::config::ClientConfig;
use crate::error::{GatewayError, Result};
use crate::gateway::RemoteArrayGateway;

/// Talks to the array store over HTTP.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Creates a gateway for the store described by `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| GatewayError::InvalidConfig(format!("user_agent: {e}")))?;
        headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| GatewayError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn array_url(&self, id: ArrayId) -> String {
        format!("{}/arrays/{id}/", self.base_url)
    }

    /// Checks the status, mapping `404` to `NotFound` when `id` is given.
    async fn check(response: Response, id: Option<ArrayId>) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND
            && let Some(id) = id
        {
            return Err(GatewayError::NotFound { id });
        }
        if !status.is_success() {
            let url = response.url().to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RemoteArrayGateway for HttpGateway {
    async fn list(&self, page: u32) -> Result<Page> {
        if page == 0 {
            return Err(GatewayError::InvalidRequest(
                "page numbers start at 1".to_string(),
            ));
        }
        let url = format!("{}/arrays/?page={page}", self.base_url);
        tracing::debug!("Fetching array page from {}", url);

        let response = Self::check(self.client.get(&url).send().await?, None).await?;
        let body: ListResponse = Self::json(response).await?;
        Page::listing(body.results, body.count, page)
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))
    }

    async fn read(&self, id: ArrayId) -> Result<ArrayRecord> {
        let url = self.array_url(id);
        tracing::debug!("Fetching array from {}", url);

        let response = Self::check(self.client.get(&url).send().await?, Some(id)).await?;
        Self::json(response).await
    }

    async fn create(&self, data: &[i64]) -> Result<ArrayRecord> {
        let url = format!("{}/arrays/", self.base_url);
        tracing::debug!(elements = data.len(), "Creating array at {}", url);

        let response = self
            .client
            .post(&url)
            .json(&CreateArrayRequest::new(data))
            .send()
            .await?;
        let response = Self::check(response, None).await?;
        Self::json(response).await
    }

    async fn update(&self, id: ArrayId, data: &[i64], is_sorted: bool) -> Result<()> {
        let url = self.array_url(id);
        tracing::debug!(elements = data.len(), is_sorted, "Updating array at {}", url);

        let response = self
            .client
            .put(&url)
            .json(&UpdateArrayRequest { data, is_sorted })
            .send()
            .await?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }

    async fn delete(&self, id: ArrayId) -> Result<()> {
        let url = self.array_url(id);
        tracing::debug!("Deleting array at {}", url);

        let response = self.client.delete(&url).send().await?;
        Self::check(response, Some(id)).await?;
        Ok(())
    }

    async fn sort(&self, id: ArrayId) -> Result<SortOutcome> {
        let url = format!("{}/sort/", self.base_url);
        tracing::debug!(%id, "Requesting sort at {}", url);

        let response = self
            .client
            .post(&url)
            .json(&SortRequest { id })
            .send()
            .await?;
        let response = Self::check(response, Some(id)).await?;
        Self::json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_creation() {
        let gateway = HttpGateway::new(&ClientConfig::default());
        assert!(gateway.is_ok());
    }

    #[test]
    fn test_array_url() {
        let config = ClientConfig::default().with_api_url("http://store.local/api/");
        let gateway = HttpGateway::new(&config).unwrap();
        assert_eq!(
            gateway.array_url(ArrayId::new(7)),
            "http://store.local/api/arrays/7/"
        );
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ClientConfig::default().with_api_url("nowhere");
        assert!(matches!(
            HttpGateway::new(&config),
            Err(GatewayError::InvalidConfig(_))
        ));
    }
}
