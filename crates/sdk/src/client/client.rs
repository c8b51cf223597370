use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use super::ApiRequest;
use crate::config::Hosts;
use crate::error::{ApiError, ErrorResponse};

/// Shared HTTP client. Every request carries the bearer credential as a
/// default header; responses are decoded into the operation's typed
/// response or mapped into the uniform error descriptor.
#[derive(Debug, Clone)]
pub struct ApiClient {
    hosts: Hosts,
    client: Client,
}

impl ApiClient {
    pub fn new(hosts: Hosts, token: &str) -> Result<Self, ApiError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ApiError::InvalidToken)?;
        bearer.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(AUTHORIZATION, bearer);
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self { hosts, client })
    }

    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, ApiError> {
        let request = request.build_request(&self.hosts, &self.client).build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "dispatching API request");
        let response = self.client.execute(request).await?;
        Self::decode(response).await
    }

    /// Like [`ApiClient::call`], but races the request against a caller
    /// supplied cancellation signal. Cancellation only affects this one
    /// request and surfaces as the distinguished 499 outcome.
    pub async fn call_with_cancel<T: ApiRequest>(
        &self,
        request: T,
        cancel: &CancellationToken,
    ) -> Result<T::Response, ApiError> {
        let request = request.build_request(&self.hosts, &self.client).build()?;
        tracing::debug!(method = %request.method(), url = %request.url(), "dispatching API request");
        tokio::select! {
            _ = cancel.cancelled() => Err(ApiError::Canceled),
            response = self.client.execute(request) => Self::decode(response?).await,
        }
    }

    async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ApiError> {
        if response.status().is_success() {
            Ok(response.json::<R>().await?)
        } else {
            Err(Self::remote_error(response).await)
        }
    }

    /// Map a non-2xx response into [`ApiError::Remote`], preferring the
    /// server's structured error body when it parses.
    pub(crate) async fn remote_error(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let descriptor = serde_json::from_str::<ErrorResponse>(&body).unwrap_or_else(|_| {
            let message = if body.is_empty() {
                status.to_string()
            } else {
                body
            };
            ErrorResponse::new(status.as_u16(), message)
        });
        ApiError::Remote(descriptor)
    }

    pub fn hosts(&self) -> &Hosts {
        &self.hosts
    }

    /// The underlying HTTP client, for operations that stream bodies
    /// instead of decoding JSON.
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
