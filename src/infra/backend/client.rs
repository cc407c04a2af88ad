//! Shared JSON-over-HTTP plumbing for the back-end collaborators.

use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use super::BackendConfig;
use crate::domain::{AppError, ExternalServiceError};

/// Thin wrapper over `reqwest::Client` bound to one back end
#[derive(Debug, Clone)]
pub struct BackendClient {
    http_client: Client,
    base_url: String,
    api_token: Option<SecretString>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, AppError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                AppError::ExternalService(ExternalServiceError::Configuration(format!(
                    "Failed to create HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "Calling back end");

        let builder = self.http_client.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response, AppError> {
        let response = builder.send().await.map_err(|e| {
            error!(path = %path, error = %e, "Back-end request failed");
            AppError::ExternalService(ExternalServiceError::from(e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(path = %path, status = %status, body = %body, "Back end returned error");
            return Err(AppError::ExternalService(ExternalServiceError::ApiError {
                status_code: status.as_u16(),
                message: body,
            }));
        }

        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(response: Response, path: &str) -> Result<T, AppError> {
        response.json::<T>().await.map_err(|e| {
            error!(path = %path, error = %e, "Failed to parse back-end response");
            AppError::ExternalService(ExternalServiceError::ParseError(e.to_string()))
        })
    }

    /// `GET path`, decoding the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        Self::parse(response, path).await
    }

    /// Send `body` as JSON and decode the JSON reply.
    ///
    /// Once the back end answers 2xx the write has happened, so a reply that
    /// cannot be read as `T` yields `Ok(None)` instead of an error.
    pub async fn send_json<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, AppError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send(self.request(method, path).json(body), path)
            .await?;

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to read back-end reply body");
                return Ok(None);
            }
        };

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(path = %path, error = %e, "Back-end reply has an unexpected shape");
                Ok(None)
            }
        }
    }

    /// Send `body` as JSON, ignoring whatever the back end replies with
    pub async fn send_discarding<B>(&self, method: Method, path: &str, body: &B) -> Result<(), AppError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(method, path).json(body), path)
            .await
            .map(|_| ())
    }

    /// `GET path`, only checking for a 2xx status
    pub async fn probe(&self, path: &str) -> Result<(), AppError> {
        self.send(self.request(Method::GET, path), path)
            .await
            .map(|_| ())
    }
}
