//! How API calls reach the Tollgate service.
//!
//! [`TollgateClient`](crate::TollgateClient) never talks to the network
//! directly: it hands an [`ApiRequest`] to a [`Transport`] and gets parsed JSON
//! back. [`HttpTransport`] is the production implementation; tests and unusual
//! deployments can inject their own with
//! [`TollgateClientBuilder::transport`](crate::TollgateClientBuilder::transport).

use std::fmt;

use async_trait::async_trait;
use reqwest::{Method, header};
use serde_json::Value;
use url::Url;

use crate::{
    errors::Result,
    macros::sdk_log,
    util::{check_http_status, parse_json_body},
};

/// A single call to the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute API path, e.g. `/v1/publication`.
    pub path: String,
    /// JSON body, sent for `POST`.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    /// `POST path` with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Sends API requests and returns the parsed JSON response.
///
/// Implementations must turn non-success responses into
/// [`RequestError::Server`](crate::errors::RequestError::Server).
#[async_trait]
pub trait Transport: fmt::Debug + Send + Sync {
    /// Perform `request`. An empty success body is returned as [`Value::Null`].
    async fn send(&self, request: ApiRequest) -> Result<Value>;
}

/// [`Transport`] over HTTPS with bearer-token authentication.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    api_url: Url,
    api_key: String,
}

impl HttpTransport {
    pub(crate) fn new(http: reqwest::Client, api_url: Url, api_key: String) -> Self {
        Self {
            http,
            api_url,
            api_key,
        }
    }

    /// Base URL requests are sent to.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Join an API path onto the base URL, keeping any path prefix the base has.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.api_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("api_url", &self.api_url.as_str())
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let url = self.endpoint(&request.path)?;

        let mut rb = self
            .http
            .request(request.method.clone(), url)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = &request.body {
            rb = rb.json(body);
        }

        let response = rb.send().await?;
        sdk_log!(
            debug,
            "{} {} -> {}",
            request.method,
            request.path,
            response.status()
        );

        let response = check_http_status(response).await?;
        let bytes = response.bytes().await?;
        parse_json_body(&bytes)
    }
}
