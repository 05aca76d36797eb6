use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::WidgetConfig;
use crate::error::TransportError;

/// Anti-forgery credential attached to persistence writes.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// The two network capabilities the core needs.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_json(&self, url: &Url) -> Result<Value, TransportError>;

    async fn put_json(&self, url: &Url, token: &AuthToken, body: &Value)
        -> Result<(), TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    token_header: String,
    bearer: Option<String>,
}

impl HttpTransport {
    pub fn new(client: Client, token_header: impl Into<String>) -> Self {
        Self {
            client,
            token_header: token_header.into(),
            bearer: None,
        }
    }

    pub fn from_config(config: &WidgetConfig) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .timeout(config.request_timeout())
            .user_agent(concat!("grantview/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::new(client, config.token_header.clone()).with_bearer(config.access_token.clone()))
    }

    pub fn with_bearer(mut self, bearer: Option<String>) -> Self {
        self.bearer = bearer;
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn check_status(url: &Url, response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(TransportError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &Url) -> Result<Value, TransportError> {
        let response = self.authorize(self.client.get(url.clone())).send().await?;
        let response = check_status(url, response)?;
        let bytes = response.bytes().await?;
        debug!(%url, bytes = bytes.len(), "fetched");
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn put_json(
        &self,
        url: &Url,
        token: &AuthToken,
        body: &Value,
    ) -> Result<(), TransportError> {
        let request = self
            .client
            .put(url.clone())
            .header(self.token_header.as_str(), token.as_str())
            .json(body);
        let response = self.authorize(request).send().await?;
        let response = check_status(url, response)?;
        debug!(%url, status = response.status().as_u16(), "written");
        Ok(())
    }
}
