use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::AuthError;
use crate::transport::{AuthToken, Transport};

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn token(&self) -> Result<AuthToken, AuthError>;
}

/// Reads `referrerToken` from the host's anti-forgery endpoint. A fresh token
/// is requested for every write.
pub struct XsrfTokenProvider {
    transport: Arc<dyn Transport>,
    url: Url,
}

impl XsrfTokenProvider {
    pub fn new(transport: Arc<dyn Transport>, url: Url) -> Self {
        Self { transport, url }
    }
}

#[async_trait]
impl AuthProvider for XsrfTokenProvider {
    async fn token(&self) -> Result<AuthToken, AuthError> {
        let body = self.transport.get_json(&self.url).await?;
        let token = body
            .get("referrerToken")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(AuthToken::new)
            .ok_or(AuthError::MissingToken)?;
        debug!("anti-forgery token acquired");
        Ok(token)
    }
}
