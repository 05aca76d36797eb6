use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::error::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WidgetConfig {
    pub base_url: String,
    pub api_version: String,
    pub org_unit_id: Option<String>,
    pub widget_id: Option<String>,
    pub token_path: String,
    pub token_header: String,
    pub access_token: Option<String>,
    pub request_timeout_seconds: u64,
    pub shutdown_grace_seconds: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_owned(),
            api_version: "1.46".to_owned(),
            org_unit_id: None,
            widget_id: None,
            token_path: "/d2l/lp/auth/xsrf-tokens".to_owned(),
            token_header: "X-Csrf-Token".to_owned(),
            access_token: None,
            request_timeout_seconds: 10,
            shutdown_grace_seconds: 10,
        }
    }
}

/// Resolved endpoints for one widget session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRefs {
    pub general: Url,
    pub user: Url,
}

impl WidgetConfig {
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("grantview").join("config.json"))
    }

    /// Loads the platform config file, falling back to defaults, then applies
    /// `GRANTVIEW_*` environment overrides.
    pub fn load() -> Self {
        match Self::config_file_path() {
            Ok(path) => Self::load_from(&path, |key| std::env::var(key).ok()),
            Err(e) => {
                warn!(error = %e, "using default widget config");
                let mut config = Self::default();
                config.apply_env(|key| std::env::var(key).ok());
                config
            }
        }
    }

    /// Reads `path`, or uses defaults when it is missing or malformed, then
    /// applies overrides from `lookup`.
    pub fn load_from(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "using default widget config");
                Self::default()
            }
        };
        config.apply_env(lookup);
        config
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("GRANTVIEW_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("GRANTVIEW_ORG_UNIT_ID") {
            self.org_unit_id = Some(v);
        }
        if let Some(v) = lookup("GRANTVIEW_WIDGET_ID") {
            self.widget_id = Some(v);
        }
        if let Some(v) = lookup("GRANTVIEW_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// How long a stopping session waits for in-flight writes.
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }

    /// Both source endpoints. Fails without touching the network when either
    /// identifier is missing or blank.
    pub fn source_refs(&self) -> Result<SourceRefs, ConfigError> {
        let org_unit = required(&self.org_unit_id, "org_unit_id")?;
        let widget = required(&self.widget_id, "widget_id")?;

        let base = Url::parse(&self.base_url)?;
        let general = base.join(&format!(
            "/d2l/api/lp/{}/{}/widgetdata/{}",
            self.api_version, org_unit, widget
        ))?;
        let user = base.join(&format!(
            "/d2l/api/lp/{}/{}/widgetdata/{}/mydata",
            self.api_version, org_unit, widget
        ))?;
        Ok(SourceRefs { general, user })
    }

    pub fn token_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.base_url)?.join(&self.token_path)?)
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, ConfigError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingIdentifier(name)),
    }
}
