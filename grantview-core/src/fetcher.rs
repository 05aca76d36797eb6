use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::codec::decode;
use crate::config::{SourceRefs, WidgetConfig};
use crate::error::ConfigError;
use crate::item::{CatalogEntry, GrantEntry};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq)]
pub struct Sources {
    pub catalog: Vec<CatalogEntry>,
    pub grants: Vec<GrantEntry>,
}

/// Resolves the endpoints and fetches both sources. An unconfigured widget
/// returns the config error without any network access.
pub async fn fetch(transport: &dyn Transport, config: &WidgetConfig) -> Result<Sources, ConfigError> {
    let refs = config.source_refs()?;
    Ok(fetch_sources(transport, &refs).await)
}

/// Fetches both sources concurrently. A source that cannot be retrieved or
/// decoded contributes no entries; the other is unaffected.
pub async fn fetch_sources(transport: &dyn Transport, refs: &SourceRefs) -> Sources {
    let (catalog, grants) = tokio::join!(
        fetch_source::<CatalogEntry>(transport, &refs.general),
        fetch_source::<GrantEntry>(transport, &refs.user),
    );
    Sources { catalog, grants }
}

async fn fetch_source<T: DeserializeOwned>(transport: &dyn Transport, url: &Url) -> Vec<T> {
    match transport.get_json(url).await {
        Ok(raw) => {
            let entries: Vec<T> = decode(&raw);
            debug!(%url, count = entries.len(), "source decoded");
            entries
        }
        Err(err) => {
            warn!(%url, error = %err, "source unavailable, treating as empty");
            Vec::new()
        }
    }
}
