use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use url::Url;

use crate::auth::AuthProvider;
use crate::codec::encode;
use crate::error::{CodecError, PersistError};
use crate::item::ItemId;
use crate::presenter::{present, ConsumeHandle, Presenter, WeakConsumeHandle};
use crate::store::SharedStore;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub enum PersistOutcome {
    Persisted { remaining: usize },
    Failed(Arc<PersistError>),
}

#[derive(Debug, Clone)]
pub struct PersistReport {
    pub item_id: ItemId,
    pub outcome: PersistOutcome,
    pub finished_at: DateTime<Utc>,
}

impl PersistReport {
    pub fn is_persisted(&self) -> bool {
        matches!(self.outcome, PersistOutcome::Persisted { .. })
    }
}

pub type ReportSink = mpsc::UnboundedSender<PersistReport>;

/// Applies consume actions: optimistic local removal and re-render first,
/// then a detached write of the grant collection. A failed write is reported
/// and left as is; the local removal stands.
pub struct Mutator {
    store: SharedStore,
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthProvider>,
    presenter: Arc<dyn Presenter>,
    on_consume: WeakConsumeHandle,
    grants_url: Url,
    reports: Option<ReportSink>,
}

impl Mutator {
    pub fn new(
        store: SharedStore,
        transport: Arc<dyn Transport>,
        auth: Arc<dyn AuthProvider>,
        presenter: Arc<dyn Presenter>,
        on_consume: &ConsumeHandle,
        grants_url: Url,
    ) -> Self {
        Self {
            store,
            transport,
            auth,
            presenter,
            on_consume: on_consume.downgrade(),
            grants_url,
            reports: None,
        }
    }

    pub fn with_report_sink(mut self, sink: Option<ReportSink>) -> Self {
        self.reports = sink;
        self
    }

    /// Removes the grant, re-renders and opens the item before any network
    /// work. The returned handle resolves once the write has settled.
    pub async fn consume(&self, item_id: &ItemId, url: &str) -> JoinHandle<PersistReport> {
        {
            let mut store = self.store.write().await;
            let remaining = store.remove_grant(item_id);
            let visible = store.visible_items();
            match self.on_consume.upgrade() {
                Some(on_consume) => present(self.presenter.as_ref(), &visible, &on_consume),
                None if visible.is_empty() => self.presenter.render_empty(),
                None => debug!("no consume handle left, skipping render"),
            }
            debug!(%item_id, grants = remaining.len(), visible = visible.len(), "grant removed locally");
        }

        let task = self.spawn_persist(item_id.clone());
        self.presenter.open_item(item_id, url);
        task
    }

    fn spawn_persist(&self, item_id: ItemId) -> JoinHandle<PersistReport> {
        let store = self.store.clone();
        let transport = self.transport.clone();
        let auth = self.auth.clone();
        let url = self.grants_url.clone();
        let reports = self.reports.clone();

        tokio::spawn(async move {
            let outcome =
                match persist_grants(&store, transport.as_ref(), auth.as_ref(), &url).await {
                    Ok(remaining) => PersistOutcome::Persisted { remaining },
                    Err(e) => PersistOutcome::Failed(Arc::new(e)),
                };
            let report = PersistReport {
                item_id,
                outcome,
                finished_at: Utc::now(),
            };

            match &report.outcome {
                PersistOutcome::Persisted { remaining } => {
                    info!(item_id = %report.item_id, remaining, "grant removal persisted")
                }
                PersistOutcome::Failed(err) => {
                    error!(item_id = %report.item_id, error = %err, "grant removal not persisted")
                }
            }
            if let Some(sink) = reports {
                let _ = sink.send(report.clone());
            }
            report
        })
    }
}

/// The snapshot is taken after the token arrives and so includes every
/// removal applied up to that point.
async fn persist_grants(
    store: &SharedStore,
    transport: &dyn Transport,
    auth: &dyn AuthProvider,
    url: &Url,
) -> Result<usize, PersistError> {
    let token = auth.token().await?;
    let grants = store.read().await.grants().to_vec();
    let envelope = encode(&grants)?;
    let body = serde_json::to_value(&envelope).map_err(CodecError::from)?;
    transport.put_json(url, &token, &body).await?;
    Ok(grants.len())
}
