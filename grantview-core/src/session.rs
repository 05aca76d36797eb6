use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::auth::AuthProvider;
use crate::config::{SourceRefs, WidgetConfig};
use crate::error::ConfigError;
use crate::fetcher::fetch_sources;
use crate::mutator::{Mutator, PersistReport, ReportSink};
use crate::presenter::{present, ConsumeHandle, ConsumeRequest, Presenter};
use crate::store::{shared_store, GrantStore, SharedStore};
use crate::transport::Transport;

/// One widget lifetime: load both sources, present the intersection, then
/// serve consume actions until stopped.
pub struct WidgetSession {
    config: WidgetConfig,
    store: SharedStore,
    transport: Arc<dyn Transport>,
    auth: Arc<dyn AuthProvider>,
    presenter: Arc<dyn Presenter>,
    reports: Option<ReportSink>,
}

impl WidgetSession {
    pub fn new(
        config: WidgetConfig,
        transport: Arc<dyn Transport>,
        auth: Arc<dyn AuthProvider>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            config,
            store: shared_store(GrantStore::new()),
            transport,
            auth,
            presenter,
            reports: None,
        }
    }

    pub fn with_report_sink(mut self, sink: ReportSink) -> Self {
        self.reports = Some(sink);
        self
    }

    pub fn store(&self) -> SharedStore {
        self.store.clone()
    }

    /// Seeds the store and performs the first render. When the widget is not
    /// configured nothing is fetched and the empty state is rendered.
    pub async fn load(&self, on_consume: &ConsumeHandle) -> Result<SourceRefs, ConfigError> {
        let refs = match self.config.source_refs() {
            Ok(refs) => refs,
            Err(e) => {
                error!(error = %e, "widget not configured");
                self.presenter.render_empty();
                return Err(e);
            }
        };

        let sources = fetch_sources(self.transport.as_ref(), &refs).await;
        let mut store = self.store.write().await;
        store.seed(sources.catalog, sources.grants);
        let visible = store.visible_items();
        present(self.presenter.as_ref(), &visible, on_consume);
        info!(visible = visible.len(), "widget loaded");
        Ok(refs)
    }

    async fn serve(
        self,
        on_consume: ConsumeHandle,
        mut requests: mpsc::UnboundedReceiver<ConsumeRequest>,
        mut cancel_rx: broadcast::Receiver<()>,
    ) {
        let refs = match self.load(&on_consume).await {
            Ok(refs) => refs,
            Err(_) => return,
        };

        let mutator = Mutator::new(
            self.store.clone(),
            self.transport.clone(),
            self.auth.clone(),
            self.presenter.clone(),
            &on_consume,
            refs.user,
        )
        .with_report_sink(self.reports.clone());
        // From here on only the presenter's clones keep the queue open.
        drop(on_consume);

        let mut in_flight: Vec<JoinHandle<PersistReport>> = Vec::new();
        loop {
            tokio::select! {
                _ = cancel_rx.recv() => {
                    info!("widget session shutdown requested");
                    break;
                }
                request = requests.recv() => {
                    let Some(ConsumeRequest { item_id, url }) = request else {
                        info!("all consume handles dropped, ending session");
                        break;
                    };
                    in_flight.retain(|task| !task.is_finished());
                    in_flight.push(mutator.consume(&item_id, &url).await);
                }
            }
        }

        drain(in_flight, self.config.shutdown_grace()).await;
    }
}

/// Waits up to `grace` for pending writes. Results still go to the report
/// sink; nothing is retried.
async fn drain(in_flight: Vec<JoinHandle<PersistReport>>, grace: Duration) {
    let pending: Vec<_> = in_flight
        .into_iter()
        .filter(|task| !task.is_finished())
        .collect();
    if pending.is_empty() {
        return;
    }

    info!(pending = pending.len(), "waiting for in-flight writes");
    let settle = async {
        for task in pending {
            let _ = task.await;
        }
    };
    if tokio::time::timeout(grace, settle).await.is_err() {
        warn!(?grace, "writes still pending at shutdown, abandoning them");
    }
}

pub struct SessionHandle {
    cancel_tx: broadcast::Sender<()>,
    join: JoinHandle<()>,
}

impl SessionHandle {
    /// Stops serving new actions and waits, up to the configured grace
    /// period, for writes already in flight.
    pub async fn stop(self) -> Result<(), tokio::task::JoinError> {
        let _ = self.cancel_tx.send(());
        self.join.await
    }

    /// Waits for the session to end on its own, which happens once every
    /// consume handle has been dropped.
    pub async fn wait(self) -> Result<(), tokio::task::JoinError> {
        self.join.await
    }
}

pub fn spawn_session(session: WidgetSession) -> SessionHandle {
    let (cancel_tx, cancel_rx) = broadcast::channel(1);
    let (on_consume, requests) = ConsumeHandle::channel();
    let join = tokio::spawn(session.serve(on_consume, requests, cancel_rx));
    SessionHandle { cancel_tx, join }
}
