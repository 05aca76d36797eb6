mod app;

use std::sync::Arc;

use eframe::{egui, NativeOptions};
use grantview_core::{
    spawn_session, AuthProvider, HttpTransport, Transport, WidgetConfig, WidgetSession,
    XsrfTokenProvider,
};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::app::{GuiPresenter, WidgetApp};

fn main() -> eframe::Result<()> {
    init_tracing();

    let runtime = Arc::new(Runtime::new().expect("failed to initialise Tokio runtime"));
    let config = WidgetConfig::load();
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::from_config(&config).expect("failed to build HTTP client"));
    let token_url = match config.token_url() {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "widget not configured, nothing to show");
            return Ok(());
        }
    };
    let auth: Arc<dyn AuthProvider> = Arc::new(XsrfTokenProvider::new(transport.clone(), token_url));
    let (view_tx, view_rx) = mpsc::unbounded_channel();

    eframe::run_native(
        "GrantView",
        NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([420.0, 360.0])
                .with_min_inner_size([280.0, 160.0]),
            ..Default::default()
        },
        Box::new(move |cc| {
            let presenter = GuiPresenter::new(view_tx, cc.egui_ctx.clone());
            let session = WidgetSession::new(config, transport, auth, Arc::new(presenter));
            let handle = {
                let _guard = runtime.enter();
                spawn_session(session)
            };
            Box::new(WidgetApp::new(runtime, handle, view_rx))
        }),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
