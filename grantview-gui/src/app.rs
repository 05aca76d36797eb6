use std::sync::Arc;

use eframe::egui;
use grantview_core::{ConsumeHandle, ItemId, Presenter, SessionHandle, VisibleItem};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub enum ViewEvent {
    Items(Vec<VisibleItem>, ConsumeHandle),
    Empty,
    Open(ItemId, String),
}

/// Forwards session renders to the UI thread and wakes it up.
pub struct GuiPresenter {
    tx: mpsc::UnboundedSender<ViewEvent>,
    ctx: egui::Context,
}

impl GuiPresenter {
    pub fn new(tx: mpsc::UnboundedSender<ViewEvent>, ctx: egui::Context) -> Self {
        Self { tx, ctx }
    }

    fn send(&self, event: ViewEvent) {
        if self.tx.send(event).is_err() {
            warn!("view receiver dropped");
        }
        self.ctx.request_repaint();
    }
}

impl Presenter for GuiPresenter {
    fn render(&self, items: &[VisibleItem], on_consume: &ConsumeHandle) {
        self.send(ViewEvent::Items(items.to_vec(), on_consume.clone()));
    }

    fn render_empty(&self) {
        self.send(ViewEvent::Empty);
    }

    fn open_item(&self, item_id: &ItemId, url: &str) {
        self.send(ViewEvent::Open(item_id.clone(), url.to_owned()));
    }
}

enum ViewState {
    Loading,
    Items {
        items: Vec<VisibleItem>,
        on_consume: ConsumeHandle,
    },
    Collapsed,
}

pub struct WidgetApp {
    runtime: Arc<Runtime>,
    session: Option<SessionHandle>,
    updates: mpsc::UnboundedReceiver<ViewEvent>,
    view: ViewState,
}

impl WidgetApp {
    pub fn new(
        runtime: Arc<Runtime>,
        session: SessionHandle,
        updates: mpsc::UnboundedReceiver<ViewEvent>,
    ) -> Self {
        Self {
            runtime,
            session: Some(session),
            updates,
            view: ViewState::Loading,
        }
    }

    fn refresh_updates(&mut self) {
        while let Ok(evt) = self.updates.try_recv() {
            match evt {
                ViewEvent::Items(items, on_consume) => {
                    self.view = ViewState::Items { items, on_consume };
                }
                ViewEvent::Empty => {
                    info!("nothing to show, closing widget");
                    self.view = ViewState::Collapsed;
                }
                // Opened here rather than on a runtime worker.
                ViewEvent::Open(item_id, url) => {
                    if let Err(e) = webbrowser::open(&url) {
                        warn!(%item_id, error = %e, "failed to open item in browser");
                    }
                }
            }
        }
    }

    fn draw_items(ui: &mut egui::Ui, items: &[VisibleItem], on_consume: &ConsumeHandle) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for item in items {
                    ui.horizontal_wrapped(|ui| {
                        let title = egui::RichText::new(&item.name).strong();
                        if ui.link(title).on_hover_text(item.url.as_str()).clicked() {
                            on_consume.consume(item.item_id.clone(), item.url.clone());
                        }
                        if !item.description.is_empty() {
                            ui.label(format!(": {}", item.description));
                        }
                        if let Some(end) = &item.end_date {
                            ui.weak(format!("(until {end})"));
                        }
                    });
                    ui.add_space(4.0);
                }
            });
    }
}

impl Drop for WidgetApp {
    fn drop(&mut self) {
        if let Some(handle) = self.session.take() {
            let _ = self.runtime.block_on(handle.stop());
        }
    }
}

impl eframe::App for WidgetApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh_updates();

        match &self.view {
            ViewState::Loading => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                });
            }
            ViewState::Items { items, on_consume } => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    Self::draw_items(ui, items, on_consume);
                });
            }
            ViewState::Collapsed => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }
}
