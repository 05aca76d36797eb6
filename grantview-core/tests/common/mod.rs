#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use grantview_core::{
    AuthProvider, ConsumeHandle, HttpTransport, ItemId, Presenter, Transport, VisibleItem,
    WidgetConfig, XsrfTokenProvider,
};
use reqwest::Client;
use serde_json::{json, Value};

pub const GENERAL_PATH: &str = "/d2l/api/lp/1.46/6606/widgetdata/590";
pub const USER_PATH: &str = "/d2l/api/lp/1.46/6606/widgetdata/590/mydata";
pub const TOKEN_PATH: &str = "/d2l/lp/auth/xsrf-tokens";

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Items(Vec<VisibleItem>),
    Empty,
    Opened(ItemId, String),
}

#[derive(Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<Rendered>>,
    handle: Mutex<Option<ConsumeHandle>>,
    forgetful: bool,
}

impl RecordingPresenter {
    /// Records renders but never keeps the consume handle it is given.
    pub fn forgetful() -> Self {
        Self {
            forgetful: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Rendered> {
        self.events.lock().unwrap().clone()
    }

    pub fn handle(&self) -> Option<ConsumeHandle> {
        self.handle.lock().unwrap().clone()
    }

    pub async fn wait_for_events(&self, count: usize) -> Vec<Rendered> {
        for _ in 0..200 {
            let events = self.events();
            if events.len() >= count {
                return events;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("presenter saw {:?}, wanted {count} events", self.events());
    }
}

impl Presenter for RecordingPresenter {
    fn render(&self, items: &[VisibleItem], on_consume: &ConsumeHandle) {
        self.events.lock().unwrap().push(Rendered::Items(items.to_vec()));
        if !self.forgetful {
            *self.handle.lock().unwrap() = Some(on_consume.clone());
        }
    }

    fn render_empty(&self) {
        self.events.lock().unwrap().push(Rendered::Empty);
    }

    fn open_item(&self, item_id: &ItemId, url: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Rendered::Opened(item_id.clone(), url.to_owned()));
    }
}

/// Wraps entries the way the widget data endpoints do.
pub fn wrapped(items: Value) -> Value {
    json!({ "Data": json!({ "Items": items }).to_string() })
}

pub fn config_for(base_url: &str) -> WidgetConfig {
    WidgetConfig {
        base_url: base_url.to_owned(),
        org_unit_id: Some("6606".into()),
        widget_id: Some("590".into()),
        ..WidgetConfig::default()
    }
}

pub fn http_stack(config: &WidgetConfig) -> (Arc<dyn Transport>, Arc<dyn AuthProvider>) {
    let transport: Arc<dyn Transport> =
        Arc::new(HttpTransport::new(Client::new(), config.token_header.clone()));
    let auth: Arc<dyn AuthProvider> = Arc::new(XsrfTokenProvider::new(
        transport.clone(),
        config.token_url().unwrap(),
    ));
    (transport, auth)
}

pub fn item(id: i64, name: &str, url: &str) -> VisibleItem {
    VisibleItem {
        item_id: ItemId::from(id),
        name: name.to_owned(),
        description: String::new(),
        url: url.to_owned(),
        start_date: None,
        end_date: None,
        survey_type: None,
    }
}
