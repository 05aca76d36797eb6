use tokio::sync::mpsc;
use tracing::warn;

use crate::item::{ItemId, VisibleItem};

/// Rendering surface driven by the session.
pub trait Presenter: Send + Sync {
    /// Shows a non-empty visible set. Each item's action goes through `on_consume`.
    fn render(&self, items: &[VisibleItem], on_consume: &ConsumeHandle);

    /// The visible set is empty: the host surface should collapse entirely.
    fn render_empty(&self);

    /// Opens a consumed item. Called whether or not its removal is persisted.
    fn open_item(&self, item_id: &ItemId, url: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumeRequest {
    pub item_id: ItemId,
    pub url: String,
}

/// Queues consume actions for the session. Requests are handled one at a time
/// in the order they were sent.
#[derive(Debug, Clone)]
pub struct ConsumeHandle {
    tx: mpsc::UnboundedSender<ConsumeRequest>,
}

impl ConsumeHandle {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ConsumeRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn downgrade(&self) -> WeakConsumeHandle {
        WeakConsumeHandle {
            tx: self.tx.downgrade(),
        }
    }

    /// Returns `false` once the session has stopped.
    pub fn consume(&self, item_id: ItemId, url: impl Into<String>) -> bool {
        let request = ConsumeRequest {
            item_id,
            url: url.into(),
        };
        if self.tx.send(request).is_err() {
            warn!("consume request dropped, session stopped");
            return false;
        }
        true
    }
}

/// Does not keep the request queue open. The session holds one of these so it
/// ends once the presenter has dropped every [`ConsumeHandle`].
#[derive(Debug, Clone)]
pub struct WeakConsumeHandle {
    tx: mpsc::WeakUnboundedSender<ConsumeRequest>,
}

impl WeakConsumeHandle {
    pub fn upgrade(&self) -> Option<ConsumeHandle> {
        self.tx.upgrade().map(|tx| ConsumeHandle { tx })
    }
}

pub fn present(presenter: &dyn Presenter, items: &[VisibleItem], on_consume: &ConsumeHandle) {
    if items.is_empty() {
        presenter.render_empty();
    } else {
        presenter.render(items, on_consume);
    }
}
