use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::item::{CatalogEntry, GrantEntry, ItemId, VisibleItem};
use crate::merger::merge;

/// Session-scoped copies of both sources. All mutation goes through here and
/// is purely local.
#[derive(Debug, Clone, Default)]
pub struct GrantStore {
    catalog: Vec<CatalogEntry>,
    grants: Vec<GrantEntry>,
}

impl GrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces both collections wholesale.
    pub fn seed(&mut self, catalog: Vec<CatalogEntry>, grants: Vec<GrantEntry>) {
        debug!(catalog = catalog.len(), grants = grants.len(), "store seeded");
        self.catalog = catalog;
        self.grants = grants;
    }

    /// Drops every grant keyed `item_id` and returns the remaining grants.
    pub fn remove_grant(&mut self, item_id: &ItemId) -> Vec<GrantEntry> {
        let before = self.grants.len();
        self.grants.retain(|grant| &grant.item_id != item_id);
        if self.grants.len() == before {
            debug!(%item_id, "no grant to remove");
        }
        self.grants.clone()
    }

    pub fn visible_items(&self) -> Vec<VisibleItem> {
        merge(&self.catalog, &self.grants)
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn grants(&self) -> &[GrantEntry] {
        &self.grants
    }
}

pub type SharedStore = Arc<RwLock<GrantStore>>;

pub fn shared_store(initial: GrantStore) -> SharedStore {
    Arc::new(RwLock::new(initial))
}
