use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use signet_common::error::AdminError;
use signet_common::provisioner::{Provisioner, ProvisionerView};
use signet_db::storage::ProvisionerStore;
use tokio::sync::RwLock;
use tracing::{debug, info};
use ulid::Ulid;

use crate::AdminAuthority;

const DEFAULT_PAGE_SIZE: usize = 20;
const MAX_PAGE_SIZE: usize = 100;

/// The in-process authority. Owns the cached provisioner collection and
/// keeps it in lockstep with the admin store: every mutation writes the
/// store first and the cache second, under the collection write lock, so an
/// operator never observes a provisioner that is cached but not persisted
/// or vice versa.
pub struct Authority {
    authority_id: String,
    store: Arc<dyn ProvisionerStore>,
    collection: RwLock<Collection>,
}

/// Cached views indexed by ID, with a name index ordered for cursor
/// pagination.
#[derive(Default)]
struct Collection {
    by_id: HashMap<String, ProvisionerView>,
    by_name: BTreeMap<String, String>,
}

impl Collection {
    fn insert(&mut self, view: ProvisionerView) {
        self.by_name.insert(view.name.clone(), view.id.clone());
        self.by_id.insert(view.id.clone(), view);
    }

    fn remove(&mut self, id: &str) -> Option<ProvisionerView> {
        let view = self.by_id.remove(id)?;
        self.by_name.remove(&view.name);
        Some(view)
    }
}

impl Authority {
    /// Builds the authority and seeds the cached collection from the store.
    pub async fn load(
        authority_id: String,
        store: Arc<dyn ProvisionerStore>,
    ) -> anyhow::Result<Self> {
        let mut collection = Collection::default();
        for prov in store.list_provisioners().await? {
            collection.insert(ProvisionerView::from(&prov));
        }
        info!(
            authority_id = %authority_id,
            provisioners = collection.by_id.len(),
            "loaded provisioner collection"
        );

        Ok(Self {
            authority_id,
            store,
            collection: RwLock::new(collection),
        })
    }
}

#[async_trait]
impl AdminAuthority for Authority {
    async fn load_provisioner_by_id(&self, id: &str) -> anyhow::Result<ProvisionerView> {
        let collection = self.collection.read().await;
        collection
            .by_id
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("provisioner {id} not found"))
    }

    async fn load_provisioner_by_name(&self, name: &str) -> anyhow::Result<ProvisionerView> {
        let collection = self.collection.read().await;
        collection
            .by_name
            .get(name)
            .and_then(|id| collection.by_id.get(id))
            .cloned()
            .ok_or_else(|| anyhow!("provisioner {name} not found"))
    }

    async fn get_provisioners(
        &self,
        cursor: &str,
        limit: usize,
    ) -> anyhow::Result<(Vec<ProvisionerView>, String)> {
        let limit = match limit {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };

        let collection = self.collection.read().await;
        let mut names = collection.by_name.range(cursor.to_string()..);

        let page: Vec<ProvisionerView> = names
            .by_ref()
            .take(limit)
            .filter_map(|(_, id)| collection.by_id.get(id).cloned())
            .collect();
        let next_cursor = names
            .next()
            .map(|(name, _)| name.clone())
            .unwrap_or_default();

        Ok((page, next_cursor))
    }

    async fn store_provisioner(&self, mut prov: Provisioner) -> anyhow::Result<Provisioner> {
        prov.validate()?;

        let mut collection = self.collection.write().await;
        if collection.by_name.contains_key(&prov.name) {
            return Err(AdminError::bad_request(format!(
                "provisioner with name {} already exists",
                prov.name
            ))
            .into());
        }

        if prov.id.is_empty() {
            prov.id = Ulid::new().to_string();
        }
        if prov.authority_id.is_empty() {
            prov.authority_id = self.authority_id.clone();
        }
        if prov.created_at.is_none() {
            prov.created_at = Some(Utc::now());
        }

        self.store
            .create_provisioner(&prov)
            .await
            .map_err(AdminError::from)?;
        collection.insert(ProvisionerView::from(&prov));

        debug!(id = %prov.id, name = %prov.name, "stored provisioner");
        Ok(prov)
    }

    async fn update_provisioner(&self, prov: Provisioner) -> anyhow::Result<()> {
        prov.validate()?;

        let mut collection = self.collection.write().await;
        let old = collection
            .by_id
            .get(&prov.id)
            .cloned()
            .ok_or_else(|| anyhow!("provisioner {} not found", prov.id))?;

        if prov.name != old.name && collection.by_name.contains_key(&prov.name) {
            return Err(AdminError::bad_request(format!(
                "provisioner with name {} already exists",
                prov.name
            ))
            .into());
        }

        self.store
            .update_provisioner(&prov)
            .await
            .map_err(AdminError::from)?;
        collection.by_name.remove(&old.name);
        collection.insert(ProvisionerView::from(&prov));

        debug!(id = %prov.id, name = %prov.name, "updated provisioner");
        Ok(())
    }

    async fn remove_provisioner(&self, id: &str) -> anyhow::Result<()> {
        let mut collection = self.collection.write().await;
        if !collection.by_id.contains_key(id) {
            return Err(anyhow!("provisioner {id} not found"));
        }

        self.store
            .remove_provisioner(id)
            .await
            .map_err(AdminError::from)?;
        collection.remove(id);

        debug!(id = %id, "removed provisioner");
        Ok(())
    }
}
