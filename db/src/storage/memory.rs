//! In-memory provisioner store.
//!
//! Backs development setups and tests. Data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use signet_common::provisioner::Provisioner;
use tokio::sync::RwLock;

use crate::storage::{ProvisionerStore, Storage, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    provisioners: RwLock<HashMap<String, Provisioner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl ProvisionerStore for MemoryStorage {
    async fn get_provisioner(&self, id: &str) -> Result<Provisioner, StoreError> {
        let provisioners = self.provisioners.read().await;
        provisioners
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn list_provisioners(&self) -> Result<Vec<Provisioner>, StoreError> {
        let provisioners = self.provisioners.read().await;
        Ok(provisioners.values().cloned().collect())
    }

    async fn create_provisioner(&self, prov: &Provisioner) -> Result<(), StoreError> {
        let mut provisioners = self.provisioners.write().await;
        if provisioners.contains_key(&prov.id) {
            return Err(anyhow::anyhow!("provisioner {} already exists", prov.id).into());
        }
        provisioners.insert(prov.id.clone(), prov.clone());
        Ok(())
    }

    async fn update_provisioner(&self, prov: &Provisioner) -> Result<(), StoreError> {
        let mut provisioners = self.provisioners.write().await;
        match provisioners.get_mut(&prov.id) {
            Some(existing) => {
                *existing = prov.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(prov.id.clone())),
        }
    }

    async fn remove_provisioner(&self, id: &str) -> Result<(), StoreError> {
        let mut provisioners = self.provisioners.write().await;
        provisioners
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}
