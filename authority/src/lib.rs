//! The certificate authority's administrative surface.
//!
//! [`AdminAuthority`] is the narrow capability set the admin handlers
//! consume; [`Authority`] is the in-process implementation that owns the
//! cached provisioner collection and delegates persistence to the admin
//! store.

use async_trait::async_trait;
use signet_common::provisioner::{Provisioner, ProvisionerView};

mod authority;

pub use authority::Authority;

/// Capabilities the admin handlers require from the authority.
#[async_trait]
pub trait AdminAuthority: Send + Sync + 'static {
    /// Resolves a cached view by provisioner ID.
    async fn load_provisioner_by_id(&self, id: &str) -> anyhow::Result<ProvisionerView>;

    /// Resolves a cached view by provisioner name.
    async fn load_provisioner_by_name(&self, name: &str) -> anyhow::Result<ProvisionerView>;

    /// One page of cached views plus the continuation cursor; an empty
    /// cursor signals end-of-stream.
    async fn get_provisioners(
        &self,
        cursor: &str,
        limit: usize,
    ) -> anyhow::Result<(Vec<ProvisionerView>, String)>;

    /// Persists and caches a new provisioner, returning the stored record
    /// with authority-assigned fields filled in.
    async fn store_provisioner(&self, prov: Provisioner) -> anyhow::Result<Provisioner>;

    /// Replaces an existing provisioner's record and cached view.
    async fn update_provisioner(&self, prov: Provisioner) -> anyhow::Result<()>;

    /// Removes the provisioner with the given ID from the store and the
    /// cache.
    async fn remove_provisioner(&self, id: &str) -> anyhow::Result<()>;
}
