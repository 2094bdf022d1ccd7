use async_trait::async_trait;
use signet_common::error::AdminError;
use signet_common::provisioner::Provisioner;
use thiserror::Error;

pub mod memory;
pub mod mongodb;

pub use memory::MemoryStorage;
pub use mongodb::MongoDbStorage;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("provisioner {0} not found")]
    NotFound(String),

    #[error("Query Error: {0}")]
    MongoDB(#[from] ::mongodb::error::Error),

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AdminError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Admin(admin) => admin,
            // A store miss is a server-side inconsistency here, never a
            // client-facing 404: the record was resolved through the cached
            // view first. Left opaque so call sites attach their context
            // and surface it as serverInternal.
            other => AdminError::from_cause(other.into()),
        }
    }
}

/// The persistent side of the provisioner collection. Handlers consume only
/// [`ProvisionerStore::get_provisioner`]; the remaining operations are the
/// authority's write path and its startup cache seed.
#[async_trait]
pub trait ProvisionerStore: Send + Sync {
    async fn get_provisioner(&self, id: &str) -> Result<Provisioner, StoreError>;
    async fn list_provisioners(&self) -> Result<Vec<Provisioner>, StoreError>;
    async fn create_provisioner(&self, prov: &Provisioner) -> Result<(), StoreError>;
    async fn update_provisioner(&self, prov: &Provisioner) -> Result<(), StoreError>;
    async fn remove_provisioner(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait Storage: ProvisionerStore + Send + Sync + 'static {
    async fn ping(&self) -> Result<(), StoreError>;
}
