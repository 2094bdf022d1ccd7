use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use signet_common::provisioner::Provisioner;
use tracing::instrument;

use crate::storage::{ProvisionerStore, Storage, StoreError};

pub const MONGODB_COLLECTION_PROVISIONERS: &str = "provisioners";

#[derive(Debug)]
pub struct MongoDbStorage(Client);

impl MongoDbStorage {
    pub async fn new(uri: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_opts = ClientOptions::parse(uri).await?;
        if client_opts.app_name.is_none() {
            client_opts.app_name = Some("Signet".to_string());
        }
        if client_opts.connect_timeout.is_none() {
            client_opts.connect_timeout = Some(Duration::from_secs(3));
        }
        if client_opts.server_selection_timeout.is_none() {
            client_opts.server_selection_timeout = Some(Duration::from_secs(3));
        }

        let client = Client::with_options(client_opts)?;

        let storage = Self(client);

        storage.init().await?;

        Ok(storage)
    }

    fn get_db(&self) -> Database {
        self.0
            .default_database()
            .unwrap_or_else(|| self.0.database("signet"))
    }

    fn provisioners(&self) -> Collection<Provisioner> {
        self.get_db().collection(MONGODB_COLLECTION_PROVISIONERS)
    }

    async fn init(&self) -> Result<(), mongodb::error::Error> {
        let collection = self
            .get_db()
            .collection::<()>(MONGODB_COLLECTION_PROVISIONERS);

        for key in ["id", "name"] {
            collection
                .create_index(
                    IndexModel::builder()
                        .keys(doc! { key: 1 })
                        .options(IndexOptions::builder().unique(true).build())
                        .build(),
                )
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Storage for MongoDbStorage {
    #[instrument(level = "debug", skip(self), err(Debug))]
    async fn ping(&self) -> Result<(), StoreError> {
        self.0
            .database("admin")
            .run_command(doc! {"ping": 1})
            .await?;

        Ok(())
    }
}

#[async_trait]
impl ProvisionerStore for MongoDbStorage {
    #[instrument(skip(self), err(Debug))]
    async fn get_provisioner(&self, id: &str) -> Result<Provisioner, StoreError> {
        self.provisioners()
            .find_one(doc! { "id": id })
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    #[instrument(skip(self), err(Debug))]
    async fn list_provisioners(&self) -> Result<Vec<Provisioner>, StoreError> {
        self.provisioners()
            .find(doc! {})
            .await?
            .try_collect()
            .await
            .map_err(StoreError::MongoDB)
    }

    #[instrument(skip(self, prov), fields(id = %prov.id, name = %prov.name), err(Debug))]
    async fn create_provisioner(&self, prov: &Provisioner) -> Result<(), StoreError> {
        self.provisioners().insert_one(prov).await?;
        Ok(())
    }

    #[instrument(skip(self, prov), fields(id = %prov.id, name = %prov.name), err(Debug))]
    async fn update_provisioner(&self, prov: &Provisioner) -> Result<(), StoreError> {
        let result = self
            .provisioners()
            .replace_one(doc! { "id": &prov.id }, prov)
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound(prov.id.clone()));
        }
        Ok(())
    }

    #[instrument(skip(self), err(Debug))]
    async fn remove_provisioner(&self, id: &str) -> Result<(), StoreError> {
        let result = self
            .provisioners()
            .delete_one(doc! { "id": id })
            .await?;

        if result.deleted_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
