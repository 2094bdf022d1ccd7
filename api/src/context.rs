use std::sync::Arc;

use signet_authority::AdminAuthority;
use signet_db::storage::Storage;

use crate::config::ApiConfig;

#[derive(Clone)]
pub struct ApiContext {
    pub config: ApiConfig,
    pub authority: Arc<dyn AdminAuthority>,
    pub store: Arc<dyn Storage>,
}

impl ApiContext {
    pub fn new(
        config: ApiConfig,
        authority: Arc<dyn AdminAuthority>,
        store: Arc<dyn Storage>,
    ) -> Self {
        Self {
            config,
            authority,
            store,
        }
    }
}
