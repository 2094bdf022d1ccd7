//! Response bodies for the admin endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::provisioner::ProvisionerView;

/// One page of the List operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionerList {
    pub provisioners: Vec<ProvisionerView>,

    /// Continuation token for the next page; empty signals end-of-stream.
    pub next_cursor: String,
}

/// Body of a successful Delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub status: String,
}

impl DeleteResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".into(),
        }
    }
}
