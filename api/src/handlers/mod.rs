use axum::extract::State;
use signet_common::error::AdminError;

use crate::{context::ApiContext, error::ApiError};

pub mod provisioners;

#[utoipa::path(
    get,
    path = "/healthz",
    tags = ["health"],
    responses((status = 200, description = "Service is healthy"))
)]
pub async fn health_check(State(ctx): State<ApiContext>) -> Result<&'static str, ApiError> {
    ctx.store.ping().await.map_err(AdminError::from)?;
    Ok("Healthy")
}
