use std::sync::Arc;

use axum::{extract::MatchedPath, http::{HeaderName, HeaderValue, Request}, Router};
use signet_authority::Authority;
use signet_db::storage::{MongoDbStorage, ProvisionerStore};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer}, trace::TraceLayer};
use tracing::{info, info_span};
use utoipa::openapi::{Info, License, OpenApi};
use utoipa_axum::{router::OpenApiRouter, routes};

use crate::{config::ApiConfig, context::ApiContext, handlers};

const REQUEST_ID_HEADER: &str = "x-request-id";

fn base_router() -> OpenApiRouter<ApiContext> {
    let openapi = OpenApi::builder()
        .info(
            Info::builder()
                .title("Signet Admin API Reference")
                .version(env!("CARGO_PKG_VERSION"))
                .license(Some(
                    License::builder()
                        .name("Apache 2.0 License")
                        .identifier(Some(env!("CARGO_PKG_LICENSE")))
                        .build(),
                )),
        )
        .build();

    OpenApiRouter::with_openapi(openapi)
        .routes(routes!(handlers::health_check))
        .routes(routes!(
            handlers::provisioners::list_provisioners,
            handlers::provisioners::create_provisioner
        ))
        .routes(routes!(
            handlers::provisioners::get_provisioner,
            handlers::provisioners::update_provisioner,
            handlers::provisioners::delete_provisioner
        ))
}

/// The admin routes bound to a context, without the middleware stack. This
/// is the surface the handler tests drive.
pub(crate) fn router(context: ApiContext) -> (Router, OpenApi) {
    base_router().with_state(context).split_for_parts()
}

/// The OpenAPI document alone, for `--dump-openapi`.
pub fn openapi() -> OpenApi {
    let (_, api) = base_router().split_for_parts();
    api
}

pub async fn make(cfg: ApiConfig) -> anyhow::Result<(Router, OpenApi)> {
    let storage = Arc::new(MongoDbStorage::new(&cfg.db_uri).await?);
    let authority = Authority::load(
        cfg.authority_id.clone(),
        storage.clone() as Arc<dyn ProvisionerStore>,
    )
    .await?;
    let context = ApiContext::new(cfg.clone(), Arc::new(authority), storage);

    info!(authority_id = %cfg.authority_id, "admin API ready");

    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            x_request_id.clone(),
            MakeRequestUuid,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<_>| {
                    let request_id = req.headers().get(REQUEST_ID_HEADER);
                    let span = info_span!(
                        "http_request",
                        method = req.method().to_string(),
                        request_id = Option::<&str>::None,
                        path = Option::<&str>::None,
                    );

                    if let Some(request_id) = request_id {
                        if let Ok(request_id) = request_id.to_str() {
                            span.record("request_id", request_id);
                        }
                    };

                    if let Some(path) = req.extensions().get::<MatchedPath>() {
                        span.record("path", path.as_str())
                    } else {
                        span.record("path", req.uri().path())
                    };

                    span
                }),
        )
        .layer(
            CorsLayer::new()
                .allow_credentials(true)
                .allow_origin(cfg.public_url.parse::<HeaderValue>()?),
        )
        .layer(PropagateRequestIdLayer::new(x_request_id));

    let (router, api) = router(context);
    Ok((router.layer(middleware), api))
}
