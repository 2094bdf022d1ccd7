//! The administrative provisioner endpoints.
//!
//! Every handler resolves identity through the authority's cached view and
//! reads or writes the persistent record through the admin store. Failures
//! surface as problem documents; see [`crate::error`].

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use signet_common::codec::read_record;
use signet_common::error::{AdminError, AdminErrorKind};
use signet_common::params::{parse_cursor, ListQuery, ResolveQuery};
use signet_common::provisioner::{timestamps_match, Provisioner, ProvisionerView};
use signet_common::views::{DeleteResponse, ProvisionerList};

use crate::{context::ApiContext, error::ApiError};


/// Resolves the cached view for a `{name}` route, preferring a non-empty
/// `id` query parameter over the path parameter.
async fn resolve_provisioner(
    ctx: &ApiContext,
    name: &str,
    query: &ResolveQuery,
) -> Result<ProvisionerView, AdminError> {
    match query.id() {
        Some(id) => ctx
            .authority
            .load_provisioner_by_id(id)
            .await
            .map_err(|err| {
                AdminError::wrap_internal(err, format!("error loading provisioner {id}"))
            }),
        None => ctx
            .authority
            .load_provisioner_by_name(name)
            .await
            .map_err(|err| {
                AdminError::wrap_internal(err, format!("error loading provisioner {name}"))
            }),
    }
}

#[utoipa::path(
    get,
    path = "/admin/provisioners/{name}",
    tags = ["provisioners"],
    params(("name" = String, Path, description = "Provisioner name"), ResolveQuery),
    responses(
        (status = 200, description = "The provisioner's persistent record", body = Provisioner),
        (status = 500, description = "Provisioner could not be loaded"),
    )
)]
pub async fn get_provisioner(
    State(ctx): State<ApiContext>,
    Path(name): Path<String>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<Provisioner>, ApiError> {
    let view = resolve_provisioner(&ctx, &name, &query).await?;

    let prov = ctx.store.get_provisioner(&view.id).await.map_err(|err| {
        AdminError::from(err)
            .with_context(format!("error loading provisioner from db '{}'", view.id))
    })?;

    Ok(Json(prov))
}

#[utoipa::path(
    get,
    path = "/admin/provisioners",
    tags = ["provisioners"],
    params(ListQuery),
    responses(
        (status = 200, description = "One page of provisioners", body = ProvisionerList),
        (status = 400, description = "Malformed pagination parameters"),
    )
)]
pub async fn list_provisioners(
    State(ctx): State<ApiContext>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProvisionerList>, ApiError> {
    let (cursor, limit) = parse_cursor(&query).map_err(|err| {
        AdminError::wrap(
            AdminErrorKind::BadRequest,
            err.into(),
            "error parsing cursor and limit from query params",
        )
    })?;

    let (provisioners, next_cursor) = ctx
        .authority
        .get_provisioners(&cursor, limit)
        .await
        .map_err(AdminError::internal_server_error)?;

    Ok(Json(ProvisionerList {
        provisioners,
        next_cursor,
    }))
}

#[utoipa::path(
    post,
    path = "/admin/provisioners",
    tags = ["provisioners"],
    request_body = Provisioner,
    responses(
        (status = 201, description = "Provisioner created", body = Provisioner),
        (status = 500, description = "Provisioner could not be stored"),
    )
)]
pub async fn create_provisioner(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<(StatusCode, Json<Provisioner>), ApiError> {
    let prov: Provisioner = read_record(&body)?;

    let name = prov.name.clone();
    let stored = ctx
        .authority
        .store_provisioner(prov)
        .await
        .map_err(|err| AdminError::wrap_internal(err, format!("error storing provisioner {name}")))?;

    Ok((StatusCode::CREATED, Json(stored)))
}

#[utoipa::path(
    method(put, post),
    path = "/admin/provisioners/{name}",
    tags = ["provisioners"],
    params(("name" = String, Path, description = "Current provisioner name")),
    request_body = Provisioner,
    responses(
        (status = 200, description = "Provisioner updated", body = Provisioner),
        (status = 500, description = "Immutable field changed or update failed"),
    )
)]
pub async fn update_provisioner(
    State(ctx): State<ApiContext>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Provisioner>, ApiError> {
    let nu: Provisioner = read_record(&body)?;

    let view = ctx
        .authority
        .load_provisioner_by_name(&name)
        .await
        .map_err(|err| {
            AdminError::wrap_internal(
                err,
                format!("error loading provisioner from cached configuration '{name}'"),
            )
        })?;

    let old = ctx.store.get_provisioner(&view.id).await.map_err(|err| {
        AdminError::from(err)
            .with_context(format!("error loading provisioner from db '{}'", view.id))
    })?;

    check_immutable_fields(&nu, &old)?;

    ctx.authority
        .update_provisioner(nu.clone())
        .await
        .map_err(AdminError::from_cause)?;

    Ok(Json(nu))
}

/// The proposed record is the new full state, but identity and lifecycle
/// fields must survive it unchanged. Checked in order; the first violation
/// wins, and no mutating call is made after a violation.
fn check_immutable_fields(nu: &Provisioner, old: &Provisioner) -> Result<(), AdminError> {
    if nu.id != old.id {
        return Err(AdminError::server_internal("cannot change provisioner ID"));
    }
    if nu.typ != old.typ {
        return Err(AdminError::server_internal("cannot change provisioner type"));
    }
    if nu.authority_id != old.authority_id {
        return Err(AdminError::server_internal(
            "cannot change provisioner authorityID",
        ));
    }
    if !timestamps_match(nu.created_at, old.created_at) {
        return Err(AdminError::server_internal(
            "cannot change provisioner createdAt",
        ));
    }
    if !timestamps_match(nu.deleted_at, old.deleted_at) {
        return Err(AdminError::server_internal(
            "cannot change provisioner deletedAt",
        ));
    }
    Ok(())
}

#[utoipa::path(
    delete,
    path = "/admin/provisioners/{name}",
    tags = ["provisioners"],
    params(("name" = String, Path, description = "Provisioner name"), ResolveQuery),
    responses(
        (status = 200, description = "Provisioner removed", body = DeleteResponse),
        (status = 500, description = "Provisioner could not be removed"),
    )
)]
pub async fn delete_provisioner(
    State(ctx): State<ApiContext>,
    Path(name): Path<String>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let view = resolve_provisioner(&ctx, &name, &query).await?;

    ctx.authority
        .remove_provisioner(&view.id)
        .await
        .map_err(|err| {
            AdminError::wrap_internal(err, format!("error removing provisioner {}", view.name))
        })?;

    Ok(Json(DeleteResponse::ok()))
}
