use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::info;

use rolegrid_application::{
    CreateRoleInput, ROLE_INDEX_REDIRECT, RoleListQuery, UpdateRoleInput,
};
use rolegrid_core::AppError;
use rolegrid_domain::RoleId;

use crate::dto::{
    DeleteRolesRequest, RoleFormResponse, RoleListParams, RoleMutationResponse,
    RolePageResponse, RolePermissionsSyncedResponse, RoleResponse, RolesDeletedResponse,
    SaveRoleRequest, SyncRolePermissionsRequest, parse_menu_ids,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[cfg(test)]
mod tests;

const SUCCESS_MESSAGE: &str = "Operation succeeded";

pub async fn list_roles_handler(
    State(state): State<AppState>,
    Query(params): Query<RoleListParams>,
) -> ApiResult<Json<RolePageResponse>> {
    let query = RoleListQuery::new(params.search, params.page, params.per_page)?;
    let page = state
        .role_admin_service
        .list_roles(&state.guard_scope, &query)
        .await?;

    Ok(Json(RolePageResponse::from(page)))
}

pub async fn role_create_form_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<RoleFormResponse>> {
    let form = state
        .role_admin_service
        .create_form(&state.guard_scope)
        .await?;

    Ok(Json(RoleFormResponse::try_from(form)?))
}

pub async fn store_role_handler(
    State(state): State<AppState>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<(StatusCode, Json<RoleMutationResponse>)> {
    let menu_ids = parse_menu_ids(payload.menu_ids)?;
    let role = state
        .role_admin_service
        .store(
            &state.guard_scope,
            CreateRoleInput {
                name: payload.name,
                menu_ids,
            },
        )
        .await?;
    info!(role_id = role.id().as_i64(), "role created");

    Ok((
        StatusCode::CREATED,
        Json(RoleMutationResponse {
            message: SUCCESS_MESSAGE.to_owned(),
            redirect: Some(ROLE_INDEX_REDIRECT.to_owned()),
            role: RoleResponse::from(role),
        }),
    ))
}

pub async fn role_edit_form_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<RoleFormResponse>> {
    let form = state
        .role_admin_service
        .edit_form(&state.guard_scope, RoleId::new(role_id)?)
        .await?;

    Ok(Json(RoleFormResponse::try_from(form)?))
}

pub async fn save_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Json(payload): Json<SaveRoleRequest>,
) -> ApiResult<Json<RoleMutationResponse>> {
    let role_id = RoleId::new(role_id)?;
    let menu_ids = parse_menu_ids(payload.menu_ids)?;
    let role = state
        .role_admin_service
        .save(
            &state.guard_scope,
            UpdateRoleInput {
                role_id,
                name: payload.name,
                menu_ids,
            },
        )
        .await?;
    info!(role_id = role.id().as_i64(), "role saved");

    Ok(Json(RoleMutationResponse {
        message: SUCCESS_MESSAGE.to_owned(),
        redirect: Some(ROLE_INDEX_REDIRECT.to_owned()),
        role: RoleResponse::from(role),
    }))
}

pub async fn sync_role_permissions_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
    Json(payload): Json<SyncRolePermissionsRequest>,
) -> ApiResult<Json<RolePermissionsSyncedResponse>> {
    let role_id = RoleId::new(role_id)?;
    let menu_ids = parse_menu_ids(payload.menu_ids)?;
    let permission_ids = state
        .role_admin_service
        .sync_permissions(&state.guard_scope, role_id, &menu_ids)
        .await?;
    info!(
        role_id = role_id.as_i64(),
        permission_count = permission_ids.len(),
        "role permissions synced"
    );

    Ok(Json(RolePermissionsSyncedResponse {
        message: SUCCESS_MESSAGE.to_owned(),
        permission_ids: permission_ids
            .into_iter()
            .map(|permission_id| permission_id.as_i64())
            .collect(),
    }))
}

pub async fn delete_role_handler(
    State(state): State<AppState>,
    Path(role_id): Path<i64>,
) -> ApiResult<Json<RolesDeletedResponse>> {
    delete_roles(&state, vec![RoleId::new(role_id)?]).await
}

pub async fn delete_roles_handler(
    State(state): State<AppState>,
    Json(payload): Json<DeleteRolesRequest>,
) -> ApiResult<Json<RolesDeletedResponse>> {
    let role_ids = payload
        .role_ids
        .into_iter()
        .map(RoleId::new)
        .collect::<Result<Vec<_>, _>>()?;

    delete_roles(&state, role_ids).await
}

async fn delete_roles(
    state: &AppState,
    role_ids: Vec<RoleId>,
) -> ApiResult<Json<RolesDeletedResponse>> {
    let removed = state
        .role_admin_service
        .delete_roles(&state.guard_scope, &role_ids)
        .await?;
    if removed == 0 {
        return Err(AppError::NotFound("no matching roles were found".to_owned()).into());
    }
    info!(removed, "roles deleted");

    Ok(Json(RolesDeletedResponse {
        message: SUCCESS_MESSAGE.to_owned(),
        removed,
    }))
}
