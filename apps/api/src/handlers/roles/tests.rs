use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use rolegrid_core::{AppError, GuardScope};

use crate::api_services::build_memory_state;
use crate::dto::{
    DeleteRolesRequest, MenuIdInput, RoleListParams, SaveRoleRequest, SyncRolePermissionsRequest,
};
use crate::error::ApiError;
use crate::state::AppState;

use super::{
    delete_role_handler, delete_roles_handler, list_roles_handler, role_create_form_handler,
    role_edit_form_handler, save_role_handler, store_role_handler, sync_role_permissions_handler,
};

async fn memory_state() -> AppState {
    build_memory_state(GuardScope::admin())
        .await
        .unwrap_or_else(|_| unreachable!())
}

fn save_request(name: &str, menu_ids: Vec<MenuIdInput>) -> SaveRoleRequest {
    SaveRoleRequest {
        name: name.to_owned(),
        menu_ids,
    }
}

async fn stored_role_id(state: &AppState, name: &str, menu_ids: Vec<MenuIdInput>) -> i64 {
    let stored =
        store_role_handler(State(state.clone()), Json(save_request(name, menu_ids))).await;
    let (_, Json(response)) = stored.unwrap_or_else(|_| unreachable!());
    response.role.role_id
}

#[tokio::test]
async fn store_returns_created_with_redirect() {
    let state = memory_state().await;

    let result = store_role_handler(
        State(state),
        Json(save_request(
            "editor",
            vec![MenuIdInput::Number(2), MenuIdInput::Text("3".to_owned())],
        )),
    )
    .await;

    let (status, Json(response)) = result.unwrap_or_else(|_| unreachable!());
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response.redirect.as_deref(), Some("/admin/role/index"));
    assert_eq!(response.role.name, "editor");
    assert_eq!(response.role.guard_scope, "admin");
}

#[tokio::test]
async fn store_rejects_blank_name() {
    let state = memory_state().await;

    let result = store_role_handler(State(state), Json(save_request("  ", Vec::new()))).await;

    assert!(matches!(result, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn store_rejects_malformed_menu_ids() {
    let state = memory_state().await;

    let result = store_role_handler(
        State(state.clone()),
        Json(save_request("editor", vec![MenuIdInput::Text("abc".to_owned())])),
    )
    .await;
    let Json(page) = list_roles_handler(State(state), Query(RoleListParams::default()))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert!(matches!(result, Err(ApiError(AppError::Validation(_)))));
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn create_form_lists_the_whole_active_tree() {
    let state = memory_state().await;

    let Json(form) = role_create_form_handler(State(state))
        .await
        .unwrap_or_else(|_| unreachable!());

    let roots: Vec<&str> = form.menu_tree.iter().map(|node| node.title.as_str()).collect();
    assert!(form.role.is_none());
    assert!(form.checked_menu_keys.is_empty());
    assert_eq!(roots, vec!["System", "Settings"]);
    assert_eq!(form.menu_tree[0].children.len(), 3);
}

#[tokio::test]
async fn edit_form_checks_stored_selection() {
    let state = memory_state().await;
    let role_id = stored_role_id(
        &state,
        "editor",
        vec![MenuIdInput::Number(3), MenuIdInput::Number(6)],
    )
    .await;

    let Json(form) = role_edit_form_handler(State(state), Path(role_id))
        .await
        .unwrap_or_else(|_| unreachable!());

    assert_eq!(form.role.map(|role| role.role_id), Some(role_id));
    assert_eq!(form.checked_menu_keys, vec!["3".to_owned(), "6".to_owned()]);
}

#[tokio::test]
async fn edit_form_rejects_unknown_and_invalid_ids() {
    let state = memory_state().await;

    let unknown = role_edit_form_handler(State(state.clone()), Path(404)).await;
    let invalid = role_edit_form_handler(State(state), Path(-1)).await;

    assert!(matches!(unknown, Err(ApiError(AppError::NotFound(_)))));
    assert!(matches!(invalid, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn save_renames_and_replaces_selection() {
    let state = memory_state().await;
    let role_id = stored_role_id(&state, "editor", vec![MenuIdInput::Number(2)]).await;

    let saved = save_role_handler(
        State(state.clone()),
        Path(role_id),
        Json(save_request(
            "auditor",
            vec![MenuIdInput::Text("6".to_owned()), MenuIdInput::Text(String::new())],
        )),
    )
    .await;
    let Json(form) = role_edit_form_handler(State(state), Path(role_id))
        .await
        .unwrap_or_else(|_| unreachable!());

    let Json(response) = saved.unwrap_or_else(|_| unreachable!());
    assert_eq!(response.role.name, "auditor");
    assert_eq!(form.checked_menu_keys, vec!["6".to_owned()]);
}

#[tokio::test]
async fn save_reports_duplicate_names() {
    let state = memory_state().await;
    stored_role_id(&state, "editor", Vec::new()).await;
    let viewer = stored_role_id(&state, "viewer", Vec::new()).await;

    let saved = save_role_handler(
        State(state),
        Path(viewer),
        Json(save_request("editor", Vec::new())),
    )
    .await;

    assert!(matches!(saved, Err(ApiError(AppError::DuplicateName(_)))));
}

#[tokio::test]
async fn sync_returns_resolved_permission_ids() {
    let state = memory_state().await;
    let role_id = stored_role_id(&state, "editor", Vec::new()).await;

    let synced = sync_role_permissions_handler(
        State(state.clone()),
        Path(role_id),
        Json(SyncRolePermissionsRequest {
            menu_ids: vec![MenuIdInput::Number(4), MenuIdInput::Number(2)],
        }),
    )
    .await;
    let cleared = sync_role_permissions_handler(
        State(state),
        Path(role_id),
        Json(SyncRolePermissionsRequest {
            menu_ids: Vec::new(),
        }),
    )
    .await;

    let Json(synced) = synced.unwrap_or_else(|_| unreachable!());
    let Json(cleared) = cleared.unwrap_or_else(|_| unreachable!());
    assert_eq!(synced.permission_ids, vec![1, 2, 3, 8]);
    assert!(cleared.permission_ids.is_empty());
}

#[tokio::test]
async fn delete_handlers_report_removed_rows() {
    let state = memory_state().await;
    let editor = stored_role_id(&state, "editor", vec![MenuIdInput::Number(2)]).await;
    let viewer = stored_role_id(&state, "viewer", Vec::new()).await;
    let auditor = stored_role_id(&state, "auditor", Vec::new()).await;

    let single = delete_role_handler(State(state.clone()), Path(editor)).await;
    let batch = delete_roles_handler(
        State(state.clone()),
        Json(DeleteRolesRequest {
            role_ids: vec![viewer, auditor, viewer],
        }),
    )
    .await;
    let missing = delete_role_handler(State(state.clone()), Path(editor)).await;
    let empty = delete_roles_handler(
        State(state),
        Json(DeleteRolesRequest {
            role_ids: Vec::new(),
        }),
    )
    .await;

    assert_eq!(single.ok().map(|Json(response)| response.removed), Some(1));
    assert_eq!(batch.ok().map(|Json(response)| response.removed), Some(2));
    assert!(matches!(missing, Err(ApiError(AppError::NotFound(_)))));
    assert!(matches!(empty, Err(ApiError(AppError::Validation(_)))));
}

#[tokio::test]
async fn list_filters_by_name_and_rejects_bad_paging() {
    let state = memory_state().await;
    for name in ["editor", "chief editor", "viewer"] {
        stored_role_id(&state, name, Vec::new()).await;
    }

    let filtered = list_roles_handler(
        State(state.clone()),
        Query(RoleListParams {
            search: Some("edit".to_owned()),
            page: None,
            per_page: None,
        }),
    )
    .await;
    let bad_page = list_roles_handler(
        State(state),
        Query(RoleListParams {
            search: None,
            page: Some(0),
            per_page: None,
        }),
    )
    .await;

    let Json(filtered) = filtered.unwrap_or_else(|_| unreachable!());
    assert_eq!(filtered.total, 2);
    assert!(matches!(bad_page, Err(ApiError(AppError::Validation(_)))));
}
