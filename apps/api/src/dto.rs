use serde::Serialize;
use ts_rs::TS;

mod roles;

pub use roles::{
    DeleteRolesRequest, MenuIdInput, RoleFormResponse, RoleListParams, RoleMutationResponse,
    RolePageResponse, RolePermissionsSyncedResponse, RoleResponse, RolesDeletedResponse,
    SaveRoleRequest, SyncRolePermissionsRequest, parse_menu_ids,
};

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub guard_scope: String,
}
