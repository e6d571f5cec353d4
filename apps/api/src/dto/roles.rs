use serde::{Deserialize, Serialize};
use ts_rs::TS;

mod conversions;


pub use conversions::parse_menu_ids;

/// Query string of the role listing.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-list-params.ts"
)]
pub struct RoleListParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Checked menu node id as submitted by the tree widget.
///
/// Widgets post either numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, TS)]
#[serde(untagged)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-id-input.ts"
)]
pub enum MenuIdInput {
    Number(i64),
    Text(String),
}

/// Incoming payload for role store and save.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-role-request.ts"
)]
pub struct SaveRoleRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub menu_ids: Vec<MenuIdInput>,
}

/// Incoming payload replacing only a role's permissions.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/sync-role-permissions-request.ts"
)]
pub struct SyncRolePermissionsRequest {
    #[serde(default)]
    pub menu_ids: Vec<MenuIdInput>,
}

/// Incoming payload for batch role deletion.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/delete-roles-request.ts"
)]
pub struct DeleteRolesRequest {
    #[serde(default)]
    pub role_ids: Vec<i64>,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub role_id: i64,
    pub name: String,
    pub guard_scope: String,
}

/// API representation of a role listing row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-summary-response.ts"
)]
pub struct RoleSummaryResponse {
    pub role_id: i64,
    pub name: String,
    pub guard_scope: String,
    pub created_at: String,
}

/// One page of roles.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-page-response.ts"
)]
pub struct RolePageResponse {
    pub items: Vec<RoleSummaryResponse>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

/// Menu tree node rendered by the permission checklist.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/menu-tree-node-response.ts"
)]
pub struct MenuTreeNodeResponse {
    pub key: String,
    pub title: String,
    pub children: Vec<MenuTreeNodeResponse>,
}

impl Drop for MenuTreeNodeResponse {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Payload populating the role create and edit forms.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-form-response.ts"
)]
pub struct RoleFormResponse {
    pub role: Option<RoleResponse>,
    pub menu_tree: Vec<MenuTreeNodeResponse>,
    pub checked_menu_keys: Vec<String>,
}

/// Result of a role store or save.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-mutation-response.ts"
)]
pub struct RoleMutationResponse {
    pub message: String,
    pub redirect: Option<String>,
    pub role: RoleResponse,
}

/// Result of a role deletion.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/roles-deleted-response.ts"
)]
pub struct RolesDeletedResponse {
    pub message: String,
    pub removed: u64,
}

/// Result of a permission-only sync.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/role-permissions-synced-response.ts"
)]
pub struct RolePermissionsSyncedResponse {
    pub message: String,
    pub permission_ids: Vec<i64>,
}
