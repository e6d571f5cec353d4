use std::collections::BTreeSet;

use async_trait::async_trait;

use rolegrid_core::{AppResult, GuardScope};
use rolegrid_domain::{PermissionId, RoleId};

/// Repository port for role-to-permission links.
#[async_trait]
pub trait RolePermissionRepository: Send + Sync {
    /// Replaces the whole permission set of a role.
    ///
    /// Implementations must apply the replace atomically: on error the prior
    /// set stays untouched.
    async fn replace_permissions(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
        permission_ids: &BTreeSet<PermissionId>,
    ) -> AppResult<()>;

    /// Returns the permission ids currently held by a role.
    async fn held_permission_ids(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<BTreeSet<PermissionId>>;
}
