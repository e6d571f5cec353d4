use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use rolegrid_core::{AppResult, GuardScope};
use rolegrid_domain::{MenuId, PermissionId, RoleId};

use crate::permission_resolver::PermissionResolver;
use crate::rbac_ports::RolePermissionRepository;

/// Replaces a role's permission set from a set of checked menu nodes.
#[derive(Clone)]
pub struct RolePermissionSynchronizer {
    permission_resolver: PermissionResolver,
    role_permission_repository: Arc<dyn RolePermissionRepository>,
}

impl RolePermissionSynchronizer {
    /// Creates a synchronizer from required dependencies.
    #[must_use]
    pub fn new(
        permission_resolver: PermissionResolver,
        role_permission_repository: Arc<dyn RolePermissionRepository>,
    ) -> Self {
        Self {
            permission_resolver,
            role_permission_repository,
        }
    }

    /// Resolves the checked menu nodes and replaces the role's permissions
    /// with exactly the resolved set, returning that set.
    ///
    /// An empty selection clears every permission the role holds. The store
    /// applies the replace atomically, so on failure the previous set is
    /// left untouched.
    pub async fn sync_role_permissions(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
        checked_menu_ids: &[MenuId],
    ) -> AppResult<BTreeSet<PermissionId>> {
        let permission_ids = self
            .permission_resolver
            .resolve_permission_ids(guard_scope, checked_menu_ids)
            .await?;

        self.role_permission_repository
            .replace_permissions(guard_scope, role_id, &permission_ids)
            .await?;

        debug!(
            role_id = role_id.as_i64(),
            guard_scope = guard_scope.as_str(),
            permission_count = permission_ids.len(),
            "replaced role permissions"
        );

        Ok(permission_ids)
    }
}
