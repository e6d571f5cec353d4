use std::collections::HashSet;
use std::sync::Arc;

use rolegrid_core::{AppResult, GuardScope};
use rolegrid_domain::{MenuId, MenuNode, RoleId};

use crate::permission_resolver::PermissionResolver;
use crate::rbac_ports::RolePermissionRepository;

/// Projects the permissions held by a role onto menu tree keys.
#[derive(Clone)]
pub struct RoleChecklistProjector {
    permission_resolver: PermissionResolver,
    role_permission_repository: Arc<dyn RolePermissionRepository>,
}

impl RoleChecklistProjector {
    /// Creates a projector from required dependencies.
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

    /// Returns the keys of menu nodes for which the role holds at least one
    /// permission, in menu order.
    ///
    /// Issues one fetch of the role's held permissions and at most one
    /// batched fetch of menu-to-permission mappings, whatever the number of
    /// menu nodes.
    pub async fn compute_checked(
        &self,
        guard_scope: &GuardScope,
        menus: &[MenuNode],
        role_id: RoleId,
    ) -> AppResult<Vec<String>> {
        if menus.is_empty() {
            return Ok(Vec::new());
        }

        let held = self
            .role_permission_repository
            .held_permission_ids(guard_scope, role_id)
            .await?;
        if held.is_empty() {
            return Ok(Vec::new());
        }

        let menu_ids: Vec<MenuId> = menus.iter().map(MenuNode::id).collect();
        let by_menu = self
            .permission_resolver
            .resolve_by_menu(guard_scope, &menu_ids)
            .await?;

        let mut seen = HashSet::new();
        Ok(menu_ids
            .into_iter()
            .filter(|menu_id| {
                by_menu
                    .get(menu_id)
                    .is_some_and(|permission_ids| !permission_ids.is_disjoint(&held))
            })
            .filter(|menu_id| seen.insert(*menu_id))
            .map(|menu_id| menu_id.key())
            .collect())
    }
}
