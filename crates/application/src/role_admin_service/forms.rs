use super::*;

use std::collections::HashSet;

use rolegrid_domain::{MenuNode, build_tree, tree_keys};

use crate::rbac_ports::MenuFilter;

impl RoleAdminService {
    /// Returns the create form: the active menu tree with nothing checked.
    pub async fn create_form(&self, guard_scope: &GuardScope) -> AppResult<RoleFormPayload> {
        let menus = self.active_menus(guard_scope).await?;

        Ok(RoleFormPayload {
            role: None,
            menu_tree: build_tree(&menus, MenuId::ROOT),
            checked_menu_keys: Vec::new(),
        })
    }

    /// Returns the edit form: the role, the active menu tree and the keys of
    /// nodes the role currently holds a permission for.
    pub async fn edit_form(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<RoleFormPayload> {
        let role = self.require_role(guard_scope, role_id).await?;
        let menus = self.active_menus(guard_scope).await?;
        let menu_tree = build_tree(&menus, MenuId::ROOT);

        // Only nodes placed in the tree can be rendered as checked.
        let placed: HashSet<String> = tree_keys(&menu_tree).into_iter().collect();
        let placed_menus: Vec<MenuNode> = menus
            .into_iter()
            .filter(|menu| placed.contains(&menu.id().key()))
            .collect();
        let checked_menu_keys = self
            .checklist_projector
            .compute_checked(guard_scope, &placed_menus, role.id())
            .await?;

        Ok(RoleFormPayload {
            role: Some(role),
            menu_tree,
            checked_menu_keys,
        })
    }

    async fn active_menus(&self, guard_scope: &GuardScope) -> AppResult<Vec<MenuNode>> {
        self.menu_repository
            .list_menus(MenuFilter::active(guard_scope))
            .await
    }
}
