use super::*;

use std::collections::BTreeSet;

use rolegrid_domain::{PermissionId, RoleName};

use crate::rbac_ports::{NewRole, RoleUpdate};

impl RoleAdminService {
    /// Creates a role holding the permissions of the checked menu nodes.
    ///
    /// The role row and its permission links are written in one atomic unit.
    pub async fn store(
        &self,
        guard_scope: &GuardScope,
        input: CreateRoleInput,
    ) -> AppResult<Role> {
        RoleSaveStage::Validating.trace(guard_scope, &input.name);
        let name = RoleName::new(input.name)?;
        let permission_ids = self
            .permission_resolver
            .resolve_permission_ids(guard_scope, &input.menu_ids)
            .await?;

        let role = self
            .role_repository
            .create_role(
                guard_scope,
                NewRole {
                    name,
                    permission_ids,
                },
            )
            .await?;
        RoleSaveStage::Done.trace(guard_scope, role.name().as_str());

        Ok(role)
    }

    /// Renames a role and replaces its permissions with those of the checked
    /// menu nodes, atomically.
    pub async fn save(
        &self,
        guard_scope: &GuardScope,
        input: UpdateRoleInput,
    ) -> AppResult<Role> {
        RoleSaveStage::Validating.trace(guard_scope, &input.name);
        let name = RoleName::new(input.name)?;
        let permission_ids = self
            .permission_resolver
            .resolve_permission_ids(guard_scope, &input.menu_ids)
            .await?;

        let role = self
            .role_repository
            .update_role(
                guard_scope,
                RoleUpdate {
                    role_id: input.role_id,
                    name,
                    permission_ids,
                },
            )
            .await?;
        RoleSaveStage::Done.trace(guard_scope, role.name().as_str());

        Ok(role)
    }

    /// Replaces the permissions of an existing role without touching its name.
    pub async fn sync_permissions(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
        menu_ids: &[MenuId],
    ) -> AppResult<BTreeSet<PermissionId>> {
        self.require_role(guard_scope, role_id).await?;

        self.permission_synchronizer
            .sync_role_permissions(guard_scope, role_id, menu_ids)
            .await
    }

    /// Deletes roles with their permission links, returning the removed count.
    pub async fn delete_roles(
        &self,
        guard_scope: &GuardScope,
        role_ids: &[RoleId],
    ) -> AppResult<u64> {
        let unique: BTreeSet<RoleId> = role_ids.iter().copied().collect();
        if unique.is_empty() {
            return Err(AppError::Validation(
                "at least one role id is required".to_owned(),
            ));
        }

        let role_ids: Vec<RoleId> = unique.into_iter().collect();
        let removed = self
            .role_repository
            .delete_roles(guard_scope, &role_ids)
            .await?;
        debug!(
            guard_scope = guard_scope.as_str(),
            requested = role_ids.len(),
            removed,
            "deleted roles"
        );

        Ok(removed)
    }
}
