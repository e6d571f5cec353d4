use std::sync::Arc;

use tracing::debug;

use rolegrid_core::{AppError, AppResult, GuardScope};
use rolegrid_domain::{MenuId, Role, RoleId, TreeNode};

use crate::rbac_ports::{
    MenuRepository, PermissionRepository, RolePermissionRepository, RoleRepository,
};
use crate::{PermissionResolver, RoleChecklistProjector, RolePermissionSynchronizer};

mod forms;
mod listing;
mod mutations;


/// Route the admin UI returns to after a successful store or save.
pub const ROLE_INDEX_REDIRECT: &str = "/admin/role/index";

/// Form payload for the role create and edit screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleFormPayload {
    /// Role being edited, absent on the create form.
    pub role: Option<Role>,
    /// Active menu tree of the guard scope.
    pub menu_tree: Vec<TreeNode>,
    /// Tree keys rendered as checked.
    pub checked_menu_keys: Vec<String>,
}

/// Input payload for creating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Raw role name as submitted.
    pub name: String,
    /// Checked menu nodes.
    pub menu_ids: Vec<MenuId>,
}

/// Input payload for updating a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRoleInput {
    /// Role being updated.
    pub role_id: RoleId,
    /// Raw role name as submitted.
    pub name: String,
    /// Checked menu nodes.
    pub menu_ids: Vec<MenuId>,
}

/// Progress of a role save, reported in debug logs.
///
/// The service reports `Validating` and `Done`; role stores report the two
/// stages reached inside their save transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSaveStage {
    /// Input is being checked; nothing has been written.
    Validating,
    /// Role row has been written inside the save transaction.
    RoleUpserted,
    /// Permission set has been replaced inside the same transaction.
    PermissionsSynced,
    /// Transaction committed.
    Done,
}

impl RoleSaveStage {
    /// Returns the stable stage label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::RoleUpserted => "role_upserted",
            Self::PermissionsSynced => "permissions_synced",
            Self::Done => "done",
        }
    }

    /// Emits a debug event marking that a save reached this stage.
    pub fn trace(self, guard_scope: &GuardScope, role_name: &str) {
        debug!(
            stage = self.as_str(),
            guard_scope = guard_scope.as_str(),
            role_name,
            "role save"
        );
    }
}

/// Application service for the role administration screens.
#[derive(Clone)]
pub struct RoleAdminService {
    menu_repository: Arc<dyn MenuRepository>,
    role_repository: Arc<dyn RoleRepository>,
    permission_resolver: PermissionResolver,
    checklist_projector: RoleChecklistProjector,
    permission_synchronizer: RolePermissionSynchronizer,
}

impl RoleAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        menu_repository: Arc<dyn MenuRepository>,
        permission_repository: Arc<dyn PermissionRepository>,
        role_repository: Arc<dyn RoleRepository>,
        role_permission_repository: Arc<dyn RolePermissionRepository>,
    ) -> Self {
        let permission_resolver = PermissionResolver::new(permission_repository);

        Self {
            menu_repository,
            role_repository,
            checklist_projector: RoleChecklistProjector::new(
                permission_resolver.clone(),
                role_permission_repository.clone(),
            ),
            permission_synchronizer: RolePermissionSynchronizer::new(
                permission_resolver.clone(),
                role_permission_repository,
            ),
            permission_resolver,
        }
    }

    async fn require_role(&self, guard_scope: &GuardScope, role_id: RoleId) -> AppResult<Role> {
        self.role_repository
            .find_role(guard_scope, role_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role {role_id} was not found")))
    }
}
