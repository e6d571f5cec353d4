use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use tokio::sync::RwLock;

use rolegrid_application::{
    MenuFilter, MenuRepository, NewRole, PermissionRepository, RoleListQuery, RolePage,
    RolePermissionRepository, RoleRepository, RoleSaveStage, RoleSummary, RoleUpdate,
};
use rolegrid_core::{AppError, AppResult, GuardScope};
use rolegrid_domain::{
    MenuId, MenuNode, MenuPermission, Permission, PermissionId, Role, RoleId, RoleName,
};


#[derive(Debug, Clone)]
struct StoredRole {
    role: Role,
    created_at: String,
}

#[derive(Debug, Default)]
struct RbacState {
    menus: Vec<MenuNode>,
    permissions: BTreeMap<PermissionId, Permission>,
    roles: BTreeMap<RoleId, StoredRole>,
    links: BTreeMap<RoleId, BTreeSet<PermissionId>>,
    last_role_id: i64,
}

impl RbacState {
    fn name_taken(
        &self,
        guard_scope: &GuardScope,
        name: &RoleName,
        except: Option<RoleId>,
    ) -> bool {
        self.roles.values().any(|stored| {
            stored.role.guard_scope() == guard_scope
                && stored.role.name() == name
                && Some(stored.role.id()) != except
        })
    }

    fn known_permissions(
        &self,
        guard_scope: &GuardScope,
        permission_ids: &BTreeSet<PermissionId>,
    ) -> BTreeSet<PermissionId> {
        permission_ids
            .iter()
            .copied()
            .filter(|permission_id| {
                self.permissions
                    .get(permission_id)
                    .is_some_and(|permission| permission.guard_scope() == guard_scope)
            })
            .collect()
    }

    fn scoped_role(&self, guard_scope: &GuardScope, role_id: RoleId) -> Option<&StoredRole> {
        self.roles
            .get(&role_id)
            .filter(|stored| stored.role.guard_scope() == guard_scope)
    }
}

/// In-memory RBAC repository implementing every role and menu port.
///
/// All state sits behind one lock, so each write is applied atomically.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    state: RwLock<RbacState>,
}

impl InMemoryRbacRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a menu node, listed after the nodes inserted before it.
    pub async fn insert_menu(&self, menu: MenuNode) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.menus.iter().any(|stored| stored.id() == menu.id()) {
            return Err(AppError::Validation(format!(
                "menu {} already exists",
                menu.id()
            )));
        }

        state.menus.push(menu);
        Ok(())
    }

    /// Adds a permission, optionally tied to a menu node.
    pub async fn insert_permission(&self, permission: Permission) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.permissions.contains_key(&permission.id()) {
            return Err(AppError::Validation(format!(
                "permission {} already exists",
                permission.id()
            )));
        }

        state.permissions.insert(permission.id(), permission);
        Ok(())
    }
}

#[async_trait]
impl MenuRepository for InMemoryRbacRepository {
    async fn list_menus(&self, filter: MenuFilter) -> AppResult<Vec<MenuNode>> {
        let state = self.state.read().await;

        Ok(state
            .menus
            .iter()
            .filter(|menu| {
                menu.status() == filter.status && menu.guard_scope() == &filter.guard_scope
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PermissionRepository for InMemoryRbacRepository {
    async fn find_permission_ids_by_menu_ids(
        &self,
        guard_scope: &GuardScope,
        menu_ids: &[MenuId],
    ) -> AppResult<Vec<MenuPermission>> {
        let requested: BTreeSet<MenuId> = menu_ids.iter().copied().collect();
        let state = self.state.read().await;

        Ok(state
            .permissions
            .values()
            .filter(|permission| permission.guard_scope() == guard_scope)
            .filter_map(|permission| {
                permission
                    .menu_id()
                    .filter(|menu_id| requested.contains(menu_id))
                    .map(|menu_id| MenuPermission {
                        permission_id: permission.id(),
                        menu_id,
                    })
            })
            .collect())
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn list_roles(
        &self,
        guard_scope: &GuardScope,
        query: &RoleListQuery,
    ) -> AppResult<RolePage> {
        let fragment = query.name_contains.as_deref().map(str::to_lowercase);
        let state = self.state.read().await;

        let matching: Vec<&StoredRole> = state
            .roles
            .values()
            .filter(|stored| stored.role.guard_scope() == guard_scope)
            .filter(|stored| {
                fragment.as_deref().is_none_or(|fragment| {
                    stored.role.name().as_str().to_lowercase().contains(fragment)
                })
            })
            .collect();

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.per_page).unwrap_or(usize::MAX);
        let items = matching
            .iter()
            .skip(offset)
            .take(limit)
            .map(|stored| RoleSummary {
                role_id: stored.role.id(),
                name: stored.role.name().as_str().to_owned(),
                guard_scope: stored.role.guard_scope().as_str().to_owned(),
                created_at: stored.created_at.clone(),
            })
            .collect();

        Ok(RolePage {
            items,
            total: u64::try_from(matching.len()).unwrap_or(u64::MAX),
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn find_role(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<Option<Role>> {
        let state = self.state.read().await;
        Ok(state
            .scoped_role(guard_scope, role_id)
            .map(|stored| stored.role.clone()))
    }

    async fn create_role(&self, guard_scope: &GuardScope, input: NewRole) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state.name_taken(guard_scope, &input.name, None) {
            return Err(AppError::DuplicateName(format!(
                "role '{}' already exists in guard '{guard_scope}'",
                input.name.as_str()
            )));
        }

        let role_id = RoleId::new(state.last_role_id + 1)?;
        let permission_ids = state.known_permissions(guard_scope, &input.permission_ids);
        let role = Role::new(role_id, input.name, guard_scope.clone());

        state.last_role_id = role_id.as_i64();
        state.roles.insert(
            role_id,
            StoredRole {
                role: role.clone(),
                created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            },
        );
        RoleSaveStage::RoleUpserted.trace(guard_scope, role.name().as_str());
        state.links.insert(role_id, permission_ids);
        RoleSaveStage::PermissionsSynced.trace(guard_scope, role.name().as_str());

        Ok(role)
    }

    async fn update_role(&self, guard_scope: &GuardScope, input: RoleUpdate) -> AppResult<Role> {
        let mut state = self.state.write().await;
        if state.scoped_role(guard_scope, input.role_id).is_none() {
            return Err(AppError::NotFound(format!(
                "role {} was not found",
                input.role_id
            )));
        }
        if state.name_taken(guard_scope, &input.name, Some(input.role_id)) {
            return Err(AppError::DuplicateName(format!(
                "role '{}' already exists in guard '{guard_scope}'",
                input.name.as_str()
            )));
        }

        let permission_ids = state.known_permissions(guard_scope, &input.permission_ids);
        let role = Role::new(input.role_id, input.name, guard_scope.clone());
        if let Some(stored) = state.roles.get_mut(&input.role_id) {
            stored.role = role.clone();
        }
        RoleSaveStage::RoleUpserted.trace(guard_scope, role.name().as_str());
        state.links.insert(input.role_id, permission_ids);
        RoleSaveStage::PermissionsSynced.trace(guard_scope, role.name().as_str());

        Ok(role)
    }

    async fn delete_roles(
        &self,
        guard_scope: &GuardScope,
        role_ids: &[RoleId],
    ) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut removed = 0;

        for role_id in role_ids {
            if state.scoped_role(guard_scope, *role_id).is_some() {
                state.roles.remove(role_id);
                state.links.remove(role_id);
                removed += 1;
            }
        }

        Ok(removed)
    }
}

#[async_trait]
impl RolePermissionRepository for InMemoryRbacRepository {
    async fn replace_permissions(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
        permission_ids: &BTreeSet<PermissionId>,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.scoped_role(guard_scope, role_id).is_none() {
            return Err(AppError::NotFound(format!("role {role_id} was not found")));
        }

        let permission_ids = state.known_permissions(guard_scope, permission_ids);
        state.links.insert(role_id, permission_ids);
        Ok(())
    }

    async fn held_permission_ids(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<BTreeSet<PermissionId>> {
        let state = self.state.read().await;
        if state.scoped_role(guard_scope, role_id).is_none() {
            return Ok(BTreeSet::new());
        }

        Ok(state.links.get(&role_id).cloned().unwrap_or_default())
    }
}
