use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use rolegrid_core::{AppError, AppResult, GuardScope};
use rolegrid_domain::{
    MenuId, MenuNode, MenuPermission, MenuStatus, Permission, PermissionId, Role, RoleId, RoleName,
};

use crate::rbac_ports::{
    MenuFilter, MenuRepository, NewRole, PermissionRepository, RoleListQuery, RolePage,
    RolePermissionRepository, RoleRepository, RoleSummary, RoleUpdate,
};

pub fn menu_ids(values: &[i64]) -> Vec<MenuId> {
    values
        .iter()
        .map(|value| MenuId::new(*value).unwrap_or_else(|_| unreachable!()))
        .collect()
}

pub fn permission_ids(values: &[i64]) -> BTreeSet<PermissionId> {
    values
        .iter()
        .map(|value| PermissionId::new(*value).unwrap_or_else(|_| unreachable!()))
        .collect()
}

pub fn role_id(value: i64) -> RoleId {
    RoleId::new(value).unwrap_or_else(|_| unreachable!())
}

/// Log sink collecting formatted events emitted while installed.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Routes debug events of the current thread into this sink until the
    /// guard is dropped.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || sink.clone())
            .finish();

        tracing::subscriber::set_default(subscriber)
    }

    /// Returns the `stage` field of every captured event, in emission order.
    pub fn stages(&self) -> Vec<String> {
        let output = self
            .0
            .lock()
            .map(|buffer| String::from_utf8_lossy(&buffer).into_owned())
            .unwrap_or_default();

        output
            .lines()
            .filter_map(|line| line.split_once("stage=").map(|(_, rest)| rest))
            .filter_map(|rest| rest.split_whitespace().next())
            .map(|value| value.trim_matches('"').to_owned())
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct FakeState {
    menus: Vec<MenuNode>,
    permissions: Vec<Permission>,
    roles: Vec<Role>,
    links: BTreeMap<RoleId, BTreeSet<PermissionId>>,
    next_role_id: i64,
}

/// Single fake backing every RBAC port, with call counters and failure injection.
#[derive(Default)]
pub struct FakeRbacStore {
    state: Mutex<FakeState>,
    permission_lookups: AtomicUsize,
    held_lookups: AtomicUsize,
    mutations: AtomicUsize,
    fail_permission_writes: AtomicBool,
}

impl FakeRbacStore {
    /// Menus `1 System`, `2 Users`, `3 Roles`, `4 Settings` and an inactive
    /// `5 Legacy`. Node 2 maps to permission 10, node 3 to 11 and 12, node 4
    /// to 13 and node 5 to 14; node 1 has none.
    pub fn with_editor_fixture() -> Self {
        let admin = GuardScope::admin();
        let menu = |id, parent_id, label, status| {
            MenuNode::new(id, parent_id, label, status, admin.clone())
                .unwrap_or_else(|_| unreachable!())
        };
        let permission = |id, menu_id, name| {
            Permission::new(id, Some(menu_id), name, admin.clone())
                .unwrap_or_else(|_| unreachable!())
        };

        Self {
            state: Mutex::new(FakeState {
                menus: vec![
                    menu(1, 0, "System", MenuStatus::Active),
                    menu(2, 1, "Users", MenuStatus::Active),
                    menu(3, 1, "Roles", MenuStatus::Active),
                    menu(4, 0, "Settings", MenuStatus::Active),
                    menu(5, 0, "Legacy", MenuStatus::Inactive),
                ],
                permissions: vec![
                    permission(10, 2, "users.index"),
                    permission(11, 3, "roles.index"),
                    permission(12, 3, "roles.edit"),
                    permission(13, 4, "settings.edit"),
                    permission(14, 5, "legacy.view"),
                ],
                roles: Vec::new(),
                links: BTreeMap::new(),
                next_role_id: 1,
            }),
            ..Self::default()
        }
    }

    pub fn fail_permission_writes(&self) {
        self.fail_permission_writes.store(true, Ordering::SeqCst);
    }

    pub fn permission_lookups(&self) -> usize {
        self.permission_lookups.load(Ordering::SeqCst)
    }

    pub fn held_lookups(&self) -> usize {
        self.held_lookups.load(Ordering::SeqCst)
    }

    pub fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }

    pub async fn add_menus(&self, menus: Vec<MenuNode>) {
        self.state.lock().await.menus.extend(menus);
    }

    pub async fn add_permissions(&self, permissions: Vec<Permission>) {
        self.state.lock().await.permissions.extend(permissions);
    }

    pub async fn links(&self, role_id: RoleId) -> BTreeSet<PermissionId> {
        self.state
            .lock()
            .await
            .links
            .get(&role_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn role_names(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .roles
            .iter()
            .map(|role| role.name().as_str().to_owned())
            .collect()
    }

    fn write_failure(&self) -> AppResult<()> {
        if self.fail_permission_writes.load(Ordering::SeqCst) {
            return Err(AppError::SyncFailure(
                "injected permission write failure".to_owned(),
            ));
        }

        Ok(())
    }
}

fn name_taken(
    state: &FakeState,
    guard_scope: &GuardScope,
    name: &RoleName,
    except: Option<RoleId>,
) -> bool {
    state.roles.iter().any(|role| {
        role.guard_scope() == guard_scope && role.name() == name && Some(role.id()) != except
    })
}

#[async_trait]
impl MenuRepository for FakeRbacStore {
    async fn list_menus(&self, filter: MenuFilter) -> AppResult<Vec<MenuNode>> {
        Ok(self
            .state
            .lock()
            .await
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
impl PermissionRepository for FakeRbacStore {
    async fn find_permission_ids_by_menu_ids(
        &self,
        guard_scope: &GuardScope,
        menu_ids: &[MenuId],
    ) -> AppResult<Vec<MenuPermission>> {
        self.permission_lookups.fetch_add(1, Ordering::SeqCst);

        Ok(self
            .state
            .lock()
            .await
            .permissions
            .iter()
            .filter(|permission| permission.guard_scope() == guard_scope)
            .filter_map(|permission| {
                permission
                    .menu_id()
                    .filter(|menu_id| menu_ids.contains(menu_id))
                    .map(|menu_id| MenuPermission {
                        permission_id: permission.id(),
                        menu_id,
                    })
            })
            .collect())
    }
}

#[async_trait]
impl RoleRepository for FakeRbacStore {
    async fn list_roles(
        &self,
        guard_scope: &GuardScope,
        query: &RoleListQuery,
    ) -> AppResult<RolePage> {
        let state = self.state.lock().await;
        let matching: Vec<&Role> = state
            .roles
            .iter()
            .filter(|role| role.guard_scope() == guard_scope)
            .filter(|role| {
                query.name_contains.as_ref().is_none_or(|fragment| {
                    role.name()
                        .as_str()
                        .to_lowercase()
                        .contains(fragment.to_lowercase().as_str())
                })
            })
            .collect();

        let items = matching
            .iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.per_page).unwrap_or(usize::MAX))
            .map(|role| RoleSummary {
                role_id: role.id(),
                name: role.name().as_str().to_owned(),
                guard_scope: role.guard_scope().to_string(),
                created_at: "2026-01-01T00:00:00Z".to_owned(),
            })
            .collect();

        Ok(RolePage {
            items,
            total: u64::try_from(matching.len()).unwrap_or_default(),
            page: query.page,
            per_page: query.per_page,
        })
    }

    async fn find_role(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<Option<Role>> {
        Ok(self
            .state
            .lock()
            .await
            .roles
            .iter()
            .find(|role| role.id() == role_id && role.guard_scope() == guard_scope)
            .cloned())
    }

    async fn create_role(&self, guard_scope: &GuardScope, input: NewRole) -> AppResult<Role> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if name_taken(&state, guard_scope, &input.name, None) {
            return Err(AppError::DuplicateName(format!(
                "role '{}' already exists",
                input.name.as_str()
            )));
        }
        self.write_failure()?;

        let role_id = RoleId::new(state.next_role_id).unwrap_or_else(|_| unreachable!());
        state.next_role_id += 1;
        let role = Role::new(role_id, input.name, guard_scope.clone());
        state.roles.push(role.clone());
        state.links.insert(role_id, input.permission_ids);
        Ok(role)
    }

    async fn update_role(&self, guard_scope: &GuardScope, input: RoleUpdate) -> AppResult<Role> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        if name_taken(&state, guard_scope, &input.name, Some(input.role_id)) {
            return Err(AppError::DuplicateName(format!(
                "role '{}' already exists",
                input.name.as_str()
            )));
        }
        self.write_failure()?;

        let Some(position) = state
            .roles
            .iter()
            .position(|role| role.id() == input.role_id && role.guard_scope() == guard_scope)
        else {
            return Err(AppError::NotFound(format!(
                "role {} was not found",
                input.role_id
            )));
        };

        let role = Role::new(input.role_id, input.name, guard_scope.clone());
        state.roles[position] = role.clone();
        state.links.insert(input.role_id, input.permission_ids);
        Ok(role)
    }

    async fn delete_roles(
        &self,
        guard_scope: &GuardScope,
        role_ids: &[RoleId],
    ) -> AppResult<u64> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().await;
        let before = state.roles.len();
        state
            .roles
            .retain(|role| !(role.guard_scope() == guard_scope && role_ids.contains(&role.id())));
        let removed = before - state.roles.len();
        for role_id in role_ids {
            if !state.roles.iter().any(|role| role.id() == *role_id) {
                state.links.remove(role_id);
            }
        }

        Ok(u64::try_from(removed).unwrap_or_default())
    }
}

#[async_trait]
impl RolePermissionRepository for FakeRbacStore {
    async fn replace_permissions(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
        permission_ids: &BTreeSet<PermissionId>,
    ) -> AppResult<()> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.write_failure()?;

        let mut state = self.state.lock().await;
        if !state
            .roles
            .iter()
            .any(|role| role.id() == role_id && role.guard_scope() == guard_scope)
        {
            return Err(AppError::NotFound(format!("role {role_id} was not found")));
        }

        state.links.insert(role_id, permission_ids.clone());
        Ok(())
    }

    async fn held_permission_ids(
        &self,
        _guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<BTreeSet<PermissionId>> {
        self.held_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.links(role_id).await)
    }
}
