use std::collections::BTreeSet;
use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tracing::debug;

use rolegrid_application::{
    MenuFilter, MenuRepository, NewRole, PermissionRepository, RoleListQuery, RolePage,
    RolePermissionRepository, RoleRepository, RoleSaveStage, RoleSummary, RoleUpdate,
};
use rolegrid_core::{AppError, AppResult, GuardScope};
use rolegrid_domain::{
    MenuId, MenuNode, MenuPermission, MenuStatus, PermissionId, Role, RoleId, RoleName,
};

mod menus;
mod permissions;
mod role_permissions;
mod roles;


/// PostgreSQL-backed repository for menus, permissions and roles.
#[derive(Clone)]
pub struct PostgresRbacRepository {
    pool: PgPool,
}

impl PostgresRbacRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn begin(&self) -> AppResult<Transaction<'_, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|error| AppError::Internal(format!("failed to begin transaction: {error}")))
    }
}

#[derive(Debug, FromRow)]
struct MenuRow {
    id: i64,
    parent_id: i64,
    label: String,
    status: String,
    guard_scope: String,
}

#[derive(Debug, FromRow)]
struct MenuPermissionRow {
    permission_id: i64,
    menu_id: i64,
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    name: String,
    guard_scope: String,
}

#[derive(Debug, FromRow)]
struct RoleSummaryRow {
    id: i64,
    name: String,
    guard_scope: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<MenuRow> for MenuNode {
    type Error = AppError;

    fn try_from(row: MenuRow) -> Result<Self, Self::Error> {
        MenuNode::new(
            row.id,
            row.parent_id,
            row.label,
            MenuStatus::from_str(row.status.as_str())?,
            GuardScope::new(row.guard_scope)?,
        )
    }
}

impl TryFrom<RoleRow> for Role {
    type Error = AppError;

    fn try_from(row: RoleRow) -> Result<Self, Self::Error> {
        Ok(Role::new(
            RoleId::new(row.id)?,
            RoleName::new(row.name)?,
            GuardScope::new(row.guard_scope)?,
        ))
    }
}

#[async_trait]
impl MenuRepository for PostgresRbacRepository {
    async fn list_menus(&self, filter: MenuFilter) -> AppResult<Vec<MenuNode>> {
        self.list_menus_impl(filter).await
    }
}

#[async_trait]
impl PermissionRepository for PostgresRbacRepository {
    async fn find_permission_ids_by_menu_ids(
        &self,
        guard_scope: &GuardScope,
        menu_ids: &[MenuId],
    ) -> AppResult<Vec<MenuPermission>> {
        self.find_permission_ids_by_menu_ids_impl(guard_scope, menu_ids)
            .await
    }
}

#[async_trait]
impl RoleRepository for PostgresRbacRepository {
    async fn list_roles(
        &self,
        guard_scope: &GuardScope,
        query: &RoleListQuery,
    ) -> AppResult<RolePage> {
        self.list_roles_impl(guard_scope, query).await
    }

    async fn find_role(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<Option<Role>> {
        self.find_role_impl(guard_scope, role_id).await
    }

    async fn create_role(&self, guard_scope: &GuardScope, input: NewRole) -> AppResult<Role> {
        self.create_role_impl(guard_scope, input).await
    }

    async fn update_role(&self, guard_scope: &GuardScope, input: RoleUpdate) -> AppResult<Role> {
        self.update_role_impl(guard_scope, input).await
    }

    async fn delete_roles(
        &self,
        guard_scope: &GuardScope,
        role_ids: &[RoleId],
    ) -> AppResult<u64> {
        self.delete_roles_impl(guard_scope, role_ids).await
    }
}

#[async_trait]
impl RolePermissionRepository for PostgresRbacRepository {
    async fn replace_permissions(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
        permission_ids: &BTreeSet<PermissionId>,
    ) -> AppResult<()> {
        self.replace_permissions_impl(guard_scope, role_id, permission_ids)
            .await
    }

    async fn held_permission_ids(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<BTreeSet<PermissionId>> {
        self.held_permission_ids_impl(guard_scope, role_id).await
    }
}

fn map_role_conflict(error: sqlx::Error, role_name: &RoleName) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::DuplicateName(format!("role '{}' already exists", role_name.as_str()));
    }

    AppError::Internal(format!(
        "failed to persist role '{}': {error}",
        role_name.as_str()
    ))
}

/// Locks the role row for the rest of the transaction.
async fn lock_role(
    transaction: &mut Transaction<'_, Postgres>,
    guard_scope: &GuardScope,
    role_id: RoleId,
) -> AppResult<()> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
        FROM roles
        WHERE id = $1 AND guard_scope = $2
        FOR UPDATE
        "#,
    )
    .bind(role_id.as_i64())
    .bind(guard_scope.as_str())
    .fetch_optional(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to lock role {role_id}: {error}")))?
    .map(|_| ())
    .ok_or_else(|| AppError::NotFound(format!("role {role_id} was not found")))
}

/// Replaces the role's links with exactly the given permissions of the guard.
///
/// Permission ids unknown in the guard are skipped.
async fn write_role_permissions(
    transaction: &mut Transaction<'_, Postgres>,
    guard_scope: &GuardScope,
    role_id: RoleId,
    permission_ids: &BTreeSet<PermissionId>,
) -> AppResult<()> {
    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id.as_i64())
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::SyncFailure(format!(
                "failed to clear permissions of role {role_id}: {error}"
            ))
        })?;

    if permission_ids.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = permission_ids.iter().map(PermissionId::as_i64).collect();
    let inserted = sqlx::query(
        r#"
        INSERT INTO role_permissions (role_id, permission_id)
        SELECT $1, permissions.id
        FROM permissions
        WHERE permissions.id = ANY($2) AND permissions.guard_scope = $3
        ON CONFLICT (role_id, permission_id) DO NOTHING
        "#,
    )
    .bind(role_id.as_i64())
    .bind(&ids)
    .bind(guard_scope.as_str())
    .execute(&mut **transaction)
    .await
    .map_err(|error| {
        AppError::SyncFailure(format!(
            "failed to attach permissions to role {role_id}: {error}"
        ))
    })?
    .rows_affected();

    debug!(
        role_id = role_id.as_i64(),
        requested = ids.len(),
        inserted,
        "wrote role permissions"
    );

    Ok(())
}

async fn commit(transaction: Transaction<'_, Postgres>) -> AppResult<()> {
    transaction
        .commit()
        .await
        .map_err(|error| AppError::Internal(format!("failed to commit transaction: {error}")))
}
