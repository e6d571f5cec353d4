use super::*;

impl PostgresRbacRepository {
    pub(super) async fn replace_permissions_impl(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
        permission_ids: &BTreeSet<PermissionId>,
    ) -> AppResult<()> {
        let mut transaction = self.begin().await?;
        lock_role(&mut transaction, guard_scope, role_id).await?;
        write_role_permissions(&mut transaction, guard_scope, role_id, permission_ids).await?;
        commit(transaction).await
    }

    pub(super) async fn held_permission_ids_impl(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<BTreeSet<PermissionId>> {
        let ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT role_permissions.permission_id
            FROM role_permissions
            INNER JOIN roles
                ON roles.id = role_permissions.role_id
            WHERE role_permissions.role_id = $1 AND roles.guard_scope = $2
            "#,
        )
        .bind(role_id.as_i64())
        .bind(guard_scope.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load permissions of role {role_id}: {error}"
            ))
        })?;

        ids.into_iter().map(PermissionId::new).collect()
    }
}
