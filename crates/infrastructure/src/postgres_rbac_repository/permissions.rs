use super::*;

impl PostgresRbacRepository {
    pub(super) async fn find_permission_ids_by_menu_ids_impl(
        &self,
        guard_scope: &GuardScope,
        menu_ids: &[MenuId],
    ) -> AppResult<Vec<MenuPermission>> {
        if menu_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = menu_ids.iter().map(MenuId::as_i64).collect();
        let rows = sqlx::query_as::<_, MenuPermissionRow>(
            r#"
            SELECT id AS permission_id, menu_id
            FROM permissions
            WHERE guard_scope = $1 AND menu_id = ANY($2)
            ORDER BY menu_id, id
            "#,
        )
        .bind(guard_scope.as_str())
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to resolve menu permissions: {error}"))
        })?;

        rows.into_iter()
            .map(|row| {
                Ok(MenuPermission {
                    permission_id: PermissionId::new(row.permission_id)?,
                    menu_id: MenuId::new(row.menu_id)?,
                })
            })
            .collect()
    }
}
