use super::*;

impl PostgresRbacRepository {
    pub(super) async fn list_menus_impl(&self, filter: MenuFilter) -> AppResult<Vec<MenuNode>> {
        let rows = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT id, parent_id, label, status, guard_scope
            FROM menus
            WHERE status = $1 AND guard_scope = $2
            ORDER BY sort_order, id
            "#,
        )
        .bind(filter.status.as_str())
        .bind(filter.guard_scope.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list menus for guard '{}': {error}",
                filter.guard_scope
            ))
        })?;

        rows.into_iter().map(MenuNode::try_from).collect()
    }
}
