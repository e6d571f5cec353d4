use super::*;

use chrono::SecondsFormat;

impl PostgresRbacRepository {
    pub(super) async fn list_roles_impl(
        &self,
        guard_scope: &GuardScope,
        query: &RoleListQuery,
    ) -> AppResult<RolePage> {
        let pattern = query.name_contains.as_deref().map(like_pattern);

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM roles
            WHERE guard_scope = $1
                AND ($2::TEXT IS NULL OR name ILIKE $2)
            "#,
        )
        .bind(guard_scope.as_str())
        .bind(pattern.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to count roles: {error}")))?;

        let rows = sqlx::query_as::<_, RoleSummaryRow>(
            r#"
            SELECT id, name, guard_scope, created_at
            FROM roles
            WHERE guard_scope = $1
                AND ($2::TEXT IS NULL OR name ILIKE $2)
            ORDER BY id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(guard_scope.as_str())
        .bind(pattern.as_deref())
        .bind(i64::from(query.per_page))
        .bind(i64::try_from(query.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list roles: {error}")))?;

        let items = rows
            .into_iter()
            .map(|row| {
                Ok(RoleSummary {
                    role_id: RoleId::new(row.id)?,
                    name: row.name,
                    guard_scope: row.guard_scope,
                    created_at: row.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(RolePage {
            items,
            total: u64::try_from(total).unwrap_or_default(),
            page: query.page,
            per_page: query.per_page,
        })
    }

    pub(super) async fn find_role_impl(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT id, name, guard_scope
            FROM roles
            WHERE id = $1 AND guard_scope = $2
            "#,
        )
        .bind(role_id.as_i64())
        .bind(guard_scope.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find role {role_id}: {error}")))?;

        row.map(Role::try_from).transpose()
    }

    pub(super) async fn create_role_impl(
        &self,
        guard_scope: &GuardScope,
        input: NewRole,
    ) -> AppResult<Role> {
        let mut transaction = self.begin().await?;

        let role_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO roles (name, guard_scope)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(input.name.as_str())
        .bind(guard_scope.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, &input.name))?;
        let role_id = RoleId::new(role_id)?;
        RoleSaveStage::RoleUpserted.trace(guard_scope, input.name.as_str());

        write_role_permissions(&mut transaction, guard_scope, role_id, &input.permission_ids)
            .await?;
        RoleSaveStage::PermissionsSynced.trace(guard_scope, input.name.as_str());
        commit(transaction).await?;

        Ok(Role::new(role_id, input.name, guard_scope.clone()))
    }

    pub(super) async fn update_role_impl(
        &self,
        guard_scope: &GuardScope,
        input: RoleUpdate,
    ) -> AppResult<Role> {
        let mut transaction = self.begin().await?;
        lock_role(&mut transaction, guard_scope, input.role_id).await?;

        sqlx::query(
            r#"
            UPDATE roles
            SET name = $3, updated_at = now()
            WHERE id = $1 AND guard_scope = $2
            "#,
        )
        .bind(input.role_id.as_i64())
        .bind(guard_scope.as_str())
        .bind(input.name.as_str())
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, &input.name))?;
        RoleSaveStage::RoleUpserted.trace(guard_scope, input.name.as_str());

        write_role_permissions(
            &mut transaction,
            guard_scope,
            input.role_id,
            &input.permission_ids,
        )
        .await?;
        RoleSaveStage::PermissionsSynced.trace(guard_scope, input.name.as_str());
        commit(transaction).await?;

        Ok(Role::new(input.role_id, input.name, guard_scope.clone()))
    }

    pub(super) async fn delete_roles_impl(
        &self,
        guard_scope: &GuardScope,
        role_ids: &[RoleId],
    ) -> AppResult<u64> {
        if role_ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<i64> = role_ids.iter().map(RoleId::as_i64).collect();
        let removed = sqlx::query(
            r#"
            DELETE FROM roles
            WHERE guard_scope = $1 AND id = ANY($2)
            "#,
        )
        .bind(guard_scope.as_str())
        .bind(&ids)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete roles: {error}")))?
        .rows_affected();

        Ok(removed)
    }
}

/// Builds an `ILIKE` pattern matching the fragment literally.
pub(super) fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for character in fragment.chars() {
        if matches!(character, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(character);
    }
    pattern.push('%');
    pattern
}
