use std::sync::Arc;

use rolegrid_application::{
    MenuRepository, PermissionRepository, RoleAdminService, RolePermissionRepository,
    RoleRepository,
};
use rolegrid_core::{AppResult, GuardScope};
use rolegrid_infrastructure::{InMemoryRbacRepository, PostgresRbacRepository};
use sqlx::PgPool;

use crate::state::AppState;

use super::demo_seed::seed_demo_menu;

pub fn build_postgres_state(pool: PgPool, guard_scope: GuardScope) -> AppState {
    build_app_state(Arc::new(PostgresRbacRepository::new(pool)), guard_scope)
}

pub async fn build_memory_state(guard_scope: GuardScope) -> AppResult<AppState> {
    let repository = Arc::new(InMemoryRbacRepository::new());
    seed_demo_menu(&repository, &guard_scope).await?;

    Ok(build_app_state(repository, guard_scope))
}

fn build_app_state<R>(repository: Arc<R>, guard_scope: GuardScope) -> AppState
where
    R: MenuRepository + PermissionRepository + RoleRepository + RolePermissionRepository + 'static,
{
    AppState {
        role_admin_service: RoleAdminService::new(
            repository.clone(),
            repository.clone(),
            repository.clone(),
            repository,
        ),
        guard_scope,
    }
}
