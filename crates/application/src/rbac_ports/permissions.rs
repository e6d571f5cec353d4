use async_trait::async_trait;

use rolegrid_core::{AppResult, GuardScope};
use rolegrid_domain::{MenuId, MenuPermission};

/// Repository port for the permission store.
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Finds every permission tied to one of the given menu nodes.
    ///
    /// Menu ids without permissions contribute no rows.
    async fn find_permission_ids_by_menu_ids(
        &self,
        guard_scope: &GuardScope,
        menu_ids: &[MenuId],
    ) -> AppResult<Vec<MenuPermission>>;
}
