use super::*;

use crate::rbac_ports::{RoleListQuery, RolePage};

impl RoleAdminService {
    /// Returns one page of roles in guard scope, ordered by id.
    pub async fn list_roles(
        &self,
        guard_scope: &GuardScope,
        query: &RoleListQuery,
    ) -> AppResult<RolePage> {
        self.role_repository.list_roles(guard_scope, query).await
    }
}
