use rolegrid_application::RoleAdminService;
use rolegrid_core::GuardScope;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub role_admin_service: RoleAdminService,
    pub guard_scope: GuardScope,
}
