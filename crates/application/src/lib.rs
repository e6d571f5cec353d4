//! Application services and ports.

#![forbid(unsafe_code)]

mod permission_resolver;
mod rbac_ports;
mod role_admin_service;
mod role_checklist_projector;
mod role_permission_synchronizer;

#[cfg(test)]
mod test_support;

pub use permission_resolver::PermissionResolver;
pub use rbac_ports::{
    DEFAULT_ROLES_PER_PAGE, MAX_ROLES_PER_PAGE, MenuFilter, MenuRepository, NewRole,
    PermissionRepository, RoleListQuery, RolePage, RolePermissionRepository, RoleRepository,
    RoleSummary, RoleUpdate,
};
pub use role_admin_service::{
    CreateRoleInput, ROLE_INDEX_REDIRECT, RoleAdminService, RoleFormPayload, RoleSaveStage,
    UpdateRoleInput,
};
pub use role_checklist_projector::RoleChecklistProjector;
pub use role_permission_synchronizer::RolePermissionSynchronizer;
