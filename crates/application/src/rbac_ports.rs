mod menus;
mod permissions;
mod role_permissions;
mod roles;

pub use menus::{MenuFilter, MenuRepository};
pub use permissions::PermissionRepository;
pub use role_permissions::RolePermissionRepository;
pub use roles::{
    DEFAULT_ROLES_PER_PAGE, MAX_ROLES_PER_PAGE, NewRole, RoleListQuery, RolePage, RoleRepository,
    RoleSummary, RoleUpdate,
};
