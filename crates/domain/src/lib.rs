//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod ids;
mod menu;
mod role;
mod tree;

pub use ids::{MenuId, PermissionId, RoleId};
pub use menu::{MenuNode, MenuPermission, MenuStatus, Permission};
pub use role::{ROLE_NAME_MAX_LENGTH, Role, RoleName};
pub use tree::{
    FlatTreeEntry, TreeNode, TreeRecord, build_tree, flatten_tree, map_tree, tree_depth,
    tree_keys,
};
