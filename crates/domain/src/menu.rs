use std::str::FromStr;

use rolegrid_core::{AppError, AppResult, GuardScope, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::ids::{MenuId, PermissionId};

/// Visibility status of a menu node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuStatus {
    /// Node is shown and can be granted.
    Active,
    /// Node is hidden from trees.
    Inactive,
}

impl MenuStatus {
    /// Returns a stable storage value for this status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for MenuStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown menu status '{value}'"
            ))),
        }
    }
}

/// Navigational unit of the admin console, gated by one or more permissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    id: MenuId,
    parent_id: MenuId,
    label: NonEmptyString,
    status: MenuStatus,
    guard_scope: GuardScope,
}

impl MenuNode {
    /// Creates a validated menu node. A `parent_id` of `0` marks a top-level node.
    pub fn new(
        id: i64,
        parent_id: i64,
        label: impl Into<String>,
        status: MenuStatus,
        guard_scope: GuardScope,
    ) -> AppResult<Self> {
        let id = MenuId::new(id)?;
        let parent_id = MenuId::parent(parent_id)?;
        if id == parent_id {
            return Err(AppError::Validation(format!(
                "menu {id} cannot be its own parent"
            )));
        }

        Ok(Self {
            id,
            parent_id,
            label: NonEmptyString::new(label)?,
            status,
            guard_scope,
        })
    }

    /// Returns the menu identifier.
    #[must_use]
    pub fn id(&self) -> MenuId {
        self.id
    }

    /// Returns the parent identifier, [`MenuId::ROOT`] for top-level nodes.
    #[must_use]
    pub fn parent_id(&self) -> MenuId {
        self.parent_id
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &NonEmptyString {
        &self.label
    }

    /// Returns the visibility status.
    #[must_use]
    pub fn status(&self) -> MenuStatus {
        self.status
    }

    /// Returns the guard scope owning the node.
    #[must_use]
    pub fn guard_scope(&self) -> &GuardScope {
        &self.guard_scope
    }
}

/// Permission row, optionally tied to the menu node it gates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    id: PermissionId,
    menu_id: Option<MenuId>,
    name: NonEmptyString,
    guard_scope: GuardScope,
}

impl Permission {
    /// Creates a validated permission.
    pub fn new(
        id: i64,
        menu_id: Option<i64>,
        name: impl Into<String>,
        guard_scope: GuardScope,
    ) -> AppResult<Self> {
        Ok(Self {
            id: PermissionId::new(id)?,
            menu_id: menu_id.map(MenuId::new).transpose()?,
            name: NonEmptyString::new(name)?,
            guard_scope,
        })
    }

    /// Returns the permission identifier.
    #[must_use]
    pub fn id(&self) -> PermissionId {
        self.id
    }

    /// Returns the gated menu node, if any.
    #[must_use]
    pub fn menu_id(&self) -> Option<MenuId> {
        self.menu_id
    }

    /// Returns the permission name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the guard scope owning the permission.
    #[must_use]
    pub fn guard_scope(&self) -> &GuardScope {
        &self.guard_scope
    }
}

/// Menu-to-permission mapping row returned by permission lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuPermission {
    /// Permission identifier.
    pub permission_id: PermissionId,
    /// Menu node gated by the permission.
    pub menu_id: MenuId,
}
