use rolegrid_core::{AppError, AppResult, GuardScope};
use serde::{Deserialize, Serialize};

use crate::ids::RoleId;

/// Maximum role name length, in characters.
pub const ROLE_NAME_MAX_LENGTH: usize = 20;

/// Validated role name, trimmed and bounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleName(String);

impl RoleName {
    /// Creates a validated role name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation("role name is required".to_owned()));
        }

        if trimmed.chars().count() > ROLE_NAME_MAX_LENGTH {
            return Err(AppError::Validation(format!(
                "role name must not exceed {ROLE_NAME_MAX_LENGTH} characters"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

/// Role owning a set of permissions inside one guard scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    id: RoleId,
    name: RoleName,
    guard_scope: GuardScope,
}

impl Role {
    /// Creates a role from validated parts.
    #[must_use]
    pub fn new(id: RoleId, name: RoleName, guard_scope: GuardScope) -> Self {
        Self {
            id,
            name,
            guard_scope,
        }
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the role name.
    #[must_use]
    pub fn name(&self) -> &RoleName {
        &self.name
    }

    /// Returns the guard scope owning the role.
    #[must_use]
    pub fn guard_scope(&self) -> &GuardScope {
        &self.guard_scope
    }
}
