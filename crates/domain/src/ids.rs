use std::fmt::{Display, Formatter};

use rolegrid_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Identifier of a menu node.
///
/// Real nodes always carry a positive value. [`MenuId::ROOT`] is the
/// sentinel parent id of top-level nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MenuId(i64);

impl MenuId {
    /// Parent id carried by top-level menu nodes.
    pub const ROOT: Self = Self(0);

    /// Creates a validated menu identifier.
    pub fn new(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "menu id must be a positive integer, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Creates a parent reference, accepting `0` as the root sentinel.
    pub fn parent(value: i64) -> AppResult<Self> {
        if value == 0 {
            return Ok(Self::ROOT);
        }

        Self::new(value)
    }

    /// Parses a tree key or transport string into a menu identifier.
    pub fn parse_key(value: &str) -> AppResult<Self> {
        let parsed = value.trim().parse::<i64>().map_err(|_| {
            AppError::Validation(format!("menu id '{value}' is not a valid integer"))
        })?;

        Self::new(parsed)
    }

    /// Returns whether this is the root sentinel.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == 0
    }

    /// Returns the underlying integer value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns the string key used by rendered trees.
    #[must_use]
    pub fn key(&self) -> String {
        self.0.to_string()
    }
}

impl Display for MenuId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a permission row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionId(i64);

impl PermissionId {
    /// Creates a validated permission identifier.
    pub fn new(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "permission id must be a positive integer, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the underlying integer value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for PermissionId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Identifier of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(i64);

impl RoleId {
    /// Creates a validated role identifier.
    pub fn new(value: i64) -> AppResult<Self> {
        if value <= 0 {
            return Err(AppError::Validation(format!(
                "role id must be a positive integer, got {value}"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the underlying integer value.
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for RoleId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{MenuId, PermissionId, RoleId};

    #[test]
    fn menu_id_rejects_non_positive_values() {
        assert!(MenuId::new(0).is_err());
        assert!(MenuId::new(-4).is_err());
        assert!(MenuId::new(4).is_ok());
    }

    #[test]
    fn menu_parent_accepts_root_sentinel() {
        let parent = MenuId::parent(0);
        assert!(parent.is_ok());
        assert!(parent.unwrap_or(MenuId::ROOT).is_root());
    }

    #[test]
    fn menu_key_parses_numeric_strings() {
        let parsed = MenuId::parse_key(" 42 ");
        assert!(parsed.is_ok());
        assert_eq!(parsed.map(|id| id.key()).unwrap_or_default(), "42");
        assert!(MenuId::parse_key("forty-two").is_err());
        assert!(MenuId::parse_key("").is_err());
    }

    #[test]
    fn role_and_permission_ids_reject_zero() {
        assert!(RoleId::new(0).is_err());
        assert!(PermissionId::new(0).is_err());
    }
}
