//! Shared primitives for all Rust crates in Rolegrid.

#![forbid(unsafe_code)]

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type used across Rolegrid crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Guard scope used as the partition key for roles, menus and permissions.
///
/// A guard scope separates, for example, back-office administrators from
/// end users so that role names never collide across contexts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GuardScope(String);

impl GuardScope {
    /// Guard scope used by the admin console when none is configured.
    pub const DEFAULT_ADMIN: &'static str = "admin";

    /// Creates a validated guard scope.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "guard scope must not be empty".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the admin guard scope.
    #[must_use]
    pub fn admin() -> Self {
        Self(Self::DEFAULT_ADMIN.to_owned())
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for GuardScope {
    fn default() -> Self {
        Self::admin()
    }
}

impl Display for GuardScope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Role name already taken inside its guard scope.
    #[error("duplicate name: {0}")]
    DuplicateName(String),

    /// Persistence layer failed to replace a role permission set.
    #[error("permission sync failed: {0}")]
    SyncFailure(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}
