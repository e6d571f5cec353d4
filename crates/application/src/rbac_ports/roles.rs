use std::collections::BTreeSet;

use async_trait::async_trait;

use rolegrid_core::{AppError, AppResult, GuardScope};
use rolegrid_domain::{PermissionId, Role, RoleId, RoleName};

/// Page size used when the caller does not ask for one.
pub const DEFAULT_ROLES_PER_PAGE: u32 = 10;

/// Largest accepted page size.
pub const MAX_ROLES_PER_PAGE: u32 = 100;

/// Query parameters for role listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleListQuery {
    /// Optional case-insensitive name fragment.
    pub name_contains: Option<String>,
    /// One-based page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
}

impl RoleListQuery {
    /// Creates a validated listing query, applying defaults.
    pub fn new(
        name_contains: Option<String>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::Validation(
                "page must be greater than or equal to 1".to_owned(),
            ));
        }

        let per_page = per_page.unwrap_or(DEFAULT_ROLES_PER_PAGE);
        if per_page == 0 || per_page > MAX_ROLES_PER_PAGE {
            return Err(AppError::Validation(format!(
                "per_page must be between 1 and {MAX_ROLES_PER_PAGE}"
            )));
        }

        let name_contains = name_contains.and_then(|value| {
            let trimmed = value.trim().to_owned();
            (!trimmed.is_empty()).then_some(trimmed)
        });

        Ok(Self {
            name_contains,
            page,
            per_page,
        })
    }

    /// Number of rows skipped before the requested page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

impl Default for RoleListQuery {
    fn default() -> Self {
        Self {
            name_contains: None,
            page: 1,
            per_page: DEFAULT_ROLES_PER_PAGE,
        }
    }
}

/// Role listing projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleSummary {
    /// Stable role identifier.
    pub role_id: RoleId,
    /// Role name.
    pub name: String,
    /// Guard scope owning the role.
    pub guard_scope: String,
    /// Creation timestamp in RFC3339.
    pub created_at: String,
}

/// One page of roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePage {
    /// Roles on the requested page, ordered by id.
    pub items: Vec<RoleSummary>,
    /// Total matching roles across all pages.
    pub total: u64,
    /// One-based page number.
    pub page: u32,
    /// Rows per page.
    pub per_page: u32,
}

/// Role creation payload persisted together with its permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Unique role name in guard scope.
    pub name: RoleName,
    /// Exact permission set held by the new role.
    pub permission_ids: BTreeSet<PermissionId>,
}

/// Role update payload persisted together with its permission set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleUpdate {
    /// Role being updated.
    pub role_id: RoleId,
    /// New role name.
    pub name: RoleName,
    /// Permission set replacing the current one.
    pub permission_ids: BTreeSet<PermissionId>,
}

/// Repository port for role records.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists one page of roles in guard scope.
    async fn list_roles(
        &self,
        guard_scope: &GuardScope,
        query: &RoleListQuery,
    ) -> AppResult<RolePage>;

    /// Finds a role by id in guard scope.
    async fn find_role(
        &self,
        guard_scope: &GuardScope,
        role_id: RoleId,
    ) -> AppResult<Option<Role>>;

    /// Creates a role and attaches its permission set in one atomic unit.
    ///
    /// Fails with [`AppError::DuplicateName`] when the name is taken.
    async fn create_role(&self, guard_scope: &GuardScope, input: NewRole) -> AppResult<Role>;

    /// Renames a role and replaces its permission set in one atomic unit.
    ///
    /// Fails with [`AppError::NotFound`] for unknown roles and
    /// [`AppError::DuplicateName`] when the name belongs to another role.
    async fn update_role(&self, guard_scope: &GuardScope, input: RoleUpdate) -> AppResult<Role>;

    /// Deletes roles and their permission links, returning the removed count.
    async fn delete_roles(&self, guard_scope: &GuardScope, role_ids: &[RoleId]) -> AppResult<u64>;
}
