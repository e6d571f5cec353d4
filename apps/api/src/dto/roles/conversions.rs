use std::collections::BTreeSet;

use rolegrid_application::{RoleFormPayload, RolePage, RoleSummary};
use rolegrid_core::{AppError, AppResult};
use rolegrid_domain::{MenuId, Role, TreeNode, map_tree, tree_depth};

use super::{
    MenuIdInput, MenuTreeNodeResponse, RoleFormResponse, RolePageResponse, RoleResponse,
    RoleSummaryResponse,
};

impl MenuIdInput {
    /// Parses the submitted value. Blank and zero entries carry no selection
    /// and yield `None`.
    fn into_menu_id(self) -> AppResult<Option<MenuId>> {
        let value = match self {
            Self::Number(value) => value,
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }

                trimmed.parse::<i64>().map_err(|_| {
                    AppError::Validation(format!("menu id '{trimmed}' is not a number"))
                })?
            }
        };

        if value == 0 {
            return Ok(None);
        }

        MenuId::new(value).map(Some)
    }
}

/// Parses submitted menu ids, dropping empty entries and duplicates.
pub fn parse_menu_ids(values: Vec<MenuIdInput>) -> AppResult<Vec<MenuId>> {
    let mut seen = BTreeSet::new();
    let mut menu_ids = Vec::with_capacity(values.len());
    for value in values {
        if let Some(menu_id) = value.into_menu_id()?
            && seen.insert(menu_id)
        {
            menu_ids.push(menu_id);
        }
    }

    Ok(menu_ids)
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            role_id: value.id().as_i64(),
            name: value.name().as_str().to_owned(),
            guard_scope: value.guard_scope().as_str().to_owned(),
        }
    }
}

impl From<RoleSummary> for RoleSummaryResponse {
    fn from(value: RoleSummary) -> Self {
        Self {
            role_id: value.role_id.as_i64(),
            name: value.name,
            guard_scope: value.guard_scope,
            created_at: value.created_at,
        }
    }
}

impl From<RolePage> for RolePageResponse {
    fn from(value: RolePage) -> Self {
        Self {
            items: value
                .items
                .into_iter()
                .map(RoleSummaryResponse::from)
                .collect(),
            total: value.total,
            page: value.page,
            per_page: value.per_page,
        }
    }
}

/// Deepest menu tree a form response renders.
pub(super) const MAX_RENDERED_TREE_DEPTH: usize = 128;

pub(super) fn menu_tree_response(roots: &[TreeNode]) -> Vec<MenuTreeNodeResponse> {
    map_tree(roots, |node, children| MenuTreeNodeResponse {
        key: node.key().to_owned(),
        title: node.title().to_owned(),
        children,
    })
}

impl TryFrom<RoleFormPayload> for RoleFormResponse {
    type Error = AppError;

    fn try_from(value: RoleFormPayload) -> AppResult<Self> {
        let depth = tree_depth(&value.menu_tree);
        if depth > MAX_RENDERED_TREE_DEPTH {
            return Err(AppError::Internal(format!(
                "menu tree is {depth} levels deep, forms render at most {MAX_RENDERED_TREE_DEPTH}"
            )));
        }

        Ok(Self {
            role: value.role.map(RoleResponse::from),
            menu_tree: menu_tree_response(&value.menu_tree),
            checked_menu_keys: value.checked_menu_keys,
        })
    }
}
