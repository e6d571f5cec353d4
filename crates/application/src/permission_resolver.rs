use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rolegrid_core::{AppResult, GuardScope};
use rolegrid_domain::{MenuId, PermissionId};

use crate::rbac_ports::PermissionRepository;

/// Resolves menu node ids into the permission ids gating them.
#[derive(Clone)]
pub struct PermissionResolver {
    repository: Arc<dyn PermissionRepository>,
}

impl PermissionResolver {
    /// Creates a resolver backed by the permission store.
    #[must_use]
    pub fn new(repository: Arc<dyn PermissionRepository>) -> Self {
        Self { repository }
    }

    /// Returns the deduplicated permission ids tied to the given menu nodes.
    ///
    /// Empty input short-circuits without touching the store. Menu ids that
    /// map to no permission are omitted.
    pub async fn resolve_permission_ids(
        &self,
        guard_scope: &GuardScope,
        menu_ids: &[MenuId],
    ) -> AppResult<BTreeSet<PermissionId>> {
        Ok(self
            .resolve_by_menu(guard_scope, menu_ids)
            .await?
            .into_values()
            .flatten()
            .collect())
    }

    /// Returns permission ids grouped by menu node, using one store lookup.
    pub async fn resolve_by_menu(
        &self,
        guard_scope: &GuardScope,
        menu_ids: &[MenuId],
    ) -> AppResult<BTreeMap<MenuId, BTreeSet<PermissionId>>> {
        let requested: BTreeSet<MenuId> = menu_ids.iter().copied().collect();
        if requested.is_empty() {
            return Ok(BTreeMap::new());
        }

        let lookup: Vec<MenuId> = requested.iter().copied().collect();
        let rows = self
            .repository
            .find_permission_ids_by_menu_ids(guard_scope, &lookup)
            .await?;

        let mut by_menu: BTreeMap<MenuId, BTreeSet<PermissionId>> = BTreeMap::new();
        for row in rows {
            if requested.contains(&row.menu_id) {
                by_menu
                    .entry(row.menu_id)
                    .or_default()
                    .insert(row.permission_id);
            }
        }

        Ok(by_menu)
    }
}
