use async_trait::async_trait;

use rolegrid_core::{AppResult, GuardScope};
use rolegrid_domain::{MenuNode, MenuStatus};

/// Filter applied when listing menu nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuFilter {
    /// Only nodes in this status are returned.
    pub status: MenuStatus,
    /// Guard scope owning the nodes.
    pub guard_scope: GuardScope,
}

impl MenuFilter {
    /// Filter for nodes rendered in permission pickers.
    #[must_use]
    pub fn active(guard_scope: &GuardScope) -> Self {
        Self {
            status: MenuStatus::Active,
            guard_scope: guard_scope.clone(),
        }
    }
}

/// Repository port for the menu source.
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Lists menu nodes matching the filter, in storage order.
    async fn list_menus(&self, filter: MenuFilter) -> AppResult<Vec<MenuNode>>;
}
