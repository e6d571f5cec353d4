use rolegrid_core::{AppResult, GuardScope};
use rolegrid_domain::{MenuNode, MenuStatus, Permission};
use rolegrid_infrastructure::InMemoryRbacRepository;
use tracing::info;

/// `(id, parent_id, label)` of the demo admin menu.
const DEMO_MENUS: &[(i64, i64, &str)] = &[
    (1, 0, "System"),
    (2, 1, "Users"),
    (3, 1, "Roles"),
    (4, 1, "Menus"),
    (5, 0, "Settings"),
    (6, 5, "Audit log"),
];

/// `(id, menu_id, name)` of the permissions gating the demo menu.
const DEMO_PERMISSIONS: &[(i64, i64, &str)] = &[
    (1, 2, "users.index"),
    (2, 2, "users.create"),
    (3, 2, "users.edit"),
    (4, 3, "roles.index"),
    (5, 3, "roles.create"),
    (6, 3, "roles.edit"),
    (7, 3, "roles.delete"),
    (8, 4, "menus.index"),
    (9, 5, "settings.edit"),
    (10, 6, "audit.index"),
];

/// Seeds the in-memory store with a small admin menu so forms have a tree.
pub(super) async fn seed_demo_menu(
    repository: &InMemoryRbacRepository,
    guard_scope: &GuardScope,
) -> AppResult<()> {
    for (id, parent_id, label) in DEMO_MENUS {
        let menu = MenuNode::new(
            *id,
            *parent_id,
            *label,
            MenuStatus::Active,
            guard_scope.clone(),
        )?;
        repository.insert_menu(menu).await?;
    }

    for (id, menu_id, name) in DEMO_PERMISSIONS {
        let permission = Permission::new(*id, Some(*menu_id), *name, guard_scope.clone())?;
        repository.insert_permission(permission).await?;
    }

    info!(
        guard_scope = guard_scope.as_str(),
        menus = DEMO_MENUS.len(),
        permissions = DEMO_PERMISSIONS.len(),
        "seeded in-memory demo menu"
    );

    Ok(())
}
