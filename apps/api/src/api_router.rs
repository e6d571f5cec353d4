use axum::Router;
use axum::routing::{get, post, put};
use rolegrid_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

mod cors;

use cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let role_routes = Router::new()
        .route(
            "/api/admin/roles",
            get(handlers::roles::list_roles_handler).post(handlers::roles::store_role_handler),
        )
        .route(
            "/api/admin/roles/form",
            get(handlers::roles::role_create_form_handler),
        )
        .route(
            "/api/admin/roles/delete",
            post(handlers::roles::delete_roles_handler),
        )
        .route(
            "/api/admin/roles/{role_id}",
            put(handlers::roles::save_role_handler).delete(handlers::roles::delete_role_handler),
        )
        .route(
            "/api/admin/roles/{role_id}/edit",
            get(handlers::roles::role_edit_form_handler),
        )
        .route(
            "/api/admin/roles/{role_id}/permissions",
            put(handlers::roles::sync_role_permissions_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(role_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
