use axum::Json;
use axum::extract::State;

use crate::dto::HealthResponse;
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        guard_scope: state.guard_scope.as_str().to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use axum::extract::State;
    use rolegrid_core::GuardScope;

    use crate::api_services::build_memory_state;

    use super::health_handler;

    #[tokio::test]
    async fn health_reports_configured_guard_scope() {
        let state = build_memory_state(GuardScope::admin())
            .await
            .unwrap_or_else(|_| unreachable!());

        let response = health_handler(State(state)).await;

        assert_eq!(response.status, "ok");
        assert_eq!(response.guard_scope, "admin");
    }
}
