use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use log::{error, info};

use crate::services::processing::RecomputeService;

use super::AppState;

/// Forced recompute trigger. Runs in the background; readers keep seeing
/// the previous derived dataset until the new one is committed.
pub async fn admin_recompute(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok());
    let expected = format!("Bearer {}", state.config.server.admin_token);
    if auth_header != Some(expected.as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    tokio::task::spawn_blocking(move || {
        info!("Admin triggered recompute started");
        let service = RecomputeService::new(state.config.clone(), state.pool.clone());
        match service.run() {
            Ok(()) => info!("Admin triggered recompute completed successfully"),
            Err(e) => error!("Admin triggered recompute failed: {:?}", e),
        }
    });

    (StatusCode::ACCEPTED, "Recompute triggered").into_response()
}
