use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::api::handlers::{
    AppState,
    admin::admin_recompute,
    players::{get_player_detail, get_player_history, get_player_versus, search_players},
    ranking::get_ranking,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/players", get(search_players))
        .route("/api/ranking/:domain", get(get_ranking))
        .route("/api/player/:id", get(get_player_detail))
        .route("/api/player/:id/history/:domain", get(get_player_history))
        .route("/api/player/:id/versus", get(get_player_versus))
        .route("/api/admin/recompute", post(admin_recompute))
        .with_state(state)
}
