use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;

use crate::api::models::{PaginatedResponse, RankingItem};
use crate::database;
use crate::domain::EloDomain;

use super::{AppState, PageParams};

pub async fn get_ranking(
    State(state): State<Arc<AppState>>,
    Path(domain): Path<String>,
    Query(params): Query<PageParams>,
) -> impl IntoResponse {
    let Some(domain) = EloDomain::parse(&domain) else {
        return (StatusCode::BAD_REQUEST, format!("Unknown rating domain: {}", domain))
            .into_response();
    };

    let (page, page_size, offset) = params.resolve();

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let (rows, total) = match database::derived::ranking_page(&mut conn, domain, page_size, offset) {
        Ok(result) => result,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    };

    let items: Vec<RankingItem> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| RankingItem {
            rank: offset + i + 1,
            player_id: row.player_id,
            name: format!("{} {}", row.first_name, row.last_name),
            rating: row.rating,
            match_count: row.match_count,
        })
        .collect();

    Json(PaginatedResponse {
        items,
        total,
        page,
        page_size,
    })
    .into_response()
}
