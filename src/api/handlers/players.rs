use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};

use crate::api::models::{
    DomainCounts, HistoryItem, PaginatedResponse, PlayerDetail, PlayerRef, PlayerSummary,
    VersusCounts, VersusEntry,
};
use crate::database::{self, models::HistoryRow};
use crate::domain::{EloDomain, Player};
use crate::rating::PairStat;

use super::{AppState, PageParams, SearchParams};

pub async fn search_players(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let pattern = params.filter.unwrap_or_default();
    let players = match database::players::search_by_name(&mut conn, &pattern) {
        Ok(players) => players,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    };

    let items: Vec<PlayerSummary> = players
        .into_iter()
        .map(|p| PlayerSummary {
            player_id: p.id,
            name: p.display_name(),
        })
        .collect();

    Json(items).into_response()
}

pub async fn get_player_detail(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let player = match database::players::find_by_id(&mut conn, player_id) {
        Ok(Some(player)) => player,
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    };

    // Before the first recompute there is no snapshot row; everyone holds
    // the initial rating then.
    let initial = state.config.rating.initial_rating;
    let current = match database::derived::current_ratings(&mut conn, player_id) {
        Ok(current) => current,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    };
    let (single, double, combined) = current
        .map(|c| (c.single, c.double, c.combined))
        .unwrap_or((initial, initial, initial));

    let mut counts = [0i64; 3];
    for (slot, domain) in counts
        .iter_mut()
        .zip([EloDomain::Single, EloDomain::Double, EloDomain::Combined])
    {
        *slot = match database::derived::match_count(&mut conn, player_id, domain) {
            Ok(count) => count,
            Err(e) => {
                return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                    .into_response();
            }
        };
    }

    Json(PlayerDetail {
        player_id: player.id,
        name: player.display_name(),
        first_name: player.first_name,
        last_name: player.last_name,
        single,
        double,
        combined,
        match_counts: DomainCounts {
            single: counts[0],
            double: counts[1],
            combined: counts[2],
        },
    })
    .into_response()
}

pub async fn get_player_history(
    State(state): State<Arc<AppState>>,
    Path((player_id, domain)): Path<(i64, String)>,
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

    match database::players::find_by_id(&mut conn, player_id) {
        Ok(Some(_)) => {}
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    }

    let rows = match database::derived::rating_history(&mut conn, player_id, domain, page_size, offset) {
        Ok(rows) => rows,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    };

    let total = match database::derived::match_count(&mut conn, player_id, domain) {
        Ok(total) => total,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    };

    let players = match database::players::map_by_id(&mut conn) {
        Ok(players) => players,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    };

    let items: Vec<HistoryItem> = rows
        .into_iter()
        .map(|row| history_item(player_id, row, &players))
        .collect();

    Json(PaginatedResponse {
        items,
        total,
        page,
        page_size,
    })
    .into_response()
}

/// Reorients a stored history row so the queried player is side one, then
/// resolves the other participants' names.
fn history_item(player_id: i64, row: HistoryRow, players: &HashMap<i64, Player>) -> HistoryItem {
    let HistoryRow {
        match_type,
        mut score1,
        mut score2,
        mut p1,
        mut p2,
        mut p11,
        mut p22,
        competition_name,
        competition_kind,
        date,
        rating,
        delta,
    } = row;

    if p2 == player_id || p22 == player_id {
        std::mem::swap(&mut p1, &mut p2);
        std::mem::swap(&mut p11, &mut p22);
        std::mem::swap(&mut score1, &mut score2);
    }
    if p11 == player_id {
        std::mem::swap(&mut p1, &mut p11);
    }

    let player_ref = |id: i64| PlayerRef {
        player_id: id,
        name: players
            .get(&id)
            .map(|p| p.display_name())
            .unwrap_or_else(|| format!("Player {}", id)),
    };

    let is_double = match_type == 2;

    HistoryItem {
        date: date.format("%Y-%m-%dT%H:%M:%S").to_string(),
        competition_name,
        competition_type: competition_kind.as_str(),
        match_type: if is_double { "double" } else { "single" },
        partner: is_double.then(|| player_ref(p11)),
        opponent1: player_ref(p2),
        opponent2: is_double.then(|| player_ref(p22)),
        my_score: score1,
        opponent_score: score2,
        rating,
        delta,
    }
}

pub async fn get_player_versus(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> impl IntoResponse {
    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::players::find_by_id(&mut conn, player_id) {
        Ok(Some(_)) => {}
        Ok(None) => return StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    }

    let stats = match database::derived::pair_stats_for_player(&mut conn, player_id) {
        Ok(stats) => stats,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    };

    let players = match database::players::map_by_id(&mut conn) {
        Ok(players) => players,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e))
                .into_response();
        }
    };

    Json(group_versus_entries(stats, &players)).into_response()
}

/// Folds per-domain pair rows into one entry per (other player, relation),
/// keeping the incoming (other_id, relation, domain) order.
fn group_versus_entries(stats: Vec<PairStat>, players: &HashMap<i64, Player>) -> Vec<VersusEntry> {
    let mut entries: Vec<VersusEntry> = Vec::new();

    for stat in stats {
        let relationship = stat.relation.as_str();
        let matches_entry = |e: &VersusEntry| {
            e.other_player_id == stat.other_id && e.relationship == relationship
        };

        if !entries.last().map(matches_entry).unwrap_or(false) {
            entries.push(VersusEntry {
                other_player_id: stat.other_id,
                other_name: players
                    .get(&stat.other_id)
                    .map(|p| p.display_name())
                    .unwrap_or_else(|| format!("Player {}", stat.other_id)),
                relationship,
                single: None,
                double: None,
                combined: None,
            });
        }

        if let Some(entry) = entries.last_mut() {
            let counts = VersusCounts {
                wins: stat.wins,
                draws: stat.draws,
                losses: stat.losses,
                rating_delta: stat.delta,
            };
            match stat.domain {
                EloDomain::Single => entry.single = Some(counts),
                EloDomain::Double => entry.double = Some(counts),
                EloDomain::Combined => entry.combined = Some(counts),
            }
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CompetitionKind;
    use crate::rating::PairRelation;
    use chrono::NaiveDate;

    fn players() -> HashMap<i64, Player> {
        [(1, "Ada"), (2, "Alan"), (3, "Grace"), (4, "Edsger")]
            .into_iter()
            .map(|(id, first)| {
                (
                    id,
                    Player {
                        id,
                        first_name: first.to_string(),
                        last_name: "Test".to_string(),
                    },
                )
            })
            .collect()
    }

    fn double_row(p1: i64, p2: i64, p11: i64, p22: i64) -> HistoryRow {
        HistoryRow {
            match_type: 2,
            score1: 1,
            score2: 0,
            p1,
            p2,
            p11,
            p22,
            competition_name: "Liga".to_string(),
            competition_kind: CompetitionKind::League,
            date: NaiveDate::from_ymd_opt(2023, 4, 1)
                .unwrap()
                .and_hms_opt(18, 0, 0)
                .unwrap(),
            rating: 1010.0,
            delta: 10.0,
        }
    }

    #[test]
    fn history_keeps_side_one_perspective_for_side_one_players() {
        let item = history_item(1, double_row(1, 2, 3, 4), &players());
        assert_eq!(item.my_score, 1);
        assert_eq!(item.partner.as_ref().unwrap().player_id, 3);
        assert_eq!(item.opponent1.player_id, 2);
        assert_eq!(item.opponent2.as_ref().unwrap().player_id, 4);
    }

    #[test]
    fn history_swaps_sides_for_side_two_players() {
        // Player 4 is side two's second player; scores and sides flip.
        let item = history_item(4, double_row(1, 2, 3, 4), &players());
        assert_eq!(item.my_score, 0);
        assert_eq!(item.opponent_score, 1);
        assert_eq!(item.partner.as_ref().unwrap().player_id, 2);
        assert_eq!(item.opponent1.player_id, 1);
        assert_eq!(item.opponent2.as_ref().unwrap().player_id, 3);
    }

    #[test]
    fn history_promotes_the_second_teammate_to_front() {
        let item = history_item(3, double_row(1, 2, 3, 4), &players());
        assert_eq!(item.my_score, 1);
        assert_eq!(item.partner.as_ref().unwrap().player_id, 1);
    }

    #[test]
    fn versus_entries_group_domains_per_pair() {
        use crate::rating::PairStat;

        let stats = vec![
            PairStat {
                player_id: 1,
                other_id: 2,
                relation: PairRelation::Opponent,
                domain: EloDomain::Single,
                wins: 2,
                draws: 0,
                losses: 1,
                delta: 14.0,
            },
            PairStat {
                player_id: 1,
                other_id: 2,
                relation: PairRelation::Opponent,
                domain: EloDomain::Combined,
                wins: 3,
                draws: 1,
                losses: 1,
                delta: 20.0,
            },
            PairStat {
                player_id: 1,
                other_id: 2,
                relation: PairRelation::Partner,
                domain: EloDomain::Double,
                wins: 1,
                draws: 1,
                losses: 0,
                delta: 6.0,
            },
        ];

        let entries = group_versus_entries(stats, &players());
        assert_eq!(entries.len(), 2);

        let opponent = &entries[0];
        assert_eq!(opponent.relationship, "opponent");
        assert!(opponent.single.is_some());
        assert!(opponent.double.is_none());
        assert_eq!(opponent.combined.unwrap().wins, 3);

        let partner = &entries[1];
        assert_eq!(partner.relationship, "partner");
        assert_eq!(partner.double.unwrap().draws, 1);
    }
}
