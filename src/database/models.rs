use chrono::NaiveDateTime;

use crate::domain::CompetitionKind;

/// One row of a ranking page: snapshot rating plus how many played matches
/// back it in that domain.
#[derive(Debug, Clone)]
pub struct RankedPlayerRow {
    pub player_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub rating: f64,
    pub match_count: i64,
}

/// One rating-history row as stored, before reorienting it to the queried
/// player's perspective. p1/p11 are side one, p2/p22 side two; p11/p22 are
/// zero for singles.
#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub match_type: i32,
    pub score1: i32,
    pub score2: i32,
    pub p1: i64,
    pub p2: i64,
    pub p11: i64,
    pub p22: i64,
    pub competition_name: String,
    pub competition_kind: CompetitionKind,
    pub date: NaiveDateTime,
    pub rating: f64,
    pub delta: f64,
}
