use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingItem {
    pub rank: usize,
    pub player_id: i64,
    pub name: String,
    pub rating: f64,
    pub match_count: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player_id: i64,
    pub name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainCounts {
    pub single: i64,
    pub double: i64,
    pub combined: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail {
    pub player_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub name: String,
    pub single: f64,
    pub double: f64,
    pub combined: f64,
    pub match_counts: DomainCounts,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRef {
    pub player_id: i64,
    pub name: String,
}

/// One rating-history entry, reoriented to the queried player's side.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub date: String,
    pub competition_name: String,
    pub competition_type: &'static str,
    pub match_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<PlayerRef>,
    pub opponent1: PlayerRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent2: Option<PlayerRef>,
    pub my_score: i32,
    pub opponent_score: i32,
    pub rating: f64,
    pub delta: f64,
}

#[derive(Serialize, Default, Clone, Copy)]
#[serde(rename_all = "camelCase")]
pub struct VersusCounts {
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub rating_delta: f64,
}

/// Aggregates against one other player in one relationship, with a bucket
/// per domain the pair actually met in.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersusEntry {
    pub other_player_id: i64,
    pub other_name: String,
    pub relationship: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single: Option<VersusCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double: Option<VersusCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub combined: Option<VersusCounts>,
}
