use crate::domain::EloDomain;

pub type PlayerId = i64;
pub type PlayedMatchId = i64;
pub type MatchId = i64;

/// One per-player fan-out row of a match. Ids are fresh surrogates assigned
/// in replay order each pass; they are not stable across recomputes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedMatch {
    pub id: PlayedMatchId,
    pub player_id: PlayerId,
    pub match_id: MatchId,
}

/// One rating transition in a domain ledger: the player's rating right
/// after the played match, and the signed change it applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingEntry {
    pub played_match_id: PlayedMatchId,
    pub player_id: PlayerId,
    pub rating: f64,
    pub delta: f64,
}

/// Final rating per player per domain after the full replay.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentRating {
    pub player_id: PlayerId,
    pub single: f64,
    pub double: f64,
    pub combined: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PairRelation {
    Opponent,
    Partner,
}

impl PairRelation {
    pub fn to_code(self) -> i32 {
        match self {
            PairRelation::Opponent => 1,
            PairRelation::Partner => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(PairRelation::Opponent),
            2 => Some(PairRelation::Partner),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PairRelation::Opponent => "opponent",
            PairRelation::Partner => "partner",
        }
    }
}

/// Aggregated outcome counts and rating transfer of one ordered player pair
/// in one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct PairStat {
    pub player_id: PlayerId,
    pub other_id: PlayerId,
    pub relation: PairRelation,
    pub domain: EloDomain,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub delta: f64,
}

/// The complete derived dataset of one recompute pass, handed to storage
/// as an atomic replacement set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecomputeOutput {
    pub played_matches: Vec<PlayedMatch>,
    pub single_entries: Vec<RatingEntry>,
    pub double_entries: Vec<RatingEntry>,
    pub combined_entries: Vec<RatingEntry>,
    pub current_ratings: Vec<CurrentRating>,
    pub pair_stats: Vec<PairStat>,
}

impl RecomputeOutput {
    pub fn entries(&self, domain: EloDomain) -> &[RatingEntry] {
        match domain {
            EloDomain::Single => &self.single_entries,
            EloDomain::Double => &self.double_entries,
            EloDomain::Combined => &self.combined_entries,
        }
    }
}
