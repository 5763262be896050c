use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A player as registered on the league site. The id is the upstream id
/// and is stable across ingest runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl Player {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionKind {
    League,
    Cup,
    Tournament,
}

impl CompetitionKind {
    pub fn to_code(self) -> i32 {
        match self {
            CompetitionKind::League => 1,
            CompetitionKind::Cup => 2,
            CompetitionKind::Tournament => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(CompetitionKind::League),
            2 => Some(CompetitionKind::Cup),
            3 => Some(CompetitionKind::Tournament),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompetitionKind::League => "league",
            CompetitionKind::Cup => "cup",
            CompetitionKind::Tournament => "tournament",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Competition {
    pub id: i64,
    pub external_id: i64,
    pub kind: CompetitionKind,
    pub name: String,
    pub date: NaiveDateTime,
}

/// Participants of a match. Doubles teams are {a1, a2} vs {b1, b2};
/// scores are always from side one's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSides {
    Single { p1: i64, p2: i64 },
    Double { a1: i64, a2: i64, b1: i64, b2: i64 },
}

impl MatchSides {
    pub fn to_code(&self) -> i32 {
        match self {
            MatchSides::Single { .. } => 1,
            MatchSides::Double { .. } => 2,
        }
    }

    pub fn participants(&self) -> Vec<i64> {
        match *self {
            MatchSides::Single { p1, p2 } => vec![p1, p2],
            MatchSides::Double { a1, a2, b1, b2 } => vec![a1, a2, b1, b2],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Match {
    pub id: i64,
    pub competition_id: i64,
    pub position: i32,
    pub score1: i32,
    pub score2: i32,
    pub sides: MatchSides,
}

/// The three independent rating tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EloDomain {
    Single,
    Double,
    Combined,
}

impl EloDomain {
    pub fn to_code(self) -> i32 {
        match self {
            EloDomain::Single => 1,
            EloDomain::Double => 2,
            EloDomain::Combined => 3,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(EloDomain::Single),
            2 => Some(EloDomain::Double),
            3 => Some(EloDomain::Combined),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single" => Some(EloDomain::Single),
            "double" => Some(EloDomain::Double),
            "combined" => Some(EloDomain::Combined),
            _ => None,
        }
    }

    /// Name of the rating ledger table backing this domain.
    pub fn ledger_table(&self) -> &'static str {
        match self {
            EloDomain::Single => "elo_single",
            EloDomain::Double => "elo_double",
            EloDomain::Combined => "elo_combined",
        }
    }

    /// Column of this domain in the elo_current snapshot table.
    pub fn current_column(&self) -> &'static str {
        match self {
            EloDomain::Single => "single",
            EloDomain::Double => "double",
            EloDomain::Combined => "combined",
        }
    }
}

// --- Ingest dump file structures ---

/// One JSON dump file produced by the scraping pipeline.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFile {
    #[serde(default)]
    pub players: Vec<PlayerImport>,
    #[serde(default)]
    pub competitions: Vec<CompetitionImport>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerImport {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitionImport {
    pub external_id: i64,
    #[serde(rename = "type")]
    pub kind: CompetitionKind,
    pub name: String,
    pub date: String,
    #[serde(default)]
    pub matches: Vec<MatchImport>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchImport {
    pub position: i32,
    pub score1: i32,
    pub score2: i32,
    #[serde(flatten)]
    pub sides: MatchSidesImport,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MatchSidesImport {
    #[serde(rename_all = "camelCase")]
    Single { player1: i64, player2: i64 },
    #[serde(rename_all = "camelCase")]
    Double {
        team1_player1: i64,
        team1_player2: i64,
        team2_player1: i64,
        team2_player2: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competition_kind_codes_round_trip() {
        for kind in [
            CompetitionKind::League,
            CompetitionKind::Cup,
            CompetitionKind::Tournament,
        ] {
            assert_eq!(CompetitionKind::from_code(kind.to_code()), Some(kind));
        }
        assert_eq!(CompetitionKind::from_code(0), None);
    }

    #[test]
    fn domain_parses_from_path_segment() {
        assert_eq!(EloDomain::parse("single"), Some(EloDomain::Single));
        assert_eq!(EloDomain::parse("combined"), Some(EloDomain::Combined));
        assert_eq!(EloDomain::parse("triple"), None);
    }

    #[test]
    fn import_file_parses_both_match_shapes() {
        let json = r#"{
            "players": [
                {"id": 1, "firstName": "Ada", "lastName": "Lovelace"},
                {"id": 2, "firstName": "Alan", "lastName": "Turing"}
            ],
            "competitions": [{
                "externalId": 130,
                "type": "league",
                "name": "Kreisliga A",
                "date": "2023-04-01T18:00:00",
                "matches": [
                    {"position": 1, "score1": 2, "score2": 0,
                     "type": "single", "player1": 1, "player2": 2},
                    {"position": 2, "score1": 0, "score2": 1,
                     "type": "double",
                     "team1Player1": 1, "team1Player2": 2,
                     "team2Player1": 3, "team2Player2": 4}
                ]
            }]
        }"#;

        let file: ImportFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.players.len(), 2);
        assert_eq!(file.competitions[0].matches.len(), 2);
        match file.competitions[0].matches[1].sides {
            MatchSidesImport::Double { team2_player2, .. } => assert_eq!(team2_player2, 4),
            _ => panic!("expected a doubles match"),
        }
    }
}
