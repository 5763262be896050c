use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use log::info;

use crate::database::{self, DbPool};
use crate::domain::{CompetitionImport, ImportFile, MatchSidesImport};

/// Records match facts from the scraping pipeline's JSON dump files into
/// the source tables. Competitions that already have matches recorded are
/// skipped, so re-running ingest over the same dumps is a no-op.
pub struct IngestionService {
    pool: DbPool,
}

impl IngestionService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn run(&mut self, source: &Path) -> Result<()> {
        info!("=== Starting Data Ingestion ===");

        let files = collect_dump_files(source)?;
        info!("  → Found {} dump files in {}", files.len(), source.display());

        let mut conn = database::get_connection(&self.pool)?;
        database::setup::ensure_schema(&mut conn)?;

        let mut recorded = 0;
        let mut skipped = 0;

        for path in files {
            let file = read_dump_file(&path)?;
            info!(
                "  Ingesting {}: {} players, {} competitions",
                path.display(),
                file.players.len(),
                file.competitions.len()
            );

            for player in &file.players {
                database::players::upsert_player(&mut conn, player.id, &player.first_name, &player.last_name)?;
            }

            for competition in &file.competitions {
                if self.record_competition(&mut conn, competition)? {
                    recorded += 1;
                } else {
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            info!("  → Skipped {} already-recorded competitions", skipped);
        }
        info!("  → Recorded {} competitions", recorded);

        info!("=== Ingestion Complete ===");
        Ok(())
    }

    /// Returns false when the competition was skipped because its matches
    /// are already recorded.
    fn record_competition(
        &self,
        conn: &mut database::DbConn,
        competition: &CompetitionImport,
    ) -> Result<bool> {
        let existing = database::competitions::match_count(conn, competition.external_id, competition.kind)?;
        if existing > 0 {
            info!(
                "  Skipping {} ({}): has {} matches",
                competition.name,
                competition.kind.as_str(),
                existing
            );
            return Ok(false);
        }

        let date = parse_competition_date(&competition.date)?;
        let row = database::competitions::upsert_competition(
            conn,
            competition.external_id,
            competition.kind,
            &competition.name,
            date,
        )?;

        for m in &competition.matches {
            match m.sides {
                MatchSidesImport::Single { player1, player2 } => {
                    database::matches::insert_single_match(
                        conn, row.id, m.position, m.score1, m.score2, player1, player2,
                    )?;
                }
                MatchSidesImport::Double {
                    team1_player1,
                    team1_player2,
                    team2_player1,
                    team2_player2,
                } => {
                    database::matches::insert_double_match(
                        conn,
                        row.id,
                        m.position,
                        m.score1,
                        m.score2,
                        team1_player1,
                        team1_player2,
                        team2_player1,
                        team2_player2,
                    )?;
                }
            }
        }

        Ok(true)
    }
}

/// All .json files in the source directory, in sorted name order so ingest
/// runs are reproducible.
fn collect_dump_files(source: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(source)
        .with_context(|| format!("Failed to read source directory {}", source.display()))?;

    let mut files: Vec<PathBuf> = entries
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();

    files.sort();
    Ok(files)
}

fn read_dump_file(path: &Path) -> Result<ImportFile> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dump file {}", path.display()))?;

    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse dump file {}", path.display()))
}

fn parse_competition_date(date_str: &str) -> Result<NaiveDateTime> {
    use chrono::{DateTime, NaiveDate};

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt);
        }
    }

    bail!("Failed to parse competition date: {}", date_str)
}
