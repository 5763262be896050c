use anyhow::{Context, Result, bail};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use super::models::{HistoryRow, RankedPlayerRow};
use crate::domain::{CompetitionKind, EloDomain};
use crate::rating::{CurrentRating, PairRelation, PairStat, RecomputeOutput};

/// Replaces the entire derived dataset in one transaction: all old rows go,
/// the new pass's rows come in, and readers never observe a mixed state. A
/// failure anywhere rolls the whole replacement back.
pub fn replace_all(conn: &mut DbConn, output: &RecomputeOutput) -> Result<()> {
    let tx = conn
        .transaction()
        .context("Failed to open derived-data transaction")?;

    tx.execute("DELETE FROM played_matches", [])?;
    tx.execute("DELETE FROM elo_single", [])?;
    tx.execute("DELETE FROM elo_double", [])?;
    tx.execute("DELETE FROM elo_combined", [])?;
    tx.execute("DELETE FROM elo_current", [])?;
    tx.execute("DELETE FROM pair_stats", [])?;

    {
        let mut stmt =
            tx.prepare("INSERT INTO played_matches (id, player_id, match_id) VALUES (?1, ?2, ?3)")?;
        for pm in &output.played_matches {
            stmt.execute(params![pm.id, pm.player_id, pm.match_id])?;
        }
    }

    for domain in [EloDomain::Single, EloDomain::Double, EloDomain::Combined] {
        let sql = format!(
            "INSERT INTO {} (played_match_id, rating, delta) VALUES (?1, ?2, ?3)",
            domain.ledger_table()
        );
        let mut stmt = tx.prepare(&sql)?;
        for entry in output.entries(domain) {
            stmt.execute(params![entry.played_match_id, entry.rating, entry.delta])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO elo_current (player_id, single, double, combined) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for current in &output.current_ratings {
            stmt.execute(params![
                current.player_id,
                current.single,
                current.double,
                current.combined
            ])?;
        }
    }

    {
        let mut stmt = tx.prepare(
            "INSERT INTO pair_stats (player_id, other_id, relation, domain, wins, draws, losses, delta) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for stat in &output.pair_stats {
            stmt.execute(params![
                stat.player_id,
                stat.other_id,
                stat.relation.to_code(),
                stat.domain.to_code(),
                stat.wins,
                stat.draws,
                stat.losses,
                stat.delta
            ])?;
        }
    }

    tx.commit().context("Failed to commit derived-data replacement")
}

pub fn current_ratings(conn: &mut DbConn, player_id: i64) -> Result<Option<CurrentRating>> {
    let sql = "SELECT player_id, single, \"double\", combined FROM elo_current WHERE player_id = ?1";

    conn.query_row(sql, params![player_id], |row| {
        Ok(CurrentRating {
            player_id: row.get(0)?,
            single: row.get(1)?,
            double: row.get(2)?,
            combined: row.get(3)?,
        })
    })
    .optional()
    .context("Failed to query current ratings")
}

/// One ranking page: every rated player, rating descending, ties broken by
/// player id so pages are stable. Returns the rows and the total player
/// count for paging.
pub fn ranking_page(
    conn: &mut DbConn,
    domain: EloDomain,
    limit: usize,
    offset: usize,
) -> Result<(Vec<RankedPlayerRow>, i64)> {
    let sql = format!(
        "SELECT p.id, p.first_name, p.last_name, e.\"{col}\" AS rating, COALESCE(mc.c, 0) \
         FROM elo_current e \
         JOIN players p ON p.id = e.player_id \
         LEFT JOIN ( \
             SELECT pm.player_id AS pid, COUNT(*) AS c \
             FROM played_matches pm \
             JOIN {table} l ON l.played_match_id = pm.id \
             GROUP BY pm.player_id \
         ) mc ON mc.pid = p.id \
         ORDER BY rating DESC, p.id ASC \
         LIMIT ?1 OFFSET ?2",
        col = domain.current_column(),
        table = domain.ledger_table(),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![limit as i64, offset as i64], |row| {
            Ok(RankedPlayerRow {
                player_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                rating: row.get(3)?,
                match_count: row.get(4)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let total: i64 = conn.query_row("SELECT COUNT(*) FROM elo_current", [], |row| row.get(0))?;

    Ok((rows, total))
}

/// A player's rating history in one domain, most recent first. Played-match
/// ids are assigned in replay order, so descending id order is descending
/// chronological order.
pub fn rating_history(
    conn: &mut DbConn,
    player_id: i64,
    domain: EloDomain,
    limit: usize,
    offset: usize,
) -> Result<Vec<HistoryRow>> {
    let sql = format!(
        "SELECT m.type, m.score1, m.score2, m.p1, m.p2, m.p11, m.p22, \
                c.name, c.type, c.date, l.rating, l.delta \
         FROM played_matches pm \
         JOIN matches m ON m.id = pm.match_id \
         JOIN competitions c ON c.id = m.competition_id \
         JOIN {table} l ON l.played_match_id = pm.id \
         WHERE pm.player_id = ?1 \
         ORDER BY pm.id DESC \
         LIMIT ?2 OFFSET ?3",
        table = domain.ledger_table(),
    );

    struct RawHistoryRow {
        match_type: i32,
        score1: i32,
        score2: i32,
        p1: i64,
        p2: i64,
        p11: i64,
        p22: i64,
        competition_name: String,
        competition_code: i32,
        date: chrono::NaiveDateTime,
        rating: f64,
        delta: f64,
    }

    let mut stmt = conn.prepare(&sql)?;
    let raws = stmt
        .query_map(params![player_id, limit as i64, offset as i64], |row| {
            Ok(RawHistoryRow {
                match_type: row.get(0)?,
                score1: row.get(1)?,
                score2: row.get(2)?,
                p1: row.get(3)?,
                p2: row.get(4)?,
                p11: row.get(5)?,
                p22: row.get(6)?,
                competition_name: row.get(7)?,
                competition_code: row.get(8)?,
                date: row.get(9)?,
                rating: row.get(10)?,
                delta: row.get(11)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter()
        .map(|raw| {
            let Some(kind) = CompetitionKind::from_code(raw.competition_code) else {
                bail!("competition has unknown type code {}", raw.competition_code);
            };
            Ok(HistoryRow {
                match_type: raw.match_type,
                score1: raw.score1,
                score2: raw.score2,
                p1: raw.p1,
                p2: raw.p2,
                p11: raw.p11,
                p22: raw.p22,
                competition_name: raw.competition_name,
                competition_kind: kind,
                date: raw.date,
                rating: raw.rating,
                delta: raw.delta,
            })
        })
        .collect()
}

/// How many played matches a player has in a domain.
pub fn match_count(conn: &mut DbConn, player_id: i64, domain: EloDomain) -> Result<i64> {
    let sql = format!(
        "SELECT COUNT(*) FROM played_matches pm \
         JOIN {table} l ON l.played_match_id = pm.id \
         WHERE pm.player_id = ?1",
        table = domain.ledger_table(),
    );

    conn.query_row(&sql, params![player_id], |row| row.get(0))
        .context("Failed to count played matches")
}

pub fn pair_stats_for_player(conn: &mut DbConn, player_id: i64) -> Result<Vec<PairStat>> {
    let sql = "SELECT player_id, other_id, relation, domain, wins, draws, losses, delta \
               FROM pair_stats WHERE player_id = ?1 \
               ORDER BY other_id, relation, domain";

    struct RawPairRow {
        player_id: i64,
        other_id: i64,
        relation_code: i32,
        domain_code: i32,
        wins: i32,
        draws: i32,
        losses: i32,
        delta: f64,
    }

    let mut stmt = conn.prepare(sql)?;
    let raws = stmt
        .query_map(params![player_id], |row| {
            Ok(RawPairRow {
                player_id: row.get(0)?,
                other_id: row.get(1)?,
                relation_code: row.get(2)?,
                domain_code: row.get(3)?,
                wins: row.get(4)?,
                draws: row.get(5)?,
                losses: row.get(6)?,
                delta: row.get(7)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter()
        .map(|raw| {
            let (Some(relation), Some(domain)) = (
                PairRelation::from_code(raw.relation_code),
                EloDomain::from_code(raw.domain_code),
            ) else {
                bail!(
                    "pair stat ({}, {}) has unknown relation/domain codes",
                    raw.player_id,
                    raw.other_id
                );
            };
            Ok(PairStat {
                player_id: raw.player_id,
                other_id: raw.other_id,
                relation,
                domain,
                wins: raw.wins,
                draws: raw.draws,
                losses: raw.losses,
                delta: raw.delta,
            })
        })
        .collect()
}
