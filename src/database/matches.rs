use anyhow::{Context, Result, bail};
use rusqlite::params;

use super::connection::DbConn;
use crate::domain::{Match, MatchSides};

pub fn insert_single_match(
    conn: &mut DbConn,
    competition_id: i64,
    position: i32,
    score1: i32,
    score2: i32,
    p1: i64,
    p2: i64,
) -> Result<Match> {
    insert_match(
        conn,
        competition_id,
        position,
        score1,
        score2,
        MatchSides::Single { p1, p2 },
    )
}

#[allow(clippy::too_many_arguments)]
pub fn insert_double_match(
    conn: &mut DbConn,
    competition_id: i64,
    position: i32,
    score1: i32,
    score2: i32,
    a1: i64,
    a2: i64,
    b1: i64,
    b2: i64,
) -> Result<Match> {
    insert_match(
        conn,
        competition_id,
        position,
        score1,
        score2,
        MatchSides::Double { a1, a2, b1, b2 },
    )
}

fn insert_match(
    conn: &mut DbConn,
    competition_id: i64,
    position: i32,
    score1: i32,
    score2: i32,
    sides: MatchSides,
) -> Result<Match> {
    let sql = "INSERT INTO matches (competition_id, position, type, score1, score2, p1, p2, p11, p22) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) \
               RETURNING id, competition_id, position, type, score1, score2, p1, p2, p11, p22";

    // Side one is (p1, p11), side two (p2, p22); singles leave p11/p22 at 0.
    let (p1, p2, p11, p22) = match sides {
        MatchSides::Single { p1, p2 } => (p1, p2, 0, 0),
        MatchSides::Double { a1, a2, b1, b2 } => (a1, b1, a2, b2),
    };

    let raw = conn
        .query_row(
            sql,
            params![competition_id, position, sides.to_code(), score1, score2, p1, p2, p11, p22],
            parse_raw_row,
        )
        .context("Failed to insert match")?;

    from_raw(raw)
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Match>> {
    let sql = "SELECT id, competition_id, position, type, score1, score2, p1, p2, p11, p22 FROM matches";

    let mut stmt = conn.prepare(sql)?;
    let raws = stmt
        .query_map([], parse_raw_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(from_raw).collect()
}

struct RawMatchRow {
    id: i64,
    competition_id: i64,
    position: i32,
    type_code: i32,
    score1: i32,
    score2: i32,
    p1: i64,
    p2: i64,
    p11: i64,
    p22: i64,
}

fn parse_raw_row(row: &rusqlite::Row) -> rusqlite::Result<RawMatchRow> {
    Ok(RawMatchRow {
        id: row.get(0)?,
        competition_id: row.get(1)?,
        position: row.get(2)?,
        type_code: row.get(3)?,
        score1: row.get(4)?,
        score2: row.get(5)?,
        p1: row.get(6)?,
        p2: row.get(7)?,
        p11: row.get(8)?,
        p22: row.get(9)?,
    })
}

fn from_raw(raw: RawMatchRow) -> Result<Match> {
    let sides = match raw.type_code {
        1 => MatchSides::Single {
            p1: raw.p1,
            p2: raw.p2,
        },
        2 => MatchSides::Double {
            a1: raw.p1,
            a2: raw.p11,
            b1: raw.p2,
            b2: raw.p22,
        },
        code => bail!("match {} has unknown type code {}", raw.id, code),
    };

    Ok(Match {
        id: raw.id,
        competition_id: raw.competition_id,
        position: raw.position,
        score1: raw.score1,
        score2: raw.score2,
        sides,
    })
}
