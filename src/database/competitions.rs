use std::collections::HashMap;

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use crate::domain::{Competition, CompetitionKind};

/// Idempotent upsert keyed on (external id, type): a second call with the
/// same key returns the existing competition instead of duplicating it.
pub fn upsert_competition(
    conn: &mut DbConn,
    external_id: i64,
    kind: CompetitionKind,
    name: &str,
    date: NaiveDateTime,
) -> Result<Competition> {
    if let Some(existing) = find_by_external_id(conn, external_id, kind)? {
        return Ok(existing);
    }

    insert_new_competition(conn, external_id, kind, name, date)
}

pub fn find_by_external_id(
    conn: &mut DbConn,
    external_id: i64,
    kind: CompetitionKind,
) -> Result<Option<Competition>> {
    let sql = "SELECT id, external_id, type, name, date FROM competitions \
               WHERE external_id = ?1 AND type = ?2";

    let raw = conn
        .query_row(sql, params![external_id, kind.to_code()], parse_raw_row)
        .optional()
        .context("Failed to query competition by external id")?;

    raw.map(from_raw).transpose()
}

fn insert_new_competition(
    conn: &mut DbConn,
    external_id: i64,
    kind: CompetitionKind,
    name: &str,
    date: NaiveDateTime,
) -> Result<Competition> {
    let sql = "INSERT INTO competitions (external_id, type, name, date) VALUES (?1, ?2, ?3, ?4) \
               RETURNING id, external_id, type, name, date";

    let raw = conn
        .query_row(sql, params![external_id, kind.to_code(), name, date], parse_raw_row)
        .context("Failed to insert new competition")?;

    from_raw(raw)
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Competition>> {
    let sql = "SELECT id, external_id, type, name, date FROM competitions";

    let mut stmt = conn.prepare(sql)?;
    let raws = stmt
        .query_map([], parse_raw_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    raws.into_iter().map(from_raw).collect()
}

/// All competitions keyed by id, the shape the timeline builder consumes.
pub fn map_by_id(conn: &mut DbConn) -> Result<HashMap<i64, Competition>> {
    Ok(list_all(conn)?.into_iter().map(|c| (c.id, c)).collect())
}

/// How many matches are recorded for the competition with this external
/// key. Zero when the competition is unknown; the ingest pipeline uses this
/// to skip already-recorded competitions.
pub fn match_count(conn: &mut DbConn, external_id: i64, kind: CompetitionKind) -> Result<i64> {
    let sql = "SELECT COUNT(*) FROM matches m \
               JOIN competitions c ON c.id = m.competition_id \
               WHERE c.external_id = ?1 AND c.type = ?2";

    conn.query_row(sql, params![external_id, kind.to_code()], |row| row.get(0))
        .context("Failed to count competition matches")
}

struct RawCompetitionRow {
    id: i64,
    external_id: i64,
    kind_code: i32,
    name: String,
    date: NaiveDateTime,
}

fn parse_raw_row(row: &rusqlite::Row) -> rusqlite::Result<RawCompetitionRow> {
    Ok(RawCompetitionRow {
        id: row.get(0)?,
        external_id: row.get(1)?,
        kind_code: row.get(2)?,
        name: row.get(3)?,
        date: row.get(4)?,
    })
}

fn from_raw(raw: RawCompetitionRow) -> Result<Competition> {
    let Some(kind) = CompetitionKind::from_code(raw.kind_code) else {
        bail!("competition {} has unknown type code {}", raw.id, raw.kind_code);
    };

    Ok(Competition {
        id: raw.id,
        external_id: raw.external_id,
        kind,
        name: raw.name,
        date: raw.date,
    })
}
