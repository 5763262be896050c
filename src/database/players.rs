use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{OptionalExtension, params};

use super::connection::DbConn;
use crate::domain::Player;

/// Idempotent upsert keyed on the upstream player id. Re-adding an existing
/// id only refreshes the name (upstream corrections), never duplicates.
pub fn upsert_player(conn: &mut DbConn, id: i64, first_name: &str, last_name: &str) -> Result<Player> {
    let sql = "INSERT INTO players (id, first_name, last_name) VALUES (?1, ?2, ?3) \
               ON CONFLICT (id) DO UPDATE SET first_name = excluded.first_name, last_name = excluded.last_name \
               RETURNING id, first_name, last_name";

    conn.query_row(sql, params![id, first_name, last_name], parse_player_row)
        .context("Failed to upsert player")
}

pub fn find_by_id(conn: &mut DbConn, id: i64) -> Result<Option<Player>> {
    let sql = "SELECT id, first_name, last_name FROM players WHERE id = ?1";

    conn.query_row(sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Player>> {
    let sql = "SELECT id, first_name, last_name FROM players";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// All players keyed by id, for in-memory name resolution.
pub fn map_by_id(conn: &mut DbConn) -> Result<HashMap<i64, Player>> {
    Ok(list_all(conn)?.into_iter().map(|p| (p.id, p)).collect())
}

pub fn search_by_name(conn: &mut DbConn, pattern: &str) -> Result<Vec<Player>> {
    let sql = "SELECT id, first_name, last_name FROM players \
               WHERE first_name LIKE ?1 OR last_name LIKE ?1 \
               ORDER BY last_name, first_name, id";

    let like = format!("%{}%", pattern);
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![like], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
    })
}
