use anyhow::{Context, Result};
use log::info;

use crate::config::settings::AppConfig;
use crate::database::{self, DbPool};
use crate::rating;

/// Drives one full recompute pass: load every known fact, replay the whole
/// match history through the rating engine, then swap the derived tables in
/// one transaction. There is no incremental path and no failure-recovery
/// state; any error aborts the pass and leaves the previously persisted
/// derived data untouched.
pub struct RecomputeService {
    config: AppConfig,
    pool: DbPool,
}

impl RecomputeService {
    pub fn new(config: AppConfig, pool: DbPool) -> Self {
        Self { config, pool }
    }

    pub fn run(&self) -> Result<()> {
        info!("=== Starting Rating Recompute ===");

        let mut conn = database::get_connection(&self.pool)?;
        database::setup::ensure_schema(&mut conn)?;

        // Step 1: Load the full source dataset.
        let players = database::players::map_by_id(&mut conn)?;
        let competitions = database::competitions::map_by_id(&mut conn)?;
        let matches = database::matches::list_all(&mut conn)?;
        info!(
            "  → Loaded {} players, {} competitions, {} matches",
            players.len(),
            competitions.len(),
            matches.len()
        );

        // Step 2: Replay everything through the engine.
        let output = rating::replay(&players, &competitions, matches, &self.config.rating)
            .context("Rating replay failed")?;
        info!(
            "  → Derived {} played matches, {} single / {} double / {} combined ledger entries, {} pair stats",
            output.played_matches.len(),
            output.single_entries.len(),
            output.double_entries.len(),
            output.combined_entries.len(),
            output.pair_stats.len()
        );

        // Step 3: Atomic wholesale replacement of the derived tables.
        database::derived::replace_all(&mut conn, &output)
            .context("Failed to persist derived dataset")?;
        info!("  → Replaced derived tables");

        info!("=== Recompute Complete ===");
        Ok(())
    }
}
