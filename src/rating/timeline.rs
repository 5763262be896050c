use std::collections::HashMap;

use anyhow::{Result, anyhow};

use crate::domain::{Competition, Match};

/// Orders all known matches into the single total order the replay runs in:
/// competition date first, then competition id when two competitions share a
/// date, then the within-competition position, then the match id. The order
/// is fully tie-broken so replay output never depends on input enumeration
/// order.
pub fn build_timeline(
    mut matches: Vec<Match>,
    competitions: &HashMap<i64, Competition>,
) -> Result<Vec<Match>> {
    for m in &matches {
        if !competitions.contains_key(&m.competition_id) {
            return Err(anyhow!(
                "match {} references unknown competition {}",
                m.id,
                m.competition_id
            ));
        }
    }

    matches.sort_by_key(|m| {
        let competition = &competitions[&m.competition_id];
        (competition.date, competition.id, m.position, m.id)
    });

    Ok(matches)
}
