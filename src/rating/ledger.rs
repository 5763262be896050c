use std::collections::HashMap;

use super::elo;
use super::types::{PlayedMatchId, PlayerId, RatingEntry};

/// Rating state of one domain (single, double or combined) during a replay
/// pass: the current rating per player, lazily seeded with the initial
/// constant, plus the append-only list of emitted ledger entries.
///
/// Updates are match-granular: all participants' ratings are read before
/// any of them is written, so a player's own update is never reflected in
/// the expectation computed for anyone else in the same match.
#[derive(Debug)]
pub struct DomainLedger {
    initial_rating: f64,
    ratings: HashMap<PlayerId, f64>,
    entries: Vec<RatingEntry>,
}

impl DomainLedger {
    pub fn new(initial_rating: f64) -> Self {
        Self {
            initial_rating,
            ratings: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Current rating of a player, the initial constant if they have not
    /// played in this domain yet.
    pub fn current(&self, player: PlayerId) -> f64 {
        self.ratings.get(&player).copied().unwrap_or(self.initial_rating)
    }

    /// Applies a 1v1 result. `result` is from `p1`'s perspective. Returns
    /// the deltas applied to `[p1, p2]`.
    pub fn apply_single(
        &mut self,
        pm1: PlayedMatchId,
        pm2: PlayedMatchId,
        p1: PlayerId,
        p2: PlayerId,
        result: f64,
        k: f64,
    ) -> [f64; 2] {
        let r1 = self.current(p1);
        let r2 = self.current(p2);

        let d1 = elo::individual_delta(k, result, r1, r2);
        let d2 = elo::individual_delta(k, 1.0 - result, r2, r1);

        self.record(pm1, p1, r1 + d1, d1);
        self.record(pm2, p2, r2 + d2, d2);

        [d1, d2]
    }

    /// Applies a 2v2 result for teams {a1, a2} vs {b1, b2}. `result` is
    /// from team A's perspective. All four expectations are evaluated on
    /// the pre-match snapshot. Returns the deltas applied to
    /// `[a1, a2, b1, b2]`.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_double(
        &mut self,
        pms: [PlayedMatchId; 4],
        a1: PlayerId,
        a2: PlayerId,
        b1: PlayerId,
        b2: PlayerId,
        result: f64,
        k: f64,
    ) -> [f64; 4] {
        let ra1 = self.current(a1);
        let ra2 = self.current(a2);
        let rb1 = self.current(b1);
        let rb2 = self.current(b2);

        let da1 = elo::team_delta(k, result, ra1, ra2, rb1, rb2);
        let da2 = elo::team_delta(k, result, ra2, ra1, rb1, rb2);
        let db1 = elo::team_delta(k, 1.0 - result, rb1, rb2, ra1, ra2);
        let db2 = elo::team_delta(k, 1.0 - result, rb2, rb1, ra1, ra2);

        self.record(pms[0], a1, ra1 + da1, da1);
        self.record(pms[1], a2, ra2 + da2, da2);
        self.record(pms[2], b1, rb1 + db1, db1);
        self.record(pms[3], b2, rb2 + db2, db2);

        [da1, da2, db1, db2]
    }

    fn record(&mut self, pm: PlayedMatchId, player: PlayerId, rating: f64, delta: f64) {
        self.ratings.insert(player, rating);
        self.entries.push(RatingEntry {
            played_match_id: pm,
            player_id: player,
            rating,
            delta,
        });
    }

    pub fn entries(&self) -> &[RatingEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RatingEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_unknown_players_with_the_initial_rating() {
        let ledger = DomainLedger::new(1000.0);
        assert_eq!(ledger.current(42), 1000.0);
    }

    #[test]
    fn single_win_between_fresh_players() {
        let mut ledger = DomainLedger::new(1000.0);
        let deltas = ledger.apply_single(1, 2, 10, 11, 1.0, 20.0);

        assert_eq!(deltas, [10.0, -10.0]);
        assert_eq!(ledger.current(10), 1010.0);
        assert_eq!(ledger.current(11), 990.0);

        let entries = ledger.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].played_match_id, 1);
        assert_eq!(entries[0].rating, 1010.0);
        assert_eq!(entries[0].delta, 10.0);
        assert_eq!(entries[1].rating, 990.0);
        assert_eq!(entries[1].delta, -10.0);
    }

    #[test]
    fn ledger_stays_continuous_over_several_matches() {
        let mut ledger = DomainLedger::new(1000.0);
        ledger.apply_single(1, 2, 1, 2, 1.0, 24.0);
        ledger.apply_single(3, 4, 1, 2, 0.0, 24.0);
        ledger.apply_single(5, 6, 1, 2, 1.0, 48.0);

        let mut expected = 1000.0;
        for entry in ledger.entries().iter().filter(|e| e.player_id == 1) {
            expected += entry.delta;
            assert_eq!(entry.rating, expected);
        }
        assert_eq!(ledger.current(1), expected);
    }

    #[test]
    fn opponent_expectation_uses_the_pre_match_rating() {
        let mut ledger = DomainLedger::new(1000.0);
        // Both deltas must come from the 1000/1000 snapshot; if p1's win
        // leaked into p2's expectation the magnitudes would differ.
        let deltas = ledger.apply_single(1, 2, 1, 2, 1.0, 32.0);
        assert_eq!(deltas[0], 16.0);
        assert_eq!(deltas[1], -16.0);
    }

    #[test]
    fn doubles_teammates_receive_identical_deltas() {
        let mut ledger = DomainLedger::new(1000.0);
        // Give the players uneven ratings first.
        ledger.apply_single(1, 2, 1, 3, 1.0, 48.0);
        ledger.apply_single(3, 4, 2, 4, 1.0, 24.0);

        let deltas = ledger.apply_double([5, 6, 7, 8], 1, 2, 3, 4, 1.0, 24.0);
        assert_eq!(deltas[0], deltas[1]);
        assert_eq!(deltas[2], deltas[3]);
        // Complementary sides: A's delta is computed from result, B's from
        // 1 - result against the same team strengths.
        assert!((deltas[0] + deltas[2]).abs() < 1e-12);
    }

    #[test]
    fn doubles_between_equal_teams_move_everyone_half_k() {
        let mut ledger = DomainLedger::new(1000.0);
        let deltas = ledger.apply_double([1, 2, 3, 4], 1, 2, 3, 4, 1.0, 20.0);
        assert_eq!(deltas, [10.0, 10.0, -10.0, -10.0]);
        assert_eq!(ledger.current(1), 1010.0);
        assert_eq!(ledger.current(4), 990.0);
    }
}
