use std::collections::HashMap;

use crate::domain::EloDomain;

use super::types::{PairRelation, PairStat, PlayerId};

#[derive(Debug, Default, Clone, Copy)]
struct PairCounter {
    wins: i32,
    draws: i32,
    losses: i32,
    delta: f64,
}

/// Accumulates per-pair outcome counts and rating transfer while the replay
/// runs. Pairs are stored per ordered direction (the delta sign differs by
/// perspective), separately for opponent and partner relationships and per
/// domain.
#[derive(Debug, Default)]
pub struct PairwiseAggregator {
    stats: HashMap<(PlayerId, PlayerId, PairRelation, EloDomain), PairCounter>,
}

impl PairwiseAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a 1v1 result in one domain. `result` and `delta1` are from
    /// `p1`'s perspective; both directions are stored.
    pub fn record_single(
        &mut self,
        domain: EloDomain,
        p1: PlayerId,
        p2: PlayerId,
        result: f64,
        deltas: [f64; 2],
    ) {
        self.record(domain, p1, p2, PairRelation::Opponent, result, deltas[0]);
        self.record(domain, p2, p1, PairRelation::Opponent, 1.0 - result, deltas[1]);
    }

    /// Records a 2v2 result in one domain: every cross-team ordered pair as
    /// opponents, every teammate ordered pair as partners. `result` and the
    /// deltas `[a1, a2, b1, b2]` are from team A's perspective.
    #[allow(clippy::too_many_arguments)]
    pub fn record_double(
        &mut self,
        domain: EloDomain,
        a1: PlayerId,
        a2: PlayerId,
        b1: PlayerId,
        b2: PlayerId,
        result: f64,
        deltas: [f64; 4],
    ) {
        let team_a = [(a1, deltas[0]), (a2, deltas[1])];
        let team_b = [(b1, deltas[2]), (b2, deltas[3])];

        for &(player, delta) in &team_a {
            for &(opponent, _) in &team_b {
                self.record(domain, player, opponent, PairRelation::Opponent, result, delta);
            }
        }
        for &(player, delta) in &team_b {
            for &(opponent, _) in &team_a {
                self.record(
                    domain,
                    player,
                    opponent,
                    PairRelation::Opponent,
                    1.0 - result,
                    delta,
                );
            }
        }

        self.record(domain, a1, a2, PairRelation::Partner, result, deltas[0]);
        self.record(domain, a2, a1, PairRelation::Partner, result, deltas[1]);
        self.record(domain, b1, b2, PairRelation::Partner, 1.0 - result, deltas[2]);
        self.record(domain, b2, b1, PairRelation::Partner, 1.0 - result, deltas[3]);
    }

    fn record(
        &mut self,
        domain: EloDomain,
        player: PlayerId,
        other: PlayerId,
        relation: PairRelation,
        result: f64,
        delta: f64,
    ) {
        let counter = self.stats.entry((player, other, relation, domain)).or_default();
        if result > 0.5 {
            counter.wins += 1;
        } else if result < 0.5 {
            counter.losses += 1;
        } else {
            counter.draws += 1;
        }
        counter.delta += delta;
    }

    /// Drains the aggregates into rows, sorted by key so the persisted set
    /// is identical on every run over the same input.
    pub fn into_stats(self) -> Vec<PairStat> {
        let mut rows: Vec<PairStat> = self
            .stats
            .into_iter()
            .map(|((player_id, other_id, relation, domain), c)| PairStat {
                player_id,
                other_id,
                relation,
                domain,
                wins: c.wins,
                draws: c.draws,
                losses: c.losses,
                delta: c.delta,
            })
            .collect();

        rows.sort_by_key(|s| (s.player_id, s.other_id, s.relation, s.domain));
        rows
    }
}
