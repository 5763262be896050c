use std::collections::HashMap;

use anyhow::{Result, bail};
use log::info;

use crate::config::settings::RatingSettings;
use crate::domain::{Competition, EloDomain, Match, MatchSides, Player};

use super::elo;
use super::ledger::DomainLedger;
use super::pairwise::PairwiseAggregator;
use super::timeline;
use super::types::{CurrentRating, PlayedMatch, RecomputeOutput};

/// Runs one full rating replay over the entire known match set and returns
/// the complete derived dataset. The pass is pure over its inputs: nothing
/// is read from or written to storage here, and the previous derived state
/// plays no role, so re-running it on unchanged input reproduces the exact
/// same output.
pub fn replay(
    players: &HashMap<i64, Player>,
    competitions: &HashMap<i64, Competition>,
    matches: Vec<Match>,
    settings: &RatingSettings,
) -> Result<RecomputeOutput> {
    validate_participants(players, &matches)?;

    let timeline = timeline::build_timeline(matches, competitions)?;
    info!("Replaying {} matches for {} players", timeline.len(), players.len());

    let mut singles = DomainLedger::new(settings.initial_rating);
    let mut doubles = DomainLedger::new(settings.initial_rating);
    let mut combined = DomainLedger::new(settings.initial_rating);
    let mut pairs = PairwiseAggregator::new();

    let mut played_matches: Vec<PlayedMatch> = Vec::new();
    let add_played = |player_id: i64, match_id: i64, out: &mut Vec<PlayedMatch>| {
        let id = out.len() as i64 + 1;
        out.push(PlayedMatch {
            id,
            player_id,
            match_id,
        });
        id
    };

    for m in &timeline {
        let result = elo::match_result(m.score1, m.score2);
        let k = settings.k_factor(competitions[&m.competition_id].kind);

        match m.sides {
            MatchSides::Single { p1, p2 } => {
                let pm1 = add_played(p1, m.id, &mut played_matches);
                let pm2 = add_played(p2, m.id, &mut played_matches);

                let s = singles.apply_single(pm1, pm2, p1, p2, result, k);
                pairs.record_single(EloDomain::Single, p1, p2, result, s);

                let c = combined.apply_single(pm1, pm2, p1, p2, result, k);
                pairs.record_single(EloDomain::Combined, p1, p2, result, c);
            }
            MatchSides::Double { a1, a2, b1, b2 } => {
                let pms = [
                    add_played(a1, m.id, &mut played_matches),
                    add_played(a2, m.id, &mut played_matches),
                    add_played(b1, m.id, &mut played_matches),
                    add_played(b2, m.id, &mut played_matches),
                ];

                let d = doubles.apply_double(pms, a1, a2, b1, b2, result, k);
                pairs.record_double(EloDomain::Double, a1, a2, b1, b2, result, d);

                let c = combined.apply_double(pms, a1, a2, b1, b2, result, k);
                pairs.record_double(EloDomain::Combined, a1, a2, b1, b2, result, c);
            }
        }
    }

    let current_ratings = snapshot_current(players, &singles, &doubles, &combined);

    Ok(RecomputeOutput {
        played_matches,
        single_entries: singles.into_entries(),
        double_entries: doubles.into_entries(),
        combined_entries: combined.into_entries(),
        current_ratings,
        pair_stats: pairs.into_stats(),
    })
}

fn validate_participants(players: &HashMap<i64, Player>, matches: &[Match]) -> Result<()> {
    for m in matches {
        for participant in m.sides.participants() {
            if !players.contains_key(&participant) {
                bail!("match {} references unknown player {}", m.id, participant);
            }
        }
    }
    Ok(())
}

/// Final rating per player per domain, for every known player. Players
/// without a qualifying match in a domain stay at the initial constant.
fn snapshot_current(
    players: &HashMap<i64, Player>,
    singles: &DomainLedger,
    doubles: &DomainLedger,
    combined: &DomainLedger,
) -> Vec<CurrentRating> {
    let mut player_ids: Vec<i64> = players.keys().copied().collect();
    player_ids.sort_unstable();

    player_ids
        .into_iter()
        .map(|id| CurrentRating {
            player_id: id,
            single: singles.current(id),
            double: doubles.current(id),
            combined: combined.current(id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn player(id: i64) -> (i64, Player) {
        (
            id,
            Player {
                id,
                first_name: format!("First{id}"),
                last_name: format!("Last{id}"),
            },
        )
    }

    fn competition(id: i64, kind: crate::domain::CompetitionKind, day: u32) -> (i64, Competition) {
        (
            id,
            Competition {
                id,
                external_id: 1000 + id,
                kind,
                name: format!("comp {id}"),
                date: NaiveDate::from_ymd_opt(2023, 6, day)
                    .unwrap()
                    .and_hms_opt(19, 0, 0)
                    .unwrap(),
            },
        )
    }

    fn single(id: i64, competition_id: i64, position: i32, p1: i64, p2: i64, s1: i32, s2: i32) -> Match {
        Match {
            id,
            competition_id,
            position,
            score1: s1,
            score2: s2,
            sides: MatchSides::Single { p1, p2 },
        }
    }

    fn double(id: i64, competition_id: i64, position: i32, team_a: (i64, i64), team_b: (i64, i64), s1: i32, s2: i32) -> Match {
        Match {
            id,
            competition_id,
            position,
            score1: s1,
            score2: s2,
            sides: MatchSides::Double {
                a1: team_a.0,
                a2: team_a.1,
                b1: team_b.0,
                b2: team_b.1,
            },
        }
    }

    fn settings(k: f64) -> RatingSettings {
        RatingSettings {
            initial_rating: 1000.0,
            league_k: k,
            cup_k: k,
            tournament_k: k,
        }
    }

    fn fixture() -> (HashMap<i64, Player>, HashMap<i64, Competition>) {
        let players = [player(1), player(2), player(3), player(4)].into_iter().collect();
        let competitions = [competition(1, crate::domain::CompetitionKind::League, 1)]
            .into_iter()
            .collect();
        (players, competitions)
    }

    #[test]
    fn single_win_matches_the_worked_example() {
        // A (1000) beats B (1000) 2:0 at k=20 -> A 1010, B 990.
        let (players, competitions) = fixture();
        let matches = vec![single(1, 1, 1, 1, 2, 2, 0)];

        let out = replay(&players, &competitions, matches, &settings(20.0)).unwrap();

        assert_eq!(out.played_matches.len(), 2);
        assert_eq!(out.single_entries[0].rating, 1010.0);
        assert_eq!(out.single_entries[0].delta, 10.0);
        assert_eq!(out.single_entries[1].rating, 990.0);
        assert_eq!(out.single_entries[1].delta, -10.0);

        let a = out.current_ratings.iter().find(|c| c.player_id == 1).unwrap();
        assert_eq!(a.single, 1010.0);
        assert_eq!(a.combined, 1010.0);
        // The doubles track never saw this match.
        assert_eq!(a.double, 1000.0);
    }

    #[test]
    fn doubles_win_matches_the_worked_example() {
        // {A, B} beat {C, D}, all at 1000, k=20 -> winners +10, losers -10.
        let (players, competitions) = fixture();
        let matches = vec![double(1, 1, 1, (1, 2), (3, 4), 1, 0)];

        let out = replay(&players, &competitions, matches, &settings(20.0)).unwrap();

        assert_eq!(out.played_matches.len(), 4);
        assert_eq!(out.single_entries.len(), 0);
        assert_eq!(out.double_entries.len(), 4);
        assert_eq!(out.combined_entries.len(), 4);

        let deltas: Vec<f64> = out.double_entries.iter().map(|e| e.delta).collect();
        assert_eq!(deltas, vec![10.0, 10.0, -10.0, -10.0]);
    }

    #[test]
    fn domain_isolation_holds_across_match_types() {
        let (players, competitions) = fixture();
        let matches = vec![
            single(1, 1, 1, 1, 2, 2, 0),
            double(2, 1, 2, (1, 2), (3, 4), 0, 1),
        ];

        let out = replay(&players, &competitions, matches, &settings(24.0)).unwrap();

        // Singles ledger: only the 1v1; doubles ledger: only the 2v2;
        // combined: both, sharing one rating sequence.
        assert_eq!(out.single_entries.len(), 2);
        assert_eq!(out.double_entries.len(), 4);
        assert_eq!(out.combined_entries.len(), 6);

        let p1_combined: Vec<&crate::rating::RatingEntry> = out
            .combined_entries
            .iter()
            .filter(|e| e.player_id == 1)
            .collect();
        assert_eq!(p1_combined.len(), 2);
        assert_eq!(
            p1_combined[1].rating,
            p1_combined[0].rating + p1_combined[1].delta
        );
    }

    #[test]
    fn played_match_ids_are_sequential_in_replay_order() {
        let (players, competitions) = fixture();
        let matches = vec![
            double(7, 1, 2, (1, 2), (3, 4), 1, 0),
            single(9, 1, 1, 1, 2, 2, 0),
        ];

        let out = replay(&players, &competitions, matches, &settings(24.0)).unwrap();

        let ids: Vec<i64> = out.played_matches.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        // Position 1 (the single, match id 9) replays first.
        assert_eq!(out.played_matches[0].match_id, 9);
        assert_eq!(out.played_matches[2].match_id, 7);
    }

    #[test]
    fn k_factor_follows_the_competition_type() {
        let players: HashMap<i64, Player> = [player(1), player(2)].into_iter().collect();
        let competitions: HashMap<i64, Competition> = [
            competition(1, crate::domain::CompetitionKind::League, 1),
            competition(2, crate::domain::CompetitionKind::Tournament, 2),
        ]
        .into_iter()
        .collect();
        let matches = vec![
            single(1, 1, 1, 1, 2, 2, 0),
            single(2, 2, 1, 1, 2, 0, 2),
        ];

        let settings = RatingSettings {
            initial_rating: 1000.0,
            league_k: 24.0,
            cup_k: 24.0,
            tournament_k: 48.0,
        };
        let out = replay(&players, &competitions, matches, &settings).unwrap();

        assert_eq!(out.single_entries[0].delta, 12.0);
        // Tournament match: double weight, evaluated on the 1012/988 state.
        let tournament_delta = out.single_entries[2].delta;
        let expected = 48.0 * (0.0 - super::elo::expected_score(1012.0, 988.0));
        assert!((tournament_delta - expected).abs() < 1e-12);
    }

    #[test]
    fn replay_is_deterministic_regardless_of_input_order() {
        let (players, competitions) = fixture();
        let matches = vec![
            single(1, 1, 1, 1, 2, 2, 0),
            double(2, 1, 2, (1, 3), (2, 4), 1, 2),
            single(3, 1, 3, 3, 4, 1, 1),
        ];
        let mut shuffled = matches.clone();
        shuffled.reverse();

        let a = replay(&players, &competitions, matches, &settings(24.0)).unwrap();
        let b = replay(&players, &competitions, shuffled, &settings(24.0)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_player_aborts_the_pass() {
        let (players, competitions) = fixture();
        let matches = vec![single(1, 1, 1, 1, 99, 2, 0)];
        let err = replay(&players, &competitions, matches, &settings(24.0)).unwrap_err();
        assert!(err.to_string().contains("unknown player"));
    }

    #[test]
    fn players_without_matches_keep_the_initial_rating() {
        let (players, competitions) = fixture();
        let matches = vec![single(1, 1, 1, 1, 2, 2, 0)];

        let out = replay(&players, &competitions, matches, &settings(20.0)).unwrap();

        let idle = out.current_ratings.iter().find(|c| c.player_id == 3).unwrap();
        assert_eq!(idle.single, 1000.0);
        assert_eq!(idle.double, 1000.0);
        assert_eq!(idle.combined, 1000.0);
    }
}
