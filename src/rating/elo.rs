//! The Elo probability and update formulas. Pure arithmetic; ratings are
//! unbounded floats and callers supply the K factor.

/// Probability that a participant rated `own` beats one rated `other`.
pub fn expected_score(own: f64, other: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((other - own) / 400.0))
}

/// Rating change for `own` after a 1v1 contest.
/// `result` is 1.0 (win), 0.5 (draw) or 0.0 (loss) from `own`'s perspective.
pub fn individual_delta(k: f64, result: f64, own: f64, other: f64) -> f64 {
    k * (result - expected_score(own, other))
}

/// Rating change for `own` after a 2v2 contest. The expectation is computed
/// over the two team averages; the full delta is applied to each team
/// member's own rating, not split across the team.
pub fn team_delta(k: f64, result: f64, own: f64, partner: f64, opp1: f64, opp2: f64) -> f64 {
    let own_side = 0.5 * (own + partner);
    let opp_side = 0.5 * (opp1 + opp2);
    k * (result - expected_score(own_side, opp_side))
}

/// Match outcome from side one's perspective.
pub fn match_result(score1: i32, score2: i32) -> f64 {
    if score1 > score2 {
        1.0
    } else if score1 < score2 {
        0.0
    } else {
        0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_ratings_expect_even_odds() {
        assert_eq!(expected_score(1000.0, 1000.0), 0.5);
    }

    #[test]
    fn expectation_follows_the_400_point_scale() {
        // A 400 point gap means 10:1 odds.
        let e = expected_score(1400.0, 1000.0);
        assert!((e - 10.0 / 11.0).abs() < 1e-12);
        // Complementary from the other side.
        assert!((expected_score(1000.0, 1400.0) - 1.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn win_between_equals_moves_half_k() {
        // A (1000) beats B (1000) at k=20: E = 0.5, delta = 20 * 0.5 = 10.
        assert_eq!(individual_delta(20.0, 1.0, 1000.0, 1000.0), 10.0);
        assert_eq!(individual_delta(20.0, 0.0, 1000.0, 1000.0), -10.0);
    }

    #[test]
    fn winner_and_loser_deltas_are_complementary() {
        let (ra, rb) = (1120.0, 980.0);
        let k = 24.0;
        let da = individual_delta(k, 1.0, ra, rb);
        let db = individual_delta(k, 0.0, rb, ra);
        // delta_b = k * ((1 - r) - (1 - E_a)) exactly.
        let ea = expected_score(ra, rb);
        assert!((da - k * (1.0 - ea)).abs() < 1e-12);
        assert!((db - k * (0.0 - (1.0 - ea))).abs() < 1e-12);
    }

    #[test]
    fn team_delta_uses_averaged_strengths() {
        // {1000, 1000} beats {1000, 1000} at k=20: everyone moves 10.
        let d = team_delta(20.0, 1.0, 1000.0, 1000.0, 1000.0, 1000.0);
        assert_eq!(d, 10.0);

        // Mixed teams: only the averages matter, not who is "own".
        let d1 = team_delta(24.0, 1.0, 1100.0, 900.0, 1050.0, 950.0);
        let d2 = team_delta(24.0, 1.0, 900.0, 1100.0, 950.0, 1050.0);
        assert_eq!(d1, d2);
    }

    #[test]
    fn result_mapping_covers_win_draw_loss() {
        assert_eq!(match_result(2, 0), 1.0);
        assert_eq!(match_result(0, 2), 0.0);
        assert_eq!(match_result(1, 1), 0.5);
    }
}
