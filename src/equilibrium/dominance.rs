use super::*;

/// First strategy of `seat` that strictly beats each of its alternatives
/// against every opponent strategy.
///
/// A missing payoff entry disqualifies the comparison it belongs to.
pub fn dominant_strategy(model: &GameModel, seat: usize) -> Option<Choice> {
    let (me, them) = seats(model, seat)?;
    let beats = |i: Choice, j: Choice| {
        (0..them.count()).all(|theirs| {
            match (
                model.duel_payoff(seat, i, theirs),
                model.duel_payoff(seat, j, theirs),
            ) {
                (Some(a), Some(b)) => a > b,
                _ => false,
            }
        })
    };
    (0..me.count()).find(|&i| (0..me.count()).filter(|&j| j != i).all(|j| beats(i, j)))
}

/// Dominant strategy per player id (two-player models only).
pub fn dominant_strategies(model: &GameModel) -> std::collections::BTreeMap<PlayerId, Option<Choice>> {
    model
        .players()
        .iter()
        .enumerate()
        .map(|(seat, player)| (player.id.clone(), dominant_strategy(model, seat)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dilemma_defect_dominates() {
        let model = crate::catalog::prisoners_dilemma();
        assert_eq!(dominant_strategy(&model, 0), Some(1));
        assert_eq!(dominant_strategy(&model, 1), Some(1));
    }
    #[test]
    fn confession_dominates() {
        let model = crate::catalog::tests::confession();
        assert_eq!(dominant_strategy(&model, 0), Some(0));
        assert_eq!(dominant_strategy(&model, 1), Some(0));
    }
    #[test]
    fn smart_pig_only_small_pig_dominates() {
        let model = crate::catalog::smart_pig();
        assert_eq!(dominant_strategy(&model, 0), None);
        assert_eq!(dominant_strategy(&model, 1), Some(1));
        let all = dominant_strategies(&model);
        assert_eq!(all["big"], None);
        assert_eq!(all["small"], Some(1));
    }
    #[test]
    fn pennies_has_none() {
        let model = crate::catalog::matching_pennies();
        assert_eq!(dominant_strategy(&model, 0), None);
        assert_eq!(dominant_strategy(&model, 1), None);
    }
    #[test]
    fn missing_payoffs_disqualify() {
        let model = GameModel::new(
            "sparse",
            "Sparse",
            GameType::CompleteStatic,
            vec![
                Player::new("a", "A", &["x", "y"]),
                Player::new("b", "B", &["x", "y"]),
            ],
            PayoffMatrix::default()
                .with(&["x", "x"], &[5., 0.])
                .with(&["y", "x"], &[1., 0.])
                .with(&["y", "y"], &[1., 0.]),
        );
        assert_eq!(dominant_strategy(&model, 0), None);
    }
    #[test]
    fn three_players_degrade() {
        let model = GameModel::new(
            "crowd",
            "Crowd",
            GameType::CompleteStatic,
            vec![
                Player::new("a", "A", &["x"]),
                Player::new("b", "B", &["x"]),
                Player::new("c", "C", &["x"]),
            ],
            PayoffMatrix::default().with(&["x", "x", "x"], &[1., 1., 1.]),
        );
        assert_eq!(dominant_strategy(&model, 0), None);
    }
}
