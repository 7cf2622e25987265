use super::*;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Payoff of each of `seat`'s strategies against a fixed opponent choice.
pub fn response_payoffs(model: &GameModel, seat: usize, theirs: Choice) -> Vec<(Choice, Utility)> {
    seats(model, seat)
        .map(|(me, _)| {
            (0..me.count())
                .filter_map(|mine| model.duel_payoff(seat, mine, theirs).map(|u| (mine, u)))
                .collect()
        })
        .unwrap_or_default()
}

/// Best response to `theirs`, breaking ties uniformly at random.
pub fn best_response<R>(model: &GameModel, seat: usize, theirs: Choice, rng: &mut R) -> Option<Choice>
where
    R: Rng,
{
    maximizers(response_payoffs(model, seat, theirs))
        .choose(rng)
        .copied()
}

/// Best response to `theirs`, breaking ties toward the lowest index.
pub fn first_best_response(model: &GameModel, seat: usize, theirs: Choice) -> Option<Choice> {
    maximizers(response_payoffs(model, seat, theirs))
        .first()
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn defect_answers_anything() {
        let model = crate::catalog::prisoners_dilemma();
        let ref mut rng = SmallRng::seed_from_u64(7);
        for theirs in 0..2 {
            assert_eq!(best_response(&model, 0, theirs, rng), Some(1));
            assert_eq!(best_response(&model, 1, theirs, rng), Some(1));
        }
    }
    #[test]
    fn follower_answers_leader() {
        let model = crate::catalog::stackelberg();
        assert_eq!(first_best_response(&model, 1, 0), Some(1));
        assert_eq!(first_best_response(&model, 1, 1), Some(1));
        assert_eq!(first_best_response(&model, 1, 2), Some(0));
    }
    #[test]
    fn ties_are_randomized() {
        let model = GameModel::new(
            "flat",
            "Flat",
            GameType::CompleteStatic,
            vec![
                Player::new("a", "A", &["x", "y", "z"]),
                Player::new("b", "B", &["x"]),
            ],
            PayoffMatrix::default()
                .with(&["x", "x"], &[1., 0.])
                .with(&["y", "x"], &[1., 0.])
                .with(&["z", "x"], &[0., 0.]),
        );
        let ref mut rng = SmallRng::seed_from_u64(11);
        let picks = (0..200)
            .filter_map(|_| best_response(&model, 0, 0, rng))
            .collect::<Vec<_>>();
        assert!(picks.contains(&0));
        assert!(picks.contains(&1));
        assert!(!picks.contains(&2));
        assert_eq!(first_best_response(&model, 0, 0), Some(0));
    }
    #[test]
    fn no_payoffs_no_response() {
        let model = GameModel::new(
            "empty",
            "Empty",
            GameType::CompleteStatic,
            vec![Player::new("a", "A", &["x"]), Player::new("b", "B", &["x"])],
            PayoffMatrix::default(),
        );
        let ref mut rng = SmallRng::seed_from_u64(0);
        assert_eq!(best_response(&model, 0, 0, rng), None);
    }
}
