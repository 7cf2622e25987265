//! Pure equilibrium computations over a [`GameModel`].
//!
//! Nothing here mutates state or logs above `warn`; every function degrades
//! to `None` when the model lacks the shape or payoffs it needs.
//!
//! - [`dominant_strategy`]: strict dominance against every opponent strategy
//! - [`best_response`]: payoff maximizer against a fixed opponent choice
//! - [`mixed_equilibrium`]: closed-form 2×2 indifference solution
//! - [`backward_induction`]: subgame-perfect plan over the move order
//! - [`bayesian_response`]: expected-payoff maximizer over opponent types
//! - [`signal`] / [`signal_response`]: separating play in signaling games

mod backward;
mod bayesian;
mod dominance;
mod mixed;
mod response;
mod signaling;

pub use backward::*;
pub use bayesian::*;
pub use dominance::*;
pub use mixed::*;
pub use response::*;
pub use signaling::*;

use crate::*;

/// The seat's player and its opponent, for algorithms defined on two players.
pub(crate) fn seats(model: &GameModel, seat: usize) -> Option<(&Player, &Player)> {
    match (model.duel(), seat) {
        (Some((a, b)), 0) => Some((a, b)),
        (Some((a, b)), 1) => Some((b, a)),
        (Some(_), _) => None,
        (None, _) => {
            log::warn!(
                "[equilibrium] {} has {} players, two-player analysis skipped",
                model.id(),
                model.players().len()
            );
            None
        }
    }
}

/// Indices attaining the maximum value, in ascending order.
pub(crate) fn maximizers<I>(values: I) -> Vec<Choice>
where
    I: IntoIterator<Item = (Choice, Utility)>,
{
    values
        .into_iter()
        .fold((Utility::NEG_INFINITY, Vec::new()), |(best, mut argmax), (i, v)| {
            if v > best {
                (v, vec![i])
            } else if v == best {
                argmax.push(i);
                (best, argmax)
            } else {
                (best, argmax)
            }
        })
        .1
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn maximizers_keep_ties() {
        assert_eq!(maximizers([(0, 1.), (1, 3.), (2, 3.), (3, 2.)]), vec![1, 2]);
        assert_eq!(maximizers(Vec::<(Choice, Utility)>::new()), Vec::<Choice>::new());
    }
    #[test]
    fn seats_require_two_players() {
        let model = crate::catalog::prisoners_dilemma();
        assert_eq!(seats(&model, 1).map(|(me, _)| me.id.as_str()), Some("bob"));
        assert!(seats(&model, 2).is_none());
    }
}
