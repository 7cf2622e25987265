use super::*;

/// What a player expects of an opponent holding one particular type.
#[derive(Debug, Clone, PartialEq)]
pub struct Conjecture {
    pub name: String,
    pub prior: Probability,
    pub belief: Belief,
}

impl Conjecture {
    pub fn new(name: &str, prior: Probability, belief: Belief) -> Self {
        Self {
            name: name.to_string(),
            prior,
            belief,
        }
    }
}

/// Expected payoff of each of `seat`'s strategies against the opponent's
/// type-conditioned behavior, plus `own_type`'s bias.
///
/// Strategies touching a missing payoff entry are left out.
pub fn expected_payoffs(
    model: &GameModel,
    seat: usize,
    own_type: Option<&str>,
    conjectures: &[Conjecture],
) -> Vec<(Choice, Utility)> {
    let Some((me, them)) = seats(model, seat) else {
        return Vec::new();
    };
    let mass = conjectures.iter().map(|c| c.prior).sum::<Probability>();
    if mass <= 0. {
        return Vec::new();
    }
    (0..me.count())
        .filter_map(|mine| {
            conjectures
                .iter()
                .map(|conjecture| {
                    conjecture
                        .belief
                        .weights(them)
                        .into_iter()
                        .enumerate()
                        .map(|(theirs, w)| model.duel_payoff(seat, mine, theirs).map(|u| w * u))
                        .sum::<Option<Utility>>()
                        .map(|u| conjecture.prior / mass * u)
                })
                .sum::<Option<Utility>>()
                .map(|u| (mine, u + me.bias(own_type, mine)))
        })
        .collect()
}

/// Bayesian best response: the expected-payoff maximizer, ties to the lowest index.
pub fn bayesian_response(
    model: &GameModel,
    seat: usize,
    own_type: Option<&str>,
    conjectures: &[Conjecture],
) -> Option<Choice> {
    maximizers(expected_payoffs(model, seat, own_type, conjectures))
        .first()
        .copied()
}
