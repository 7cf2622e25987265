//! Separating play in two-player signaling games.
//!
//! Seat 0 is the informed sender and seat 1 the receiver. A signal's cost is
//! what the sender gives up on average by sending it:
//!
//! ```text
//! cost(s) = -mean_r u_sender(s, r)
//! ```
//!
//! The first ("high") type sends the costliest signal and every other type
//! the cheapest. The receiver answers the signal it sees, never the type.
use super::*;

/// The sender's first two type names, or the default high/low pair.
pub fn sender_types(model: &GameModel) -> [String; 2] {
    match model.player(0).map(|p| p.types.as_slice()) {
        Some([high, low, ..]) => [high.name.clone(), low.name.clone()],
        _ => SIGNALING_TYPES.map(String::from),
    }
}

/// Cost of each sender strategy with at least one payoff entry.
pub fn signal_costs(model: &GameModel) -> Vec<(Choice, Utility)> {
    let Some((sender, receiver)) = seats(model, 0) else {
        return Vec::new();
    };
    (0..sender.count())
        .filter_map(|signal| {
            let payoffs = (0..receiver.count())
                .filter_map(|response| model.duel_payoff(0, signal, response))
                .collect::<Vec<_>>();
            (!payoffs.is_empty())
                .then(|| (signal, -payoffs.iter().sum::<Utility>() / payoffs.len() as Utility))
        })
        .collect()
}

/// Signal sent by a sender of type `kind`.
pub fn signal(model: &GameModel, kind: &str) -> Option<Choice> {
    let costs = signal_costs(model);
    let ranked = if sender_types(model)[0] == kind {
        maximizers(costs)
    } else {
        maximizers(costs.into_iter().map(|(s, c)| (s, -c)))
    };
    ranked.first().copied()
}

/// Receiver's answer to an observed signal, ties to the lowest index.
pub fn signal_response(model: &GameModel, signal: Choice) -> Option<Choice> {
    first_best_response(model, 1, signal)
}
