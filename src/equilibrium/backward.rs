//! Subgame-perfect play of a game where players move once each, in order.
//!
//! The tree is walked depth-first along a path of strategy indices. At a
//! path of length `players.len()` the payoff matrix is consulted; above it,
//! the player whose turn it is keeps the child that maximizes their own
//! continuation value. Depth never exceeds the player count.
use super::*;
use std::collections::BTreeMap;

/// Solved game: equilibrium path, its payoffs, and the choice at every node.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    path: Vec<Choice>,
    values: Vec<Utility>,
    policy: BTreeMap<Vec<Choice>, Choice>,
}

impl Plan {
    /// Choices along the equilibrium path, one per player.
    pub fn path(&self) -> &[Choice] {
        &self.path
    }
    /// Payoffs at the end of the equilibrium path.
    pub fn values(&self) -> &[Utility] {
        &self.values
    }
    /// Choice of the player to move after `prefix` has been played.
    pub fn choice(&self, prefix: &[Choice]) -> Option<Choice> {
        self.policy.get(prefix).copied()
    }
}

/// Continuation from one node: payoffs and the rest of the path.
type Continuation = (Vec<Utility>, Vec<Choice>);

/// Solves the move-once-in-order game tree, ties to the lowest index.
pub fn backward_induction(model: &GameModel) -> Option<Plan> {
    let ref mut policy = BTreeMap::new();
    let ref mut path = Vec::with_capacity(model.players().len());
    let (values, path) = descend(model, path, policy)?;
    Some(Plan {
        path,
        values,
        policy: std::mem::take(policy),
    })
}

fn descend(
    model: &GameModel,
    path: &mut Vec<Choice>,
    policy: &mut BTreeMap<Vec<Choice>, Choice>,
) -> Option<Continuation> {
    let depth = path.len();
    let players = model.players();
    if depth >= players.len() {
        return model.outcome(path).map(|payoffs| (payoffs.to_vec(), Vec::new()));
    }
    let mut best = None::<(Choice, Continuation)>;
    for choice in 0..players[depth].count() {
        path.push(choice);
        let child = descend(model, path, policy);
        path.pop();
        if let Some(child) = child {
            let better = match &best {
                Some((_, incumbent)) => child.0[depth] > incumbent.0[depth],
                None => true,
            };
            if better {
                best = Some((choice, child));
            }
        }
    }
    let (choice, (values, mut rest)) = best?;
    policy.insert(path.clone(), choice);
    rest.insert(0, choice);
    Some((values, rest))
}
