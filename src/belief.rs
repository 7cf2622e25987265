//! Empirical beliefs over each player's strategies.
//!
//! Beliefs are derived state: they are recomputed from the results history
//! whenever they are needed and never stored independently of it.
//!
//! ```text
//! p(s) = (n(s) + β) / (n + β·|S|)
//! ```
//!
//! With β > 0 every strategy keeps a positive probability.
use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Belief for every player, keyed by player id.
pub type Beliefs = BTreeMap<PlayerId, Belief>;

/// How much history a belief update looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Full,
    Recent(usize),
}

impl Window {
    /// The slice of history inside this window.
    pub fn view<'a>(&self, history: &'a [SimulationResult]) -> &'a [SimulationResult] {
        match self {
            Self::Full => history,
            Self::Recent(k) => &history[history.len().saturating_sub(*k)..],
        }
    }
}

/// Probability distribution over one player's strategy names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Belief(BTreeMap<String, Probability>);

impl Belief {
    pub fn uniform(player: &Player) -> Self {
        let mass = 1. / player.count().max(1) as Probability;
        Self(
            player
                .strategies
                .iter()
                .map(|s| (s.clone(), mass))
                .collect(),
        )
    }
    /// Smoothed empirical frequencies of `player`'s choices across `records`.
    ///
    /// Records naming a strategy the player does not have are ignored.
    pub fn observed<'a, I>(player: &Player, records: I) -> Self
    where
        I: IntoIterator<Item = &'a SimulationResult>,
    {
        let counts = records
            .into_iter()
            .filter_map(|record| record.player_choices.get(&player.id))
            .filter_map(|strategy| player.choice(strategy))
            .fold(vec![0usize; player.count()], |mut counts, choice| {
                counts[choice] += 1;
                counts
            });
        let total = counts.iter().sum::<usize>() as Probability;
        let denom = total + BELIEF_SMOOTHING * player.count() as Probability;
        Self(
            player
                .strategies
                .iter()
                .zip(counts)
                .map(|(s, n)| (s.clone(), (n as Probability + BELIEF_SMOOTHING) / denom))
                .collect(),
        )
    }
    /// Uniform with no history, smoothed frequencies otherwise.
    pub fn update(player: &Player, history: &[SimulationResult]) -> Self {
        if history.is_empty() {
            Self::uniform(player)
        } else {
            Self::observed(player, history)
        }
    }
    /// Frequencies over only the rounds where `player` was dealt `kind`.
    pub fn conditioned(player: &Player, history: &[SimulationResult], kind: &str) -> Option<Self> {
        let matching = history
            .iter()
            .filter(|record| record.realized_type(&player.id) == Some(kind))
            .collect::<Vec<_>>();
        (!matching.is_empty()).then(|| Self::observed(player, matching))
    }
    pub fn density(&self, strategy: &str) -> Probability {
        self.0.get(strategy).copied().unwrap_or(0.)
    }
    pub fn total(&self) -> Probability {
        self.0.values().sum()
    }
    /// Probabilities indexed by the player's strategy order.
    pub fn weights(&self, player: &Player) -> Vec<Probability> {
        player.strategies.iter().map(|s| self.density(s)).collect()
    }
}

/// Beliefs about every player given the history inside `window`.
pub fn update_beliefs(model: &GameModel, history: &[SimulationResult], window: Window) -> Beliefs {
    let view = window.view(history);
    log::trace!(
        "[belief] updating {} from {} of {} rounds",
        model.id(),
        view.len(),
        history.len()
    );
    model
        .players()
        .iter()
        .map(|player| (player.id.clone(), Belief::update(player, view)))
        .collect()
}
