use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Key under `signals` holding each typed player's realized hidden type.
pub const TYPES_SIGNAL: &str = "types";

/// Classification of the equilibrium a run is heading toward.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EquilibriumType {
    /// Pure equilibrium in dominant strategies.
    DominantStrategy,
    /// Randomized equilibrium of a 2×2 game.
    MixedStrategy,
    /// Pure Nash equilibrium found by play.
    Nash,
    /// Leader/follower subgame-perfect outcome.
    Stackelberg,
    /// Best responses to beliefs over hidden types.
    Bayesian,
    /// Type-revealing signals and signal-driven responses.
    Signaling,
    Unknown,
}

impl EquilibriumType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DominantStrategy => "dominant-strategy",
            Self::MixedStrategy => "mixed-strategy",
            Self::Nash => "nash",
            Self::Stackelberg => "stackelberg",
            Self::Bayesian => "bayesian",
            Self::Signaling => "signaling",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for EquilibriumType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Unilateral deviation check at one realized outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilityAnalysis {
    pub is_stable: bool,
    /// Best deviation payoff minus realized payoff, per player.
    pub deviation_gains: BTreeMap<PlayerId, Utility>,
}

/// One simulated round.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub step: usize,
    pub player_choices: BTreeMap<PlayerId, String>,
    pub payoffs: BTreeMap<PlayerId, Utility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beliefs: Option<Beliefs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convergence: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equilibrium_type: Option<EquilibriumType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_analysis: Option<StabilityAnalysis>,
}

impl SimulationResult {
    pub fn new(step: usize) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }
    /// Builds a bare record from `(player id, strategy name)` pairs.
    pub fn played<S>(step: usize, choices: &[(S, S)]) -> Self
    where
        S: AsRef<str>,
    {
        Self {
            step,
            player_choices: choices
                .iter()
                .map(|(id, strategy)| (id.as_ref().to_string(), strategy.as_ref().to_string()))
                .collect(),
            ..Self::default()
        }
    }
    /// Strategy index a seat played this round.
    pub fn choice(&self, model: &GameModel, seat: usize) -> Option<Choice> {
        let player = model.player(seat)?;
        self.player_choices
            .get(&player.id)
            .and_then(|strategy| player.choice(strategy))
    }
    /// Full choice profile in player order.
    pub fn profile(&self, model: &GameModel) -> Option<Vec<Choice>> {
        (0..model.players().len())
            .map(|seat| self.choice(model, seat))
            .collect()
    }
    pub fn payoff(&self, id: &str) -> Option<Utility> {
        self.payoffs.get(id).copied()
    }
    /// Hidden type a player was dealt this round, if recorded.
    pub fn realized_type(&self, id: &str) -> Option<&str> {
        self.signals
            .as_ref()
            .and_then(|signals| signals.get(TYPES_SIGNAL))
            .and_then(|types| types.get(id))
            .and_then(|kind| kind.as_str())
    }
}
