use crate::*;
use serde::Deserialize;
use serde::Serialize;

/// Named family of classic games with a dedicated way of being played.
///
/// Recognized once from a model's canonical id (or set explicitly), so the
/// rest of the engine dispatches on this tag rather than on id strings.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    PrisonersDilemma,
    SmartPig,
    MatchingPennies,
    BattleOfSexes,
    Stackelberg,
    #[serde(rename = "signaling-game")]
    Signaling,
    #[serde(rename = "bayesian-game")]
    Bayesian,
    Generic,
}

/// How strategies are resolved each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Dominant strategy with exploration, else best response to last play.
    Dominance,
    /// Sample from the closed-form 2×2 mixed equilibrium.
    Mixing,
    /// Backward induction over the move order.
    Sequential,
    /// Expected-payoff maximization against type-conditioned beliefs.
    Bayesian(Window),
    /// Type-driven signal, signal-driven response.
    Signaling,
}

impl Variant {
    /// Maps a canonical model id to its family.
    pub fn recognize(id: &str) -> Self {
        match id {
            "prisoners-dilemma" => Self::PrisonersDilemma,
            "smart-pig" => Self::SmartPig,
            "matching-pennies" => Self::MatchingPennies,
            "battle-of-sexes" => Self::BattleOfSexes,
            "stackelberg" => Self::Stackelberg,
            "signaling-game" => Self::Signaling,
            "bayesian-game" => Self::Bayesian,
            _ => Self::Generic,
        }
    }
    /// Resolution for this family, with the game type deciding `Generic`.
    pub fn resolution(&self, kind: GameType) -> Resolution {
        match self {
            Self::PrisonersDilemma | Self::SmartPig => Resolution::Dominance,
            Self::MatchingPennies | Self::BattleOfSexes => Resolution::Mixing,
            Self::Stackelberg => Resolution::Sequential,
            Self::Signaling => Resolution::Signaling,
            Self::Bayesian => Resolution::Bayesian(Window::Recent(BELIEF_WINDOW)),
            Self::Generic => match kind {
                GameType::CompleteStatic => Resolution::Dominance,
                GameType::CompleteDynamic => Resolution::Sequential,
                GameType::IncompleteStatic => Resolution::Bayesian(Window::Full),
                GameType::IncompleteDynamic => Resolution::Signaling,
            },
        }
    }
}

impl TryFrom<&str> for Variant {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match Self::recognize(s.trim()) {
            Self::Generic if s.trim() != "generic" => {
                Err(anyhow::anyhow!("unknown game variant: {}", s))
            }
            variant => Ok(variant),
        }
    }
}
