use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// One hidden type a player may be dealt in an incomplete-information game.
///
/// `bias` shifts the holder's own payoff for the named strategies, which is
/// how a type changes preferences without a separate payoff matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerType {
    pub name: String,
    pub prior: Probability,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bias: BTreeMap<String, Utility>,
}

impl PlayerType {
    pub fn new(name: &str, prior: Probability) -> Self {
        Self {
            name: name.to_string(),
            prior,
            bias: BTreeMap::new(),
        }
    }
    pub fn biased(mut self, strategy: &str, shift: Utility) -> Self {
        self.bias.insert(strategy.to_string(), shift);
        self
    }
    pub fn shift(&self, strategy: &str) -> Utility {
        self.bias.get(strategy).copied().unwrap_or(0.)
    }
}

/// A participant with an ordered, non-empty list of distinct strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub strategies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<PlayerType>,
}

impl Player {
    pub fn new(id: &str, name: &str, strategies: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            strategies: strategies.iter().map(|s| s.to_string()).collect(),
            types: Vec::new(),
        }
    }
    pub fn typed(mut self, kind: PlayerType) -> Self {
        self.types.push(kind);
        self
    }
    pub fn strategy(&self, choice: Choice) -> Option<&str> {
        self.strategies.get(choice).map(String::as_str)
    }
    pub fn choice(&self, strategy: &str) -> Option<Choice> {
        self.strategies.iter().position(|s| s == strategy)
    }
    pub fn count(&self) -> usize {
        self.strategies.len()
    }
    pub fn kind(&self, name: &str) -> Option<&PlayerType> {
        self.types.iter().find(|t| t.name == name)
    }
    /// Payoff shift for playing `choice` while holding type `kind`.
    pub fn bias(&self, kind: Option<&str>, choice: Choice) -> Utility {
        match (kind.and_then(|k| self.kind(k)), self.strategy(choice)) {
            (Some(kind), Some(strategy)) => kind.shift(strategy),
            _ => 0.,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn strategy_lookups() {
        let player = Player::new("p1", "Row", &["up", "down"]);
        assert_eq!(player.strategy(1), Some("down"));
        assert_eq!(player.strategy(2), None);
        assert_eq!(player.choice("up"), Some(0));
        assert_eq!(player.choice("left"), None);
    }
    #[test]
    fn bias_applies_to_own_type_only() {
        let player = Player::new("w", "Worker", &["educate", "idle"])
            .typed(PlayerType::new("high", 0.5))
            .typed(PlayerType::new("low", 0.5).biased("educate", -3.));
        assert_eq!(player.bias(Some("low"), 0), -3.);
        assert_eq!(player.bias(Some("low"), 1), 0.);
        assert_eq!(player.bias(Some("high"), 0), 0.);
        assert_eq!(player.bias(None, 0), 0.);
    }
}
