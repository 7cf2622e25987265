use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;

/// Immutable description of one game instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameModel {
    id: String,
    name: String,
    #[serde(rename = "type")]
    kind: GameType,
    players: Vec<Player>,
    payoff_matrix: PayoffMatrix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recommended_rounds: Option<Rounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    variant: Option<Variant>,
}

impl GameModel {
    pub fn new(
        id: &str,
        name: &str,
        kind: GameType,
        players: Vec<Player>,
        payoff_matrix: PayoffMatrix,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            players,
            payoff_matrix,
            recommended_rounds: None,
            variant: None,
        }
    }
    pub fn with_rounds(mut self, min: usize, max: usize) -> Self {
        self.recommended_rounds = Some(Rounds::new(min, max));
        self
    }
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = Some(variant);
        self
    }
    /// Parses a model as exported by the external editor.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let model = serde_json::from_str::<Self>(json)?;
        model.validate()?;
        Ok(model)
    }
}

impl GameModel {
    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> GameType {
        self.kind
    }
    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn payoffs(&self) -> &PayoffMatrix {
        &self.payoff_matrix
    }
    pub fn rounds(&self) -> Option<Rounds> {
        self.recommended_rounds
    }
    /// Explicit variant tag, or the family recognized from the id.
    pub fn variant(&self) -> Variant {
        self.variant.unwrap_or_else(|| Variant::recognize(&self.id))
    }
    pub fn resolution(&self) -> Resolution {
        self.variant().resolution(self.kind)
    }
    pub fn player(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }
    /// Position of a player id in the player order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }
    /// The two seats used by two-player algorithms, if the model has them.
    pub fn duel(&self) -> Option<(&Player, &Player)> {
        match self.players.as_slice() {
            [a, b] => Some((a, b)),
            _ => None,
        }
    }
}

impl GameModel {
    /// Strategy names for a full choice profile, in player order.
    pub fn names(&self, profile: &[Choice]) -> Option<Vec<&str>> {
        if profile.len() != self.players.len() {
            return None;
        }
        self.players
            .iter()
            .zip(profile)
            .map(|(player, &choice)| player.strategy(choice))
            .collect()
    }
    /// Payoff key for a full choice profile.
    pub fn key(&self, profile: &[Choice]) -> Option<String> {
        self.names(profile).map(|names| PayoffMatrix::key(&names))
    }
    /// All players' payoffs for a profile, if the entry exists and is long enough.
    pub fn outcome(&self, profile: &[Choice]) -> Option<&[Utility]> {
        self.key(profile)
            .and_then(|key| self.payoff_matrix.lookup(&key, self.players.len()))
    }
    /// One player's matrix payoff for a profile.
    pub fn payoff(&self, profile: &[Choice], player: usize) -> Option<Utility> {
        self.outcome(profile)
            .and_then(|payoffs| payoffs.get(player))
            .copied()
    }
    /// Two-player payoff with `mine` for seat `player` and `theirs` for the other seat.
    pub fn duel_payoff(&self, player: usize, mine: Choice, theirs: Choice) -> Option<Utility> {
        match player {
            0 => self.payoff(&[mine, theirs], 0),
            1 => self.payoff(&[theirs, mine], 1),
            _ => None,
        }
    }
    /// Every strategy combination, in lexicographic player order.
    pub fn profiles(&self) -> Vec<Vec<Choice>> {
        self.players
            .iter()
            .fold(vec![Vec::new()], |profiles, player| {
                profiles
                    .into_iter()
                    .flat_map(|prefix| {
                        (0..player.count()).map(move |choice| {
                            let mut profile = prefix.clone();
                            profile.push(choice);
                            profile
                        })
                    })
                    .collect()
            })
    }
}

impl GameModel {
    /// Deep shape check for models arriving from outside. The simulation
    /// path never calls this and tolerates malformed models.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.id.is_empty(), "model id is empty");
        anyhow::ensure!(
            (2..=4).contains(&self.players.len()),
            "model {} has {} players, expected 2 to 4",
            self.id,
            self.players.len()
        );
        let ref mut ids = BTreeSet::new();
        for player in self.players.iter() {
            anyhow::ensure!(ids.insert(&player.id), "duplicate player id {}", player.id);
            anyhow::ensure!(
                !player.strategies.is_empty(),
                "player {} has no strategies",
                player.id
            );
            let distinct = player.strategies.iter().collect::<BTreeSet<_>>();
            anyhow::ensure!(
                distinct.len() == player.strategies.len(),
                "player {} repeats a strategy name",
                player.id
            );
            if !player.types.is_empty() {
                let total = player.types.iter().map(|t| t.prior).sum::<Probability>();
                anyhow::ensure!(
                    (total - 1.).abs() < 1e-6,
                    "player {} type priors sum to {}",
                    player.id,
                    total
                );
            }
        }
        for profile in self.profiles() {
            let key = self.key(&profile).unwrap_or_default();
            anyhow::ensure!(
                self.payoff_matrix.lookup(&key, self.players.len()).is_some(),
                "missing or short payoff entry for {}",
                key
            );
        }
        if let Some(rounds) = self.recommended_rounds {
            anyhow::ensure!(
                rounds.min <= rounds.max,
                "recommended rounds {}..{} are inverted",
                rounds.min,
                rounds.max
            );
        }
        Ok(())
    }
}
