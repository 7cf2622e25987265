//! Per-round strategy selection.
//!
//! The [`Selector`] owns the random source, so a seeded selector replays a
//! simulation exactly. How a strategy is picked depends on the model's
//! [`Resolution`]:
//!
//! | Resolution | Rule |
//! |------------|------|
//! | Dominance  | dominant strategy with probability `EXPLOITATION`, else uniform; without one, best response to the opponent's last choice |
//! | Mixing     | sample the 2×2 mixed equilibrium |
//! | Sequential | backward-induction plan, later movers answering the observed prefix |
//! | Bayesian   | expected-payoff maximizer against type-conditioned beliefs |
//! | Signaling  | sender signals its hidden type, receiver answers the signal |
//!
//! Selection never fails: anything it cannot resolve falls back to index 0
//! with a warning.
use crate::*;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::BTreeMap;

/// Choices of every player for one round, plus the types dealt for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub choices: Vec<Choice>,
    pub types: BTreeMap<PlayerId, String>,
}

/// What a player can see when choosing.
struct Context<'a> {
    step: usize,
    history: &'a [SimulationResult],
    observed: &'a [Choice],
    types: &'a BTreeMap<PlayerId, String>,
}

/// Strategy selector with an injected random source.
#[derive(Debug, Clone)]
pub struct Selector<R = SmallRng>
where
    R: Rng,
{
    rng: R,
    exploitation: Probability,
}

impl Selector<SmallRng> {
    /// Deterministic selector for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }
    /// Selector seeded from the operating system.
    pub fn entropic() -> Self {
        Self::new(SmallRng::from_os_rng())
    }
}

impl<R> Selector<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            exploitation: EXPLOITATION,
        }
    }
    pub fn with_exploitation(mut self, exploitation: Probability) -> Self {
        self.exploitation = exploitation.clamp(0., 1.);
        self
    }
    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Strategy index for one player on `step`, given past rounds.
    pub fn select(
        &mut self,
        model: &GameModel,
        player: &str,
        step: usize,
        history: &[SimulationResult],
    ) -> Choice {
        let Some(seat) = model.position(player) else {
            log::warn!("[selector] {} has no player {}", model.id(), player);
            return 0;
        };
        let ref types = self.deal(model);
        let context = Context {
            step,
            history,
            observed: &[],
            types,
        };
        self.choose(model, seat, &context)
    }

    /// Choices of all players for `step`, in move order.
    ///
    /// In dynamic games later movers observe earlier movers' choices from the
    /// same round; in static games everyone chooses from history alone.
    pub fn select_round(
        &mut self,
        model: &GameModel,
        step: usize,
        history: &[SimulationResult],
    ) -> Round {
        let types = self.deal(model);
        let sequential = model.kind().is_dynamic()
            || matches!(
                model.resolution(),
                Resolution::Sequential | Resolution::Signaling
            );
        let mut choices = Vec::with_capacity(model.players().len());
        for seat in 0..model.players().len() {
            let observed = if sequential { choices.as_slice() } else { &[] };
            let context = Context {
                step,
                history,
                observed,
                types: &types,
            };
            let choice = self.choose(model, seat, &context);
            choices.push(choice);
        }
        Round { choices, types }
    }

    /// Hidden types for this round, one per typed player.
    ///
    /// Only incomplete-information games and the signaling and Bayesian
    /// resolutions deal types. A signaling sender flips a fair coin between
    /// its first two types whatever its declared priors.
    pub fn deal(&mut self, model: &GameModel) -> BTreeMap<PlayerId, String> {
        let resolution = model.resolution();
        let hidden = !model.kind().is_complete()
            || matches!(resolution, Resolution::Signaling | Resolution::Bayesian(_));
        if !hidden {
            return BTreeMap::new();
        }
        let signaling = resolution == Resolution::Signaling;
        let mut types = BTreeMap::new();
        for (seat, player) in model.players().iter().enumerate() {
            if signaling && seat == 0 {
                let [high, low] = equilibrium::sender_types(model);
                let kind = if self.rng.random_bool(SIGNALING_PRIOR) { high } else { low };
                types.insert(player.id.clone(), kind);
            } else if let Some(kind) = self.draw(player) {
                types.insert(player.id.clone(), kind);
            }
        }
        types
    }

    /// Samples a type from the player's priors.
    fn draw(&mut self, player: &Player) -> Option<String> {
        let total = player.types.iter().map(|t| t.prior).sum::<Probability>();
        if total <= 0. {
            return None;
        }
        let target = self.rng.random::<Probability>() * total;
        let mut cumulative = 0.;
        for kind in player.types.iter() {
            cumulative += kind.prior;
            if target < cumulative {
                return Some(kind.name.clone());
            }
        }
        player.types.last().map(|t| t.name.clone())
    }

    fn choose(&mut self, model: &GameModel, seat: usize, context: &Context<'_>) -> Choice {
        let choice = match model.resolution() {
            Resolution::Dominance => self.dominance(model, seat, context),
            Resolution::Mixing => self.mixing(model, seat, context),
            Resolution::Sequential => self.sequential(model, seat, context),
            Resolution::Bayesian(window) => self.bayesian(model, seat, window, context),
            Resolution::Signaling => self.signaling(model, seat, context),
        };
        let count = model.player(seat).map(Player::count).unwrap_or(0);
        match choice {
            Some(choice) if choice < count => {
                log::trace!("[selector] step {} seat {} plays {}", context.step, seat, choice);
                choice
            }
            Some(choice) => fallback(model, seat, &format!("index {} out of range", choice)),
            None => fallback(model, seat, "no resolvable strategy"),
        }
    }

    fn dominance(&mut self, model: &GameModel, seat: usize, context: &Context<'_>) -> Option<Choice> {
        let (me, them) = equilibrium::seats(model, seat)?;
        if let Some(dominant) = dominant_strategy(model, seat) {
            return if self.rng.random_bool(self.exploitation) {
                Some(dominant)
            } else {
                Some(self.rng.random_range(0..me.count()))
            };
        }
        let other = 1 - seat;
        let theirs = match last_choice(model, other, context.history) {
            Some(theirs) => theirs,
            None if them.count() > 0 => self.rng.random_range(0..them.count()),
            None => return None,
        };
        best_response(model, seat, theirs, &mut self.rng)
    }

    fn mixing(&mut self, model: &GameModel, seat: usize, context: &Context<'_>) -> Option<Choice> {
        match mixed_equilibrium(model).and_then(|mixed| mixed.first(seat)) {
            Some(first) => Some(if self.rng.random_bool(first) { 0 } else { 1 }),
            None => {
                log::debug!("[selector] {} is not 2×2, playing dominance", model.id());
                self.dominance(model, seat, context)
            }
        }
    }

    fn sequential(&mut self, model: &GameModel, seat: usize, context: &Context<'_>) -> Option<Choice> {
        let plan = backward_induction(model)?;
        let prefix = if context.observed.len() >= seat {
            context.observed[..seat].to_vec()
        } else {
            context
                .history
                .last()
                .and_then(|record| record.profile(model))
                .map(|profile| profile[..seat].to_vec())
                .unwrap_or_else(|| plan.path()[..seat].to_vec())
        };
        plan.choice(&prefix)
    }

    fn bayesian(
        &mut self,
        model: &GameModel,
        seat: usize,
        window: Window,
        context: &Context<'_>,
    ) -> Option<Choice> {
        let (me, them) = equilibrium::seats(model, seat)?;
        let view = window.view(context.history);
        let conjectures = if them.types.is_empty() {
            vec![Conjecture::new("any", 1., Belief::update(them, view))]
        } else {
            them.types
                .iter()
                .map(|kind| {
                    let belief = Belief::conditioned(them, view, &kind.name)
                        .unwrap_or_else(|| Belief::update(them, view));
                    Conjecture::new(&kind.name, kind.prior, belief)
                })
                .collect()
        };
        let own = context.types.get(&me.id).map(String::as_str);
        bayesian_response(model, seat, own, &conjectures)
    }

    fn signaling(&mut self, model: &GameModel, seat: usize, context: &Context<'_>) -> Option<Choice> {
        let (sender, _) = equilibrium::seats(model, 0)?;
        let dealt = context
            .types
            .get(&sender.id)
            .and_then(|kind| equilibrium::signal(model, kind));
        match seat {
            0 => dealt,
            1 => {
                let observed = context
                    .observed
                    .first()
                    .copied()
                    .or(dealt)
                    .or_else(|| last_choice(model, 0, context.history))?;
                signal_response(model, observed)
            }
            _ => None,
        }
    }
}

impl Default for Selector<SmallRng> {
    fn default() -> Self {
        Self::entropic()
    }
}

/// Most recent resolvable choice of `seat` in the history.
fn last_choice(model: &GameModel, seat: usize, history: &[SimulationResult]) -> Option<Choice> {
    history
        .iter()
        .rev()
        .find_map(|record| record.choice(model, seat))
}

fn fallback(model: &GameModel, seat: usize, reason: &str) -> Choice {
    log::warn!(
        "[selector] {} seat {}: {}, defaulting to index 0",
        model.id(),
        seat,
        reason
    );
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replay(model: &GameModel, rounds: usize, seed: u64) -> Vec<SimulationResult> {
        let mut selector = Selector::seeded(seed);
        let mut history = Vec::new();
        for step in 0..rounds {
            let round = selector.select_round(model, step, &history);
            let names = model.names(&round.choices).unwrap();
            let mut record = SimulationResult::new(step);
            for (player, name) in model.players().iter().zip(names) {
                record.player_choices.insert(player.id.clone(), name.to_string());
            }
            if !round.types.is_empty() {
                record.signals = Some(serde_json::json!({ TYPES_SIGNAL: round.types }));
            }
            history.push(record);
        }
        history
    }

    #[test]
    fn indices_always_in_range() {
        for model in crate::catalog::all() {
            let history = replay(&model, 40, 3);
            let mut selector = Selector::seeded(9);
            for step in 0..history.len() {
                for player in model.players() {
                    let choice = selector.select(&model, &player.id, step, &history[..step]);
                    assert!(choice < player.count(), "{} {}", model.id(), player.id);
                }
            }
        }
    }
    #[test]
    fn dilemma_mostly_defects() {
        let model = crate::catalog::prisoners_dilemma();
        let history = replay(&model, 500, 1);
        let defections = history
            .iter()
            .filter(|r| r.player_choices["alice"] == "defect")
            .count();
        assert!(defections > 400, "{} defections", defections);
        assert!(defections < 500, "never explored");
    }
    #[test]
    fn big_pig_answers_last_small_pig_choice() {
        let model = crate::catalog::smart_pig();
        let mut selector = Selector::seeded(5);
        let waited = vec![SimulationResult::played(0, &[("big", "wait"), ("small", "wait")])];
        let pressed = vec![SimulationResult::played(0, &[("big", "wait"), ("small", "press")])];
        assert_eq!(selector.select(&model, "big", 1, &waited), 0);
        assert_eq!(selector.select(&model, "big", 1, &pressed), 1);
    }
    #[test]
    fn stackelberg_follows_plan() {
        let model = crate::catalog::stackelberg();
        let mut selector = Selector::seeded(0);
        let round = selector.select_round(&model, 0, &[]);
        assert_eq!(round.choices, vec![2, 0]);
        assert!(round.types.is_empty());
        let history = vec![SimulationResult::played(0, &[("leader", "medium"), ("follower", "low")])];
        assert_eq!(selector.select(&model, "follower", 1, &history), 1);
    }
    #[test]
    fn signals_separate_types() {
        let model = crate::catalog::signaling_game();
        let history = replay(&model, 200, 8);
        let mut highs = 0;
        for record in history.iter() {
            match record.realized_type("worker") {
                Some("high") => {
                    highs += 1;
                    assert_eq!(record.player_choices["worker"], "educate");
                    assert_eq!(record.player_choices["firm"], "hire");
                }
                Some("low") => {
                    assert_eq!(record.player_choices["worker"], "idle");
                    assert_eq!(record.player_choices["firm"], "reject");
                }
                other => panic!("unexpected type {:?}", other),
            }
        }
        assert!((60..140).contains(&highs), "{} high types", highs);
    }
    #[test]
    fn signaling_variant_deals_on_complete_type() {
        let signaling = crate::catalog::signaling_game();
        let model = GameModel::new(
            "job-market",
            "Job Market",
            GameType::CompleteDynamic,
            signaling.players().to_vec(),
            signaling.payoffs().clone(),
        )
        .with_variant(Variant::Signaling);
        assert_eq!(model.resolution(), Resolution::Signaling);
        let mut selector = Selector::seeded(4);
        let mut signals = std::collections::BTreeSet::new();
        for step in 0..50 {
            let round = selector.select_round(&model, step, &[]);
            let kind = round.types.get("worker").expect("sender dealt a type");
            let expected = if kind == "high" { 0 } else { 1 };
            assert_eq!(round.choices[0], expected);
            signals.insert(round.choices[0]);
        }
        assert_eq!(signals.len(), 2);
    }
    #[test]
    fn degenerate_models_default_to_first_index() {
        let solo = GameModel::new(
            "solo",
            "Solo",
            GameType::CompleteStatic,
            vec![Player::new("a", "A", &["x", "y"])],
            PayoffMatrix::default().with(&["x"], &[1.]).with(&["y"], &[0.]),
        );
        let empty = GameModel::new(
            "empty",
            "Empty",
            GameType::IncompleteDynamic,
            vec![Player::new("a", "A", &[]), Player::new("b", "B", &[])],
            PayoffMatrix::default(),
        );
        let mut selector = Selector::seeded(1);
        for step in 0..10 {
            assert_eq!(selector.select_round(&solo, step, &[]).choices, vec![0]);
            assert_eq!(selector.select_round(&empty, step, &[]).choices, vec![0, 0]);
        }
    }
    #[test]
    fn pennies_mix_both_faces() {
        let model = crate::catalog::matching_pennies();
        let history = replay(&model, 400, 21);
        let heads = history
            .iter()
            .filter(|r| r.player_choices["even"] == "heads")
            .count();
        assert!((140..260).contains(&heads), "{} heads", heads);
    }
    #[test]
    fn bayesian_incumbent_plays_its_type() {
        let model = crate::catalog::bayesian_game();
        let history = replay(&model, 100, 13);
        for record in history.iter().skip(1) {
            if record.player_choices["entrant"] != "enter" {
                continue;
            }
            let expected = match record.realized_type("incumbent") {
                Some("strong") => "fight",
                _ => "accommodate",
            };
            assert_eq!(record.player_choices["incumbent"], expected);
        }
    }
    #[test]
    fn unknown_player_defaults() {
        let model = crate::catalog::prisoners_dilemma();
        assert_eq!(Selector::seeded(0).select(&model, "carol", 0, &[]), 0);
    }
    #[test]
    fn seeded_selectors_replay() {
        let model = crate::catalog::battle_of_sexes();
        assert_eq!(replay(&model, 50, 77), replay(&model, 50, 77));
    }
}
