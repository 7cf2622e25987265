use crate::*;
use rand::Rng;
use rand::rngs::SmallRng;
use std::collections::BTreeMap;

/// Lifecycle of a simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Stopped,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Why a running simulation stopped on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// The round budget ran out.
    RoundLimit,
    /// Recent play settled on a Nash outcome.
    Equilibrium,
}

/// Messages a [`Simulation`] accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Stop,
    Reset,
    Tick,
    /// Replace the results with an externally persisted run.
    Load(Vec<SimulationResult>),
}

/// What handling one [`Command`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Tick arrived while not running.
    Idle,
    /// A round was simulated and appended at this step.
    Recorded(usize),
    Finished(Termination),
    Transition(Phase),
}

/// Tick-driven simulation controller.
///
/// Owns the results sequence exclusively. Each [`Simulation::tick`] either
/// stops the run or appends exactly one record.
#[derive(Debug, Clone)]
pub struct Simulation<R = SmallRng>
where
    R: Rng,
{
    model: GameModel,
    selector: Selector<R>,
    phase: Phase,
    step: usize,
    limit: Option<usize>,
    results: Vec<SimulationResult>,
}

impl Simulation<SmallRng> {
    pub fn seeded(model: GameModel, seed: u64) -> Self {
        Self::new(model, Selector::seeded(seed))
    }
}

impl<R> Simulation<R>
where
    R: Rng,
{
    pub fn new(model: GameModel, selector: Selector<R>) -> Self {
        Self {
            model,
            selector,
            phase: Phase::default(),
            step: 0,
            limit: None,
            results: Vec::new(),
        }
    }
    /// Caps the run at `rounds`, overriding the model's recommended maximum.
    pub fn with_round_limit(mut self, rounds: usize) -> Self {
        self.limit = Some(rounds);
        self
    }
    pub fn model(&self) -> &GameModel {
        &self.model
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }
    pub fn current_step(&self) -> usize {
        self.step
    }
    pub fn results(&self) -> &[SimulationResult] {
        &self.results
    }
    /// Round budget in effect, if any.
    pub fn round_limit(&self) -> Option<usize> {
        self.limit.or(self.model.rounds().map(|rounds| rounds.max))
    }
    pub fn analyze(&self) -> Analysis {
        analyze(&self.model, &self.results)
    }
}

impl<R> Simulation<R>
where
    R: Rng,
{
    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::Start => self.start(),
            Command::Stop => self.stop(),
            Command::Reset => self.reset(),
            Command::Tick => self.tick(),
            Command::Load(results) => self.load(results),
        }
    }
    pub fn start(&mut self) -> Outcome {
        if self.phase != Phase::Running {
            log::info!("[simulation] {} running from step {}", self.model.id(), self.step);
        }
        self.transition(Phase::Running)
    }
    /// Stops a running simulation, keeping its results.
    pub fn stop(&mut self) -> Outcome {
        match self.phase {
            Phase::Running => {
                log::info!("[simulation] {} stopped at step {}", self.model.id(), self.step);
                self.transition(Phase::Stopped)
            }
            phase => Outcome::Transition(phase),
        }
    }
    pub fn pause(&mut self) -> Outcome {
        self.stop()
    }
    /// Discards all results and returns to idle.
    pub fn reset(&mut self) -> Outcome {
        log::info!("[simulation] {} reset", self.model.id());
        self.results.clear();
        self.step = 0;
        self.transition(Phase::Idle)
    }
    /// Replaces the results with a persisted run and resumes counting after it.
    pub fn load(&mut self, results: Vec<SimulationResult>) -> Outcome {
        log::info!(
            "[simulation] {} loaded {} results",
            self.model.id(),
            results.len()
        );
        self.step = results.len();
        self.results = results;
        match self.phase {
            Phase::Running => self.transition(Phase::Stopped),
            phase => Outcome::Transition(phase),
        }
    }
    pub fn tick(&mut self) -> Outcome {
        if !self.is_running() {
            return Outcome::Idle;
        }
        if let Some(termination) = self.termination() {
            log::info!(
                "[simulation] {} finished at step {}: {:?}",
                self.model.id(),
                self.step,
                termination
            );
            self.phase = Phase::Stopped;
            return Outcome::Finished(termination);
        }
        let step = self.step;
        let record = self.simulate(step);
        log::debug!(
            "[simulation] {} step {} {:?} -> {:?}",
            self.model.id(),
            step,
            record.player_choices,
            record.payoffs
        );
        self.results.push(record);
        self.annotate();
        self.step += 1;
        Outcome::Recorded(step)
    }
    /// Ticks until the run stops or `ticks` ticks have passed.
    pub fn run_to_end(&mut self, ticks: usize) -> Option<Termination> {
        for _ in 0..ticks {
            match self.tick() {
                Outcome::Finished(termination) => return Some(termination),
                Outcome::Idle => return None,
                _ => continue,
            }
        }
        None
    }
}

impl<R> Simulation<R>
where
    R: Rng,
{
    fn transition(&mut self, phase: Phase) -> Outcome {
        self.phase = phase;
        Outcome::Transition(phase)
    }
    fn termination(&self) -> Option<Termination> {
        if self.round_limit().is_some_and(|max| self.step >= max) {
            return Some(Termination::RoundLimit);
        }
        let steady = settled(&self.results, STABILITY_WINDOW);
        let nash = self
            .results
            .last()
            .is_some_and(|record| is_nash(&self.model, record));
        (steady && nash).then_some(Termination::Equilibrium)
    }
    /// One fresh round: choices, realized payoffs, dealt types and the beliefs
    /// held going into it.
    fn simulate(&mut self, step: usize) -> SimulationResult {
        let round = self
            .selector
            .select_round(&self.model, step, &self.results);
        let mut record = SimulationResult::new(step);
        match self.model.names(&round.choices) {
            Some(names) => {
                for (player, name) in self.model.players().iter().zip(names) {
                    record.player_choices.insert(player.id.clone(), name.to_string());
                }
            }
            None => log::warn!(
                "[simulation] {} step {}: unnamed choices {:?}",
                self.model.id(),
                step,
                round.choices
            ),
        }
        record.payoffs = self.realize(&round).unwrap_or_else(|| {
            log::warn!(
                "[simulation] {} step {}: no payoff entry for {:?}, payoffs skipped",
                self.model.id(),
                step,
                round.choices
            );
            BTreeMap::new()
        });
        if !round.types.is_empty() {
            record.signals = Some(serde_json::json!({ TYPES_SIGNAL: round.types }));
        }
        if !self.model.kind().is_complete() {
            let window = match self.model.resolution() {
                Resolution::Bayesian(window) => window,
                _ => Window::Full,
            };
            record.beliefs = Some(update_beliefs(&self.model, &self.results, window));
        }
        record
    }
    /// Matrix payoffs for the round shifted by each player's dealt type.
    fn realize(&self, round: &Round) -> Option<BTreeMap<PlayerId, Utility>> {
        let outcome = self.model.outcome(&round.choices)?;
        Some(
            self.model
                .players()
                .iter()
                .zip(outcome)
                .zip(round.choices.iter())
                .map(|((player, &u), &choice)| {
                    let kind = round.types.get(&player.id).map(String::as_str);
                    (player.id.clone(), u + player.bias(kind, choice))
                })
                .collect(),
        )
    }
    /// Fills the latest record's running analysis.
    fn annotate(&mut self) {
        let convergence = convergence(&self.results);
        let equilibrium = classify(&self.model, &self.results);
        let stability = self
            .results
            .last()
            .and_then(|record| stability_at(&self.model, record));
        if let Some(record) = self.results.last_mut() {
            record.convergence = Some(convergence);
            record.equilibrium_type = Some(equilibrium);
            record.stability_analysis = stability;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::confession;

    #[test]
    fn lifecycle_transitions() {
        let mut sim = Simulation::seeded(crate::catalog::prisoners_dilemma(), 0);
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.tick(), Outcome::Idle);
        assert!(sim.results().is_empty());
        assert_eq!(sim.start(), Outcome::Transition(Phase::Running));
        assert!(sim.is_running());
        assert_eq!(sim.tick(), Outcome::Recorded(0));
        assert_eq!(sim.tick(), Outcome::Recorded(1));
        assert_eq!(sim.stop(), Outcome::Transition(Phase::Stopped));
        assert!(!sim.is_running());
        assert_eq!(sim.results().len(), 2);
        assert_eq!(sim.tick(), Outcome::Idle);
        assert_eq!(sim.reset(), Outcome::Transition(Phase::Idle));
        assert!(sim.results().is_empty());
        assert_eq!(sim.current_step(), 0);
    }
    #[test]
    fn restarts_after_stop() {
        let mut sim = Simulation::seeded(crate::catalog::prisoners_dilemma(), 0);
        sim.apply(Command::Start);
        sim.apply(Command::Tick);
        sim.apply(Command::Stop);
        assert_eq!(sim.apply(Command::Start), Outcome::Transition(Phase::Running));
        assert_eq!(sim.apply(Command::Tick), Outcome::Recorded(1));
        assert_eq!(sim.pause(), Outcome::Transition(Phase::Stopped));
        assert_eq!(sim.tick(), Outcome::Idle);
    }
    #[test]
    fn stops_at_round_limit() {
        let model = crate::catalog::matching_pennies().with_rounds(1, 3);
        let mut sim = Simulation::seeded(model, 4);
        sim.start();
        assert_eq!(sim.run_to_end(100), Some(Termination::RoundLimit));
        assert_eq!(sim.results().len(), 3);
        assert_eq!(sim.phase(), Phase::Stopped);
        let mut capped = Simulation::seeded(crate::catalog::matching_pennies(), 4).with_round_limit(7);
        capped.start();
        assert_eq!(capped.run_to_end(100), Some(Termination::RoundLimit));
        assert_eq!(capped.results().len(), 7);
    }
    #[test]
    fn stops_on_settled_equilibrium() {
        let selector = Selector::seeded(2).with_exploitation(1.);
        let mut sim = Simulation::new(confession(), selector);
        sim.start();
        assert_eq!(sim.run_to_end(100), Some(Termination::Equilibrium));
        assert_eq!(sim.results().len(), STABILITY_WINDOW);
        let last = sim.results().last().unwrap();
        assert_eq!(last.player_choices["甲"], "坦白");
        assert_eq!(last.payoffs["乙"], -8.);
        assert_eq!(last.equilibrium_type, Some(EquilibriumType::DominantStrategy));
        assert!(last.stability_analysis.as_ref().unwrap().is_stable);
        assert_eq!(last.convergence, Some(false));
    }
    #[test]
    fn run_to_end_respects_tick_budget() {
        let mut sim = Simulation::seeded(crate::catalog::matching_pennies(), 1);
        assert_eq!(sim.run_to_end(10), None);
        sim.start();
        assert_eq!(sim.run_to_end(10), None);
        assert_eq!(sim.results().len(), 10);
        assert!(sim.is_running());
    }
    #[test]
    fn records_types_beliefs_and_biased_payoffs() {
        let mut sim = Simulation::seeded(crate::catalog::signaling_game(), 6);
        sim.start();
        sim.run_to_end(20);
        for record in sim.results() {
            let beliefs = record.beliefs.as_ref().unwrap();
            assert!((beliefs["firm"].total() - 1.).abs() < 1e-9);
            let expected = match record.realized_type("worker") {
                Some("low") if record.player_choices["worker"] == "educate" => -3.,
                Some(_) => 0.,
                None => panic!("no dealt type at step {}", record.step),
            };
            let matrix = match (
                record.player_choices["worker"].as_str(),
                record.player_choices["firm"].as_str(),
            ) {
                ("educate", "hire") => 6.,
                ("educate", "reject") => -2.,
                ("idle", "hire") => 4.,
                _ => 1.,
            };
            assert_eq!(record.payoffs["worker"], matrix + expected);
            assert_eq!(record.equilibrium_type, Some(EquilibriumType::Signaling));
        }
    }
    #[test]
    fn complete_games_skip_beliefs() {
        let mut sim = Simulation::seeded(crate::catalog::stackelberg(), 0);
        sim.start();
        sim.tick();
        let record = &sim.results()[0];
        assert!(record.beliefs.is_none());
        assert!(record.signals.is_none());
        assert_eq!(record.payoffs["leader"], 18.);
        assert_eq!(record.payoffs["follower"], 9.);
    }
    #[test]
    fn missing_payoffs_are_skipped() {
        let model = GameModel::new(
            "sparse",
            "Sparse",
            GameType::CompleteStatic,
            vec![
                Player::new("a", "A", &["x", "y"]),
                Player::new("b", "B", &["x", "y"]),
            ],
            PayoffMatrix::default().with(&["x", "x"], &[1., 1.]),
        );
        let mut sim = Simulation::seeded(model, 3);
        sim.start();
        sim.run_to_end(10);
        assert!(!sim.results().is_empty());
        for record in sim.results() {
            assert_eq!(record.player_choices.len(), 2);
            let complete = record.player_choices.values().all(|s| s == "x");
            assert_eq!(record.payoffs.is_empty(), !complete);
            assert_eq!(record.stability_analysis.is_some(), complete);
        }
    }
    #[test]
    fn single_player_model_settles() {
        let model = GameModel::new(
            "solo",
            "Solo",
            GameType::CompleteStatic,
            vec![Player::new("a", "A", &["x", "y"])],
            PayoffMatrix::default().with(&["x"], &[1.]).with(&["y"], &[0.]),
        );
        let mut sim = Simulation::seeded(model, 7);
        sim.start();
        assert_eq!(sim.run_to_end(20), Some(Termination::Equilibrium));
        assert_eq!(sim.results().len(), STABILITY_WINDOW);
        for (step, record) in sim.results().iter().enumerate() {
            assert_eq!(record.step, step);
            assert_eq!(record.player_choices["a"], "x");
            assert_eq!(record.payoffs["a"], 1.);
        }
        let analysis = sim.analyze();
        assert_eq!(analysis.dominant_strategies["a"], None);
        assert!(analysis.mixed_equilibrium.is_none());
        assert_eq!(analysis.equilibrium_type, EquilibriumType::Nash);
        assert!(analysis.stability_analysis.unwrap().is_stable);
    }
    #[test]
    fn strategyless_players_record_empty_rounds() {
        let model = GameModel::new(
            "empty",
            "Empty",
            GameType::IncompleteDynamic,
            vec![Player::new("a", "A", &[]), Player::new("b", "B", &[])],
            PayoffMatrix::default(),
        );
        let mut sim = Simulation::seeded(model, 7);
        sim.start();
        assert_eq!(sim.run_to_end(20), None);
        assert_eq!(sim.results().len(), 20);
        assert!(sim.is_running());
        for (step, record) in sim.results().iter().enumerate() {
            assert_eq!(record.step, step);
            assert!(record.player_choices.is_empty());
            assert!(record.payoffs.is_empty());
            assert!(record.stability_analysis.is_none());
            assert!(record.beliefs.is_some());
        }
        let analysis = sim.analyze();
        assert!(analysis.dominant_strategies.values().all(Option::is_none));
        assert!(analysis.mixed_equilibrium.is_none());
        assert!(analysis.stability_analysis.is_none());
        assert_eq!(analysis.equilibrium_type, EquilibriumType::Signaling);
    }
    #[test]
    fn load_replaces_and_stops() {
        let mut sim = Simulation::seeded(crate::catalog::prisoners_dilemma(), 0);
        sim.start();
        sim.tick();
        let persisted = (0..3)
            .map(|i| SimulationResult::played(i, &[("alice", "defect"), ("bob", "defect")]))
            .collect::<Vec<_>>();
        assert_eq!(
            sim.apply(Command::Load(persisted.clone())),
            Outcome::Transition(Phase::Stopped)
        );
        assert_eq!(sim.results(), persisted.as_slice());
        assert_eq!(sim.current_step(), 3);
        sim.start();
        assert_eq!(sim.tick(), Outcome::Recorded(3));
    }
    #[test]
    fn seeded_runs_replay() {
        let run = |seed| {
            let mut sim = Simulation::seeded(crate::catalog::bayesian_game(), seed);
            sim.start();
            sim.run_to_end(30);
            sim.results().to_vec()
        };
        assert_eq!(run(11), run(11));
    }
}
