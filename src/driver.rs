//! Periodic async driver and runtime settings.
//!
//! [`Driver::spawn`] moves a [`Simulation`] into its own tokio task. One
//! `select!` loop handles both requests and interval ticks, so a tick never
//! overlaps another tick or a command.
use crate::*;
use anyhow::Context;
use rand::Rng;
use rand::rngs::SmallRng;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::sync::oneshot;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio::time::Interval;
use tokio::time::MissedTickBehavior;

/// Environment variable holding the tick cadence, e.g. `250ms` or `2s`.
pub const CADENCE_VAR: &str = "SIMULATION_CADENCE";
/// Environment variable holding the selector seed.
pub const SEED_VAR: &str = "SIMULATION_SEED";

/// Runtime settings: defaults, then environment, then command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub cadence: Duration,
    pub seed: Option<u64>,
    pub rounds: Option<usize>,
    pub model: String,
    pub file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cadence: TICK_CADENCE,
            seed: None,
            rounds: None,
            model: String::from("prisoners-dilemma"),
            file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::default().overlay(|key| std::env::var(key).ok())
    }
    /// Applies variables found by `lookup` over these settings.
    pub fn overlay<F>(mut self, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cadence) = lookup(CADENCE_VAR) {
            self.cadence = parse_duration(&cadence)
                .with_context(|| format!("{}={} is not a duration", CADENCE_VAR, cadence))?;
        }
        if let Some(seed) = lookup(SEED_VAR) {
            self.seed = Some(
                seed.trim()
                    .parse()
                    .with_context(|| format!("{}={} is not a seed", SEED_VAR, seed))?,
            );
        }
        Ok(self)
    }
    /// The model named by these settings, from file or catalog.
    pub fn model(&self) -> anyhow::Result<GameModel> {
        match &self.file {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading model {}", path.display()))?;
                GameModel::from_json(&json).with_context(|| format!("parsing model {}", path.display()))
            }
            None => catalog::find(&self.model)
                .ok_or_else(|| anyhow::anyhow!("no built-in model {}", self.model)),
        }
    }
    /// A fresh simulation for these settings.
    pub fn simulation(&self) -> anyhow::Result<Simulation> {
        let selector = match self.seed {
            Some(seed) => Selector::seeded(seed),
            None => Selector::entropic(),
        };
        let simulation = Simulation::new(self.model()?, selector);
        Ok(match self.rounds {
            Some(rounds) => simulation.with_round_limit(rounds),
            None => simulation,
        })
    }
}

/// Parses durations like `250ms`, `30s`, `5m`, `2h`.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_digit())?;
    let (num, unit) = s.split_at(split);
    let value: u64 = num.parse().ok()?;
    match unit {
        "ms" => Some(Duration::from_millis(value)),
        "s" => Some(Duration::from_secs(value)),
        "m" => value.checked_mul(60).map(Duration::from_secs),
        "h" => value.checked_mul(3600).map(Duration::from_secs),
        _ => None,
    }
}

/// Messages accepted by a running [`Driver`].
#[derive(Debug)]
pub enum Request {
    Command(Command),
    Cadence(Duration),
    Snapshot(oneshot::Sender<Snapshot>),
    Shutdown,
}

/// Copy of the simulation state at one moment.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub step: usize,
    pub results: Vec<SimulationResult>,
}

/// Task owning a simulation and ticking it on an interval.
pub struct Driver<R = SmallRng>
where
    R: Rng,
{
    simulation: Simulation<R>,
    interval: Interval,
    requests: UnboundedReceiver<Request>,
    phase: watch::Sender<Phase>,
}

impl<R> Driver<R>
where
    R: Rng + Send + 'static,
{
    pub fn spawn(simulation: Simulation<R>, cadence: Duration) -> Handle<R> {
        let (tx, rx) = unbounded_channel();
        let (phase, watcher) = watch::channel(simulation.phase());
        let driver = Self {
            simulation,
            interval: Self::interval(Instant::now(), cadence),
            requests: rx,
            phase,
        };
        log::debug!(
            "[driver] {} ticking every {:?}",
            driver.simulation.model().id(),
            cadence
        );
        Handle {
            requests: tx,
            phase: watcher,
            task: tokio::spawn(driver.run()),
        }
    }
    /// Interval whose first tick fires at `start`.
    fn interval(start: Instant, cadence: Duration) -> Interval {
        let mut interval = tokio::time::interval_at(start, cadence.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        interval
    }
    async fn run(mut self) -> Simulation<R> {
        loop {
            tokio::select! {
                biased;
                request = self.requests.recv() => match request {
                    Some(Request::Command(command)) => {
                        let outcome = self.simulation.apply(command);
                        log::trace!("[driver] command -> {:?}", outcome);
                    }
                    Some(Request::Cadence(cadence)) => {
                        log::debug!("[driver] cadence now {:?}", cadence);
                        self.interval = Self::interval(Instant::now() + cadence, cadence);
                    }
                    Some(Request::Snapshot(reply)) => {
                        let _ = reply.send(self.snapshot());
                    }
                    Some(Request::Shutdown) | None => break,
                },
                _ = self.interval.tick() => {
                    self.simulation.tick();
                }
            }
            self.phase.send_replace(self.simulation.phase());
        }
        log::debug!("[driver] {} shut down", self.simulation.model().id());
        self.simulation
    }
    fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.simulation.phase(),
            step: self.simulation.current_step(),
            results: self.simulation.results().to_vec(),
        }
    }
}

/// Client side of a spawned [`Driver`].
pub struct Handle<R = SmallRng>
where
    R: Rng,
{
    requests: UnboundedSender<Request>,
    phase: watch::Receiver<Phase>,
    task: JoinHandle<Simulation<R>>,
}

impl<R> Handle<R>
where
    R: Rng,
{
    pub fn send(&self, request: Request) -> anyhow::Result<()> {
        self.requests
            .send(request)
            .map_err(|_| anyhow::anyhow!("driver has shut down"))
    }
    pub fn command(&self, command: Command) -> anyhow::Result<()> {
        self.send(Request::Command(command))
    }
    pub fn start(&self) -> anyhow::Result<()> {
        self.command(Command::Start)
    }
    pub fn stop(&self) -> anyhow::Result<()> {
        self.command(Command::Stop)
    }
    pub fn reset(&self) -> anyhow::Result<()> {
        self.command(Command::Reset)
    }
    pub fn load(&self, results: Vec<SimulationResult>) -> anyhow::Result<()> {
        self.command(Command::Load(results))
    }
    pub fn cadence(&self, cadence: Duration) -> anyhow::Result<()> {
        self.send(Request::Cadence(cadence))
    }
    pub async fn snapshot(&self) -> anyhow::Result<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Request::Snapshot(tx))?;
        Ok(rx.await?)
    }
    /// Waits until the simulation enters `phase`.
    pub async fn until(&mut self, phase: Phase) -> anyhow::Result<()> {
        self.phase.wait_for(|current| *current == phase).await?;
        Ok(())
    }
    /// Stops the driver and hands back the simulation.
    pub async fn shutdown(self) -> anyhow::Result<Simulation<R>> {
        let _ = self.requests.send(Request::Shutdown);
        Ok(self.task.await?)
    }
}
