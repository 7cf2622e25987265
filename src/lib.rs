//! Round-by-round simulation of classic two-player games.
//!
//! A [`GameModel`] describes players, strategies and a payoff matrix. The
//! [`Simulation`] controller ticks through rounds, asking the [`Selector`]
//! for each player's choice, looking up realized payoffs, and stopping once
//! play settles into a Nash outcome or the round budget runs out.
//!
//! ## Module Structure
//!
//! - `model`: Game model, players, payoff matrix, game type and variant tags
//! - `catalog`: Built-in classic games
//! - `record`: Per-round simulation records
//! - `belief`: Empirical beliefs over opponent strategies
//! - `equilibrium`: Dominance, best response, mixed, backward induction, Bayesian
//! - `selector`: Strategy selection per resolution family
//! - `stability`: Deviation gains, convergence, point-in-time analysis
//! - `simulation`: Tick-driven state machine
//! - `driver`: Async periodic driver (feature `server`)

mod belief;
mod equilibrium;
mod model;
mod record;
mod selector;
mod simulation;
mod stability;

pub mod catalog;
#[cfg(feature = "server")]
pub mod driver;

pub use belief::*;
pub use equilibrium::*;
pub use model::*;
pub use record::*;
pub use selector::*;
pub use simulation::*;
pub use stability::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Realized payoffs, expected payoffs and deviation gains.
pub type Utility = f64;
/// Mixing weights, beliefs and type priors.
pub type Probability = f64;
/// Stable player identifier within a model.
pub type PlayerId = String;
/// Index into a player's ordered strategy list.
pub type Choice = usize;

// ============================================================================
// STRATEGY SELECTION
// ============================================================================
/// Probability of playing a detected dominant strategy rather than exploring.
pub const EXPLOITATION: Probability = 0.9;
/// Bernoulli parameter for the signaling sender's hidden type draw.
pub const SIGNALING_PRIOR: Probability = 0.5;
/// Type names assumed for a signaling sender that declares none.
pub const SIGNALING_TYPES: [&str; 2] = ["high", "low"];

// ============================================================================
// BELIEF UPDATING
// Laplace-style smoothing: p(s) = (n(s) + β) / (n + β·|S|).
// ============================================================================
/// Smoothing (β) added to every strategy count.
pub const BELIEF_SMOOTHING: Probability = 0.1;
/// Recent-history window for variants that forget old play.
pub const BELIEF_WINDOW: usize = 5;

// ============================================================================
// MIXED EQUILIBRIUM (2×2)
// Indifference solution, kept away from degenerate pure play.
// ============================================================================
/// Denominators with magnitude below this are treated as zero.
pub const DEGENERACY_EPSILON: f64 = 1e-10;
/// Lower bound on any mixing probability.
pub const MIXED_FLOOR: Probability = 0.3;
/// Upper bound on any mixing probability.
pub const MIXED_CEILING: Probability = 0.7;
/// Fallback when the exact solution is NaN or out of bounds.
pub const MIXED_DEFAULT: Probability = 0.5;

// ============================================================================
// TERMINATION AND CONVERGENCE
// ============================================================================
/// Identical-choice run length required before checking for a Nash stop.
pub const STABILITY_WINDOW: usize = 5;
/// Identical-choice run length that counts as converged.
pub const CONVERGENCE_WINDOW: usize = 10;
/// Default tick cadence of the periodic driver.
pub const TICK_CADENCE: std::time::Duration = std::time::Duration::from_secs(1);

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
