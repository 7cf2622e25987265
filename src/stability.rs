//! Post-hoc stability, convergence and equilibrium classification.
//!
//! Everything here reads a results sequence without touching it, so
//! [`analyze`] is safe to call mid-run.
use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Point-in-time summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Dominant strategy name per player, `None` where there is none.
    pub dominant_strategies: BTreeMap<PlayerId, Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixed_equilibrium: Option<MixedEquilibrium>,
    pub convergence: bool,
    pub equilibrium_type: EquilibriumType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stability_analysis: Option<StabilityAnalysis>,
}

/// Payoff a seat realized in a record: the recorded value, else the matrix
/// value shifted by the seat's realized type.
fn realized(model: &GameModel, record: &SimulationResult, profile: &[Choice], seat: usize) -> Option<Utility> {
    let player = model.player(seat)?;
    record.payoff(&player.id).or_else(|| {
        let kind = record.realized_type(&player.id);
        model
            .payoff(profile, seat)
            .map(|u| u + player.bias(kind, profile[seat]))
    })
}

/// Best unilateral deviation payoff minus realized payoff, per player.
///
/// Opponents' choices are held at the record's profile and each player's
/// realized type bias applies to the deviation too. A player with no
/// alternative strategy gains 0. Records without a realized payoff for every
/// player have no gains.
pub fn deviation_gains(model: &GameModel, record: &SimulationResult) -> Option<BTreeMap<PlayerId, Utility>> {
    let profile = record.profile(model)?;
    let mut gains = BTreeMap::new();
    for (seat, player) in model.players().iter().enumerate() {
        let Some(current) = realized(model, record, &profile, seat) else {
            log::debug!(
                "[stability] {} step {}: no payoff for {}",
                model.id(),
                record.step,
                player.id
            );
            return None;
        };
        let kind = record.realized_type(&player.id);
        let best = (0..player.count())
            .filter(|&alt| alt != profile[seat])
            .filter_map(|alt| {
                let mut deviation = profile.clone();
                deviation[seat] = alt;
                model
                    .payoff(&deviation, seat)
                    .map(|u| u + player.bias(kind, alt))
            })
            .fold(None, |best: Option<Utility>, u| Some(best.map_or(u, |b| b.max(u))));
        gains.insert(player.id.clone(), best.map_or(0., |b| b - current));
    }
    Some(gains)
}

/// Deviation check at one record; stable iff no player gains by deviating.
pub fn stability_at(model: &GameModel, record: &SimulationResult) -> Option<StabilityAnalysis> {
    let deviation_gains = deviation_gains(model, record)?;
    Some(StabilityAnalysis {
        is_stable: deviation_gains.values().all(|&gain| gain <= 0.),
        deviation_gains,
    })
}

/// Whether a record is a pure Nash outcome.
pub fn is_nash(model: &GameModel, record: &SimulationResult) -> bool {
    stability_at(model, record)
        .map(|analysis| analysis.is_stable)
        .unwrap_or(false)
}

/// Whether the last `window` records exist and agree on every player's choice.
pub fn settled(results: &[SimulationResult], window: usize) -> bool {
    if window == 0 || results.len() < window {
        return false;
    }
    let recent = &results[results.len() - window..];
    recent
        .windows(2)
        .all(|pair| pair[0].player_choices == pair[1].player_choices)
}

/// At least `CONVERGENCE_WINDOW` records with identical recent choices.
pub fn convergence(results: &[SimulationResult]) -> bool {
    settled(results, CONVERGENCE_WINDOW)
}

/// Equilibrium concept the run is best described by.
pub fn classify(model: &GameModel, results: &[SimulationResult]) -> EquilibriumType {
    let resolution = model.resolution();
    if resolution == Resolution::Signaling || model.kind() == GameType::IncompleteDynamic {
        return EquilibriumType::Signaling;
    }
    if matches!(resolution, Resolution::Bayesian(_)) || model.kind() == GameType::IncompleteStatic {
        return EquilibriumType::Bayesian;
    }
    if model.variant() == Variant::Stackelberg {
        return EquilibriumType::Stackelberg;
    }
    if dominant_strategies(model).values().any(Option::is_some) {
        return EquilibriumType::DominantStrategy;
    }
    if resolution == Resolution::Mixing {
        return EquilibriumType::MixedStrategy;
    }
    if results.last().is_some_and(|record| is_nash(model, record)) {
        return EquilibriumType::Nash;
    }
    match mixed_equilibrium(model) {
        Some(_) => EquilibriumType::MixedStrategy,
        None => EquilibriumType::Unknown,
    }
}

/// Side-effect-free summary of `results` under `model`.
pub fn analyze(model: &GameModel, results: &[SimulationResult]) -> Analysis {
    let dominant_strategies = dominant_strategies(model)
        .into_iter()
        .map(|(id, choice)| {
            let name = choice
                .and_then(|c| model.players().iter().find(|p| p.id == id)?.strategy(c))
                .map(String::from);
            (id, name)
        })
        .collect();
    Analysis {
        dominant_strategies,
        mixed_equilibrium: mixed_equilibrium(model),
        convergence: convergence(results),
        equilibrium_type: classify(model, results),
        stability_analysis: results.last().and_then(|record| stability_at(model, record)),
    }
}
