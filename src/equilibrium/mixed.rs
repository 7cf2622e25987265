//! Closed-form mixed equilibrium of 2×2 games.
//!
//! With row payoffs `a[i][j]` and column payoffs `b[i][j]`, the row player
//! mixes so the column player is indifferent and vice versa:
//!
//! ```text
//! p = (b11 - b10) / (b00 - b01 - b10 + b11)    row plays strategy 0
//! q = (a11 - a01) / (a00 - a01 - a10 + a11)    column plays strategy 0
//! ```
//!
//! Near-zero denominators fall back to a payoff comparison, and the result is
//! kept inside `[MIXED_FLOOR, MIXED_CEILING]` so simulated play never
//! collapses onto a pure strategy.
use super::*;
use serde::Deserialize;
use serde::Serialize;

/// Probabilities that each seat plays its first strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixedEquilibrium {
    pub p: Probability,
    pub q: Probability,
}

impl MixedEquilibrium {
    /// Probability that `seat` plays its first strategy.
    pub fn first(&self, seat: usize) -> Option<Probability> {
        match seat {
            0 => Some(self.p),
            1 => Some(self.q),
            _ => None,
        }
    }
    fn bounded(p: Probability) -> bool {
        !p.is_nan() && (MIXED_FLOOR..=MIXED_CEILING).contains(&p)
    }
    fn clamp(self) -> Self {
        Self {
            p: self.p.clamp(MIXED_FLOOR, MIXED_CEILING),
            q: self.q.clamp(MIXED_FLOOR, MIXED_CEILING),
        }
    }
}

/// Mixed equilibrium of a two-player game where both have exactly two strategies.
pub fn mixed_equilibrium(model: &GameModel) -> Option<MixedEquilibrium> {
    let (row, col) = model.duel()?;
    if row.count() != 2 || col.count() != 2 {
        return None;
    }
    let cell = |i: Choice, j: Choice| model.outcome(&[i, j]).map(|u| (u[0], u[1]));
    let (a00, b00) = cell(0, 0)?;
    let (a01, b01) = cell(0, 1)?;
    let (a10, b10) = cell(1, 0)?;
    let (a11, b11) = cell(1, 1)?;
    let p = indifference(b11 - b10, b00 - b01 - b10 + b11, b00 + b10 > b01 + b11);
    let q = indifference(a11 - a01, a00 - a01 - a10 + a11, a00 + a01 > a10 + a11);
    let mixed = MixedEquilibrium { p, q };
    if MixedEquilibrium::bounded(p) && MixedEquilibrium::bounded(q) {
        Some(mixed.clamp())
    } else {
        log::debug!(
            "[mixed] {} solved to p={:.4} q={:.4}, defaulting",
            model.id(),
            p,
            q
        );
        Some(MixedEquilibrium {
            p: MIXED_DEFAULT,
            q: MIXED_DEFAULT,
        })
    }
}

/// Solves one indifference condition, or leans by payoff comparison when
/// the condition has no unique solution.
fn indifference(numer: Utility, denom: Utility, leans_first: bool) -> Probability {
    if denom.abs() < DEGENERACY_EPSILON {
        if leans_first { MIXED_CEILING } else { MIXED_FLOOR }
    } else {
        numer / denom
    }
}
