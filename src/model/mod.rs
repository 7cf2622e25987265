//! Read-only description of a game instance.
//!
//! A model is supplied by an external registry or editor and is never mutated
//! by the engine. Consumers must tolerate malformed models: a missing or short
//! payoff entry means "skip this payoff", never a panic.
//!
//! - [`GameModel`]: players, payoff matrix, type and variant tags
//! - [`Player`] / [`PlayerType`]: strategy lists and hidden types
//! - [`PayoffMatrix`]: comma-joined strategy keys to payoff vectors
//! - [`GameType`]: information structure × timing
//! - [`Variant`] / [`Resolution`]: named game family and how it is played
//! - [`Rounds`]: recommended simulation length

mod game;
mod kind;
mod payoff;
mod player;
mod rounds;
mod variant;

pub use game::*;
pub use kind::*;
pub use payoff::*;
pub use player::*;
pub use rounds::*;
pub use variant::*;
