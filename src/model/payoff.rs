use crate::*;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Separator between strategy names in a payoff key.
pub const KEY_SEPARATOR: &str = ",";

/// Payoff lookup keyed by the comma-joined strategy combination.
///
/// Keys name one strategy per player in player order, e.g.
/// `"defect,cooperate"`. Values hold one payoff per player in the same order.
/// Entries shorter than the player count are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PayoffMatrix(BTreeMap<String, Vec<Utility>>);

impl PayoffMatrix {
    /// Joins one strategy name per player into a lookup key.
    pub fn key<S>(names: &[S]) -> String
    where
        S: AsRef<str>,
    {
        names
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }
    /// Adds an entry, returning self for chaining.
    pub fn with<S>(mut self, names: &[S], payoffs: &[Utility]) -> Self
    where
        S: AsRef<str>,
    {
        self.insert(names, payoffs);
        self
    }
    pub fn insert<S>(&mut self, names: &[S], payoffs: &[Utility])
    where
        S: AsRef<str>,
    {
        self.0.insert(Self::key(names), payoffs.to_vec());
    }
    /// Raw entry for a key, whatever its length.
    pub fn get(&self, key: &str) -> Option<&[Utility]> {
        self.0.get(key).map(Vec::as_slice)
    }
    /// Entry for a key, provided it carries at least `arity` payoffs.
    pub fn lookup(&self, key: &str, arity: usize) -> Option<&[Utility]> {
        self.get(key).filter(|payoffs| payoffs.len() >= arity)
    }
}

impl<S> FromIterator<(Vec<S>, Vec<Utility>)> for PayoffMatrix
where
    S: AsRef<str>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (Vec<S>, Vec<Utility>)>,
    {
        iter.into_iter()
            .fold(Self::default(), |matrix, (names, payoffs)| {
                matrix.with(&names, &payoffs)
            })
    }
}
