use serde::Deserialize;
use serde::Serialize;

/// Recommended simulation length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rounds {
    pub min: usize,
    pub max: usize,
}

impl Rounds {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

