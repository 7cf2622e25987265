use serde::Deserialize;
use serde::Serialize;

/// Information structure and timing of a game.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameType {
    /// Simultaneous moves, payoffs common knowledge.
    CompleteStatic,
    /// Sequential moves, payoffs common knowledge.
    CompleteDynamic,
    /// Simultaneous moves, hidden player types.
    IncompleteStatic,
    /// Sequential moves, hidden player types (signaling).
    IncompleteDynamic,
}

impl GameType {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::CompleteStatic | Self::CompleteDynamic)
    }
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::CompleteDynamic | Self::IncompleteDynamic)
    }
    pub fn name(&self) -> &'static str {
        match self {
            Self::CompleteStatic => "complete-static",
            Self::CompleteDynamic => "complete-dynamic",
            Self::IncompleteStatic => "incomplete-static",
            Self::IncompleteDynamic => "incomplete-dynamic",
        }
    }
}

impl TryFrom<&str> for GameType {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "complete-static" => Ok(Self::CompleteStatic),
            "complete-dynamic" => Ok(Self::CompleteDynamic),
            "incomplete-static" => Ok(Self::IncompleteStatic),
            "incomplete-dynamic" => Ok(Self::IncompleteDynamic),
            other => Err(anyhow::anyhow!("unknown game type: {}", other)),
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn parses_wire_names() {
        for kind in [
            GameType::CompleteStatic,
            GameType::CompleteDynamic,
            GameType::IncompleteStatic,
            GameType::IncompleteDynamic,
        ] {
            assert_eq!(GameType::try_from(kind.name()).unwrap(), kind);
        }
        assert!(GameType::try_from("cooperative").is_err());
    }
    #[test]
    fn serializes_kebab_case() {
        let json = serde_json::to_string(&GameType::IncompleteDynamic).unwrap();
        assert_eq!(json, "\"incomplete-dynamic\"");
    }
}
