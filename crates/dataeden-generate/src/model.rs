use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use dataeden_core::{ValueGrid, Warning};

/// Selects a generation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    Random,
    AiBulk,
}

impl EngineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Random => "random",
            EngineKind::AiBulk => "ai",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(EngineKind::Random),
            "ai" | "ai_bulk" | "ai-bulk" => Ok(EngineKind::AiBulk),
            other => Err(format!("unknown engine '{other}' (expected 'random' or 'ai')")),
        }
    }
}

/// Grid produced by an engine plus the recoverable events met on the way.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationOutcome {
    pub grid: ValueGrid,
    pub warnings: Vec<Warning>,
}

impl GenerationOutcome {
    pub fn new(grid: ValueGrid, warnings: Vec<Warning>) -> Self {
        Self { grid, warnings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_engine_names() {
        assert_eq!("Random".parse::<EngineKind>(), Ok(EngineKind::Random));
        assert_eq!("ai".parse::<EngineKind>(), Ok(EngineKind::AiBulk));
        assert!("reflection".parse::<EngineKind>().is_err());
    }
}
