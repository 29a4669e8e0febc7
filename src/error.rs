//! Errors surfaced to callers of the simulation

use std::fmt;

/// Errors from rejected commands or bad configuration
#[derive(Debug)]
pub enum GameError {
    /// Level selection outside the level table (levels are 1-based)
    LevelOutOfRange { requested: usize, available: usize },
    /// Settings parsed but failed validation
    InvalidSettings(String),
    /// Settings document was not valid JSON for [`crate::Settings`]
    SettingsParse(serde_json::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::LevelOutOfRange {
                requested,
                available,
            } => write!(
                f,
                "level {} does not exist (choose 1..={})",
                requested, available
            ),
            GameError::InvalidSettings(msg) => write!(f, "invalid settings: {}", msg),
            GameError::SettingsParse(e) => write!(f, "failed to parse settings: {}", e),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::SettingsParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GameError {
    fn from(e: serde_json::Error) -> Self {
        GameError::SettingsParse(e)
    }
}
