//! Presentation preferences and config loading
//!
//! Nothing here touches gameplay; balance lives in [`Tuning`].

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Presentation preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Reduced motion (no flyer tilt, static backdrop)
    pub reduced_motion: bool,
    /// Show the best score of this session under the final score (off by default)
    pub show_best: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            show_best: false,
        }
    }
}

/// Everything a host can override at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub tuning: Tuning,
    pub settings: Settings,
}

impl GameConfig {
    /// Parse a config blob; missing sections and fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut config: GameConfig = serde_json::from_str(json)?;
        config.tuning = config.tuning.sanitized();
        Ok(config)
    }

    /// Parse a config blob, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded game config");
                config
            }
            Err(e) => {
                log::warn!("Ignoring malformed game config: {}", e);
                Self::default()
            }
        }
    }
}
