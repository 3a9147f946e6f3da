//! RON config files. Every section is optional, and every field inside a
//! section falls back to the generator's defaults, so a config only needs to
//! name the things it changes:
//!
//! ```ron
//! (
//!     waves: Some((pattern: Topographic, seed: 7)),
//!     letters: Some((sequence: ["p", "e", "n"], add_rectangles: true)),
//!     constellation: Some((layout: DiagonalGrid(cols: 5, rows: 10, keep: 0.5))),
//! )
//! ```
use crate::composition::CompositionParams;
use crate::constellation::ConstellationParams;
use crate::errors::ConfigError;
use crate::letters::LetterParams;
use crate::tree::TreeParams;
use crate::waves::WaveParams;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub hatch: Option<CompositionParams>,
    pub waves: Option<WaveParams>,
    pub tree: Option<TreeParams>,
    pub letters: Option<LetterParams>,
    pub constellation: Option<ConstellationParams>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        debug!("Loading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Config::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Config, ConfigError> {
        let config: Config = ron::from_str(text)?;
        if let Some(letters) = &config.letters {
            letters.validate()?;
        }
        Ok(config)
    }

    /// Hatch params from the file, or the defaults.
    pub fn hatch_params(&self) -> CompositionParams {
        self.hatch.clone().unwrap_or_default()
    }

    pub fn wave_params(&self) -> WaveParams {
        self.waves.clone().unwrap_or_default()
    }

    pub fn tree_params(&self) -> TreeParams {
        self.tree.clone().unwrap_or_default()
    }

    pub fn letter_params(&self) -> LetterParams {
        self.letters.clone().unwrap_or_default()
    }

    pub fn constellation_params(&self) -> ConstellationParams {
        self.constellation.clone().unwrap_or_default()
    }
}
