//! Runtime configuration
//!
//! Layered with figment: built-in defaults, then an optional TOML file,
//! then `DELVE_`-prefixed environment variables (`DELVE_SEED=7`).

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::GameError;
use crate::game::GameMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Fixed RNG seed; None seeds from the OS
    pub seed: Option<u64>,
    /// Probability that fleeing succeeds
    pub flee_chance: f64,
    pub save_path: PathBuf,
    /// tracing filter used when RUST_LOG is unset
    pub log_filter: String,
    /// Mode to enter after startup
    pub start_mode: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            flee_chance: 0.5,
            save_path: PathBuf::from("delve-save.json"),
            log_filter: "delve=info".to_string(),
            start_mode: "title".to_string(),
        }
    }
}

impl Config {
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("DELVE_"))
    }

    pub fn load(path: Option<&Path>) -> Result<Self, figment::Error> {
        Self::figment(path).extract()
    }

    /// The configured start mode; an unknown name is an error
    pub fn start_mode(&self) -> Result<GameMode, GameError> {
        self.start_mode.parse()
    }
}
