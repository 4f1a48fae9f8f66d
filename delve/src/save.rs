//! Save files
//!
//! A save is the persisted shape of a game: current and previous mode,
//! the player with effect snapshots, the rooms and where the player is, the combat
//! session if one is running and the remaining skill cooldowns. Times
//! are stored as "seconds remaining" and re-based onto the clock of the
//! game that loads them.
//!
//! File format (JSON):
//! - `version`: format version
//! - `saved_at`: UTC timestamp
//! - `checksum`: hex SHA-256 of the `state` bytes exactly as written
//! - `state`: the snapshot itself, kept verbatim so the checksum covers
//!   the same bytes on load

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::combat::{Combatant, EffectKind, StatusEffect};
use crate::entity::Entity;
use crate::game::GameMode;
use crate::player::Player;
use crate::world::Room;

pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("save file is not valid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save file checksum mismatch")]
    Checksum,

    #[error("unsupported save version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
}

/// An active effect, with its remaining lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSnapshot {
    pub name: String,
    pub kind: EffectKind,
    pub strength: u32,
    pub remaining: f64,
    pub tick_interval: f64,
}

impl EffectSnapshot {
    pub fn capture(effect: &StatusEffect, now: f64) -> Self {
        Self {
            name: effect.name.clone(),
            kind: effect.kind.clone(),
            strength: effect.strength,
            remaining: effect.remaining(now),
            tick_interval: effect.tick_interval,
        }
    }

    pub fn revive(&self, now: f64) -> StatusEffect {
        let mut effect = StatusEffect::new(&self.name, self.kind.clone(), self.strength, self.remaining, now)
            .with_tick_interval(self.tick_interval);
        effect.rebase(self.remaining, now);
        effect
    }
}

/// An entity together with its effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub entity: Entity,
    #[serde(default)]
    pub effects: Vec<EffectSnapshot>,
}

impl EntitySnapshot {
    pub fn capture(entity: &Entity, now: f64) -> Self {
        Self {
            entity: entity.clone(),
            effects: entity
                .effects()
                .iter()
                .map(|e| EffectSnapshot::capture(e, now))
                .collect(),
        }
    }

    pub fn into_entity(self, now: f64) -> Entity {
        let mut entity = self.entity;
        entity.effects_mut().clear();
        for snapshot in &self.effects {
            entity.effects_mut().restore(snapshot.revive(now));
        }
        entity
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub enemies: Vec<EntitySnapshot>,
    pub order: Vec<Combatant>,
    pub current: usize,
}

/// Everything needed to resume a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub mode: GameMode,
    pub previous: Option<GameMode>,
    pub player: Player,
    #[serde(default)]
    pub player_effects: Vec<EffectSnapshot>,
    pub room: String,
    /// Room contents at save time
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub combat: Option<CombatSnapshot>,
    /// Skill name to seconds until ready
    #[serde(default)]
    pub cooldowns: BTreeMap<String, f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    saved_at: DateTime<Utc>,
    checksum: String,
    state: Box<RawValue>,
}

fn checksum(state: &str) -> String {
    hex::encode(Sha256::digest(state.as_bytes()))
}

/// Reads and writes checksummed save files
#[derive(Debug, Clone)]
pub struct SaveManager {
    path: PathBuf,
}

impl SaveManager {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, state: &GameSnapshot) -> Result<DateTime<Utc>, SaveError> {
        let saved_at = Utc::now();
        let state = serde_json::to_string(state)?;
        let file = SaveFile {
            version: SAVE_VERSION,
            saved_at,
            checksum: checksum(&state),
            state: RawValue::from_string(state)?,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec_pretty(&file)?)?;
        info!("saved game to {}", self.path.display());
        Ok(saved_at)
    }

    /// Load and verify a save
    pub fn load(&self) -> Result<GameSnapshot, SaveError> {
        let data = fs::read(&self.path)?;
        let file: SaveFile = serde_json::from_slice(&data)?;
        if file.version != SAVE_VERSION {
            return Err(SaveError::Version {
                found: file.version,
                expected: SAVE_VERSION,
            });
        }
        if checksum(file.state.get()) != file.checksum {
            return Err(SaveError::Checksum);
        }
        let state: GameSnapshot = serde_json::from_str(file.state.get())?;
        info!(
            "loaded game from {} (saved {})",
            self.path.display(),
            file.saved_at
        );
        Ok(state)
    }
}
