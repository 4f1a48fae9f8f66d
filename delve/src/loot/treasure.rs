//! Locked treasure containers

use rand::Rng;
use thiserror::Error;

use super::{LootBundle, LootGenerator, Rarity};
use crate::catalog::{ContentCatalog, ItemDefinition, ItemKind};
use crate::player::Inventory;

/// Reasons a container stays shut
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnlockError {
    #[error("the {container} is locked; you need the {key}")]
    MissingKey { container: String, key: String },

    #[error("the {0} cannot be opened")]
    NotAContainer(String),
}

/// A container holding a loot roll of some rarity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreasureContainer {
    pub item_id: String,
    pub name: String,
    pub rarity: Rarity,
    pub required_key: Option<String>,
}

impl TreasureContainer {
    /// Read a container out of its item definition
    pub fn from_definition(def: &ItemDefinition) -> Result<Self, UnlockError> {
        match &def.kind {
            ItemKind::Treasure { rarity, key } => Ok(Self {
                item_id: def.id.clone(),
                name: def.name.clone(),
                rarity: *rarity,
                required_key: key.clone(),
            }),
            _ => Err(UnlockError::NotAContainer(def.name.clone())),
        }
    }

    /// Unlock with a key from `inventory` and roll the contents.
    /// Single-use keys are consumed; nothing changes on failure.
    pub fn unlock<R: Rng + ?Sized>(
        &self,
        inventory: &mut Inventory,
        catalog: &dyn ContentCatalog,
        generator: &LootGenerator,
        player_level: u32,
        rng: &mut R,
    ) -> Result<LootBundle, UnlockError> {
        if let Some(key) = &self.required_key {
            if !inventory.contains(key) {
                return Err(UnlockError::MissingKey {
                    container: self.name.clone(),
                    key: catalog.display_name(key),
                });
            }
            let single_use = matches!(
                catalog.resolve(key).map(|d| &d.kind),
                Some(ItemKind::Key { single_use: true })
            );
            if single_use {
                inventory.remove(key, 1);
            }
        }
        Ok(generator.generate(self.rarity, player_level, rng))
    }
}
