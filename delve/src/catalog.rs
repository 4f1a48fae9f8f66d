//! Content catalog
//!
//! Static item definitions the core consults by id. Lookups that miss are
//! treated as "item not found", never as errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::combat::{EffectKind, StatusEffect};
use crate::entity::Entity;
use crate::loot::Rarity;

/// Equipment slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    Head,
    Chest,
    Hands,
    Legs,
    Feet,
    Neck,
    Weapon,
}

impl EquipSlot {
    pub fn name(&self) -> &'static str {
        match self {
            EquipSlot::Head => "head",
            EquipSlot::Chest => "chest",
            EquipSlot::Hands => "hands",
            EquipSlot::Legs => "legs",
            EquipSlot::Feet => "feet",
            EquipSlot::Neck => "neck",
            EquipSlot::Weapon => "weapon",
        }
    }
}

impl std::fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Recipe for a status effect carried by content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectSpec {
    pub name: String,
    pub kind: EffectKind,
    pub strength: u32,
    pub duration: f64,
    #[serde(default = "default_tick_interval")]
    pub tick_interval: f64,
}

fn default_tick_interval() -> f64 {
    1.0
}

impl EffectSpec {
    pub fn new(name: &str, kind: EffectKind, strength: u32, duration: f64) -> Self {
        Self {
            name: name.to_string(),
            kind,
            strength,
            duration,
            tick_interval: default_tick_interval(),
        }
    }

    pub fn with_tick_interval(mut self, secs: f64) -> Self {
        self.tick_interval = secs;
        self
    }

    /// Build a live effect starting at `now`
    pub fn instantiate(&self, now: f64) -> StatusEffect {
        StatusEffect::new(&self.name, self.kind.clone(), self.strength, self.duration, now)
            .with_tick_interval(self.tick_interval)
    }
}

/// What a consumable does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ItemEffect {
    Heal { amount: i32 },
    Apply { spec: EffectSpec },
    /// Damages every living enemy; combat only
    Harm { amount: i32 },
    Cure { name: String },
}

/// Broad item categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    Consumable { effect: ItemEffect },
    Equipment { slot: EquipSlot, attack: i32, defense: i32 },
    Key { single_use: bool },
    Treasure { rarity: Rarity, key: Option<String> },
    Misc,
}

impl ItemKind {
    /// Label used for sorting and display
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Consumable { .. } => "consumable",
            ItemKind::Equipment { .. } => "equipment",
            ItemKind::Key { .. } => "key",
            ItemKind::Treasure { .. } => "treasure",
            ItemKind::Misc => "misc",
        }
    }
}

/// Static definition of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub kind: ItemKind,
    /// Base value in coins
    #[serde(default)]
    pub value: u32,
}

impl ItemDefinition {
    pub fn new(id: &str, name: &str, kind: ItemKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            aliases: Vec::new(),
            kind,
            value: 0,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_lowercase()).collect();
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = value;
        self
    }

    pub fn is_consumable(&self) -> bool {
        matches!(self.kind, ItemKind::Consumable { .. })
    }

    /// Exact match on id, name or alias (case-insensitive)
    pub fn matches_exact(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.id == query || self.name.to_lowercase() == query || self.aliases.iter().any(|a| *a == query)
    }

    /// Substring match on the display name
    pub fn matches_partial(&self, query: &str) -> bool {
        !query.is_empty() && self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Outcome of using an item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUse {
    pub success: bool,
    pub message: String,
}

impl ItemUse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Mutable state an item may touch when used
pub struct UseContext<'a> {
    pub user: &'a mut Entity,
    pub enemies: &'a mut [Entity],
    pub in_combat: bool,
    pub now: f64,
}

/// Resolves item ids to definitions
pub trait ContentCatalog: Send + Sync {
    fn resolve(&self, id: &str) -> Option<&ItemDefinition>;

    /// Use an item. The caller consumes consumables on success.
    fn use_item(&self, item: &ItemDefinition, ctx: &mut UseContext<'_>) -> ItemUse {
        apply_item(item, ctx)
    }

    /// Display name for an id, falling back to the id itself
    fn display_name(&self, id: &str) -> String {
        self.resolve(id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// Find the id among `ids` that `query` refers to.
/// Exact matches on id/name/alias win over name substrings.
pub fn find_item<'a, I>(catalog: &dyn ContentCatalog, query: &str, ids: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let ids: Vec<&String> = ids.into_iter().collect();
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let exact = ids.iter().find(|id| {
        **id == &query || catalog.resolve(id).is_some_and(|d| d.matches_exact(&query))
    });
    if let Some(id) = exact {
        return Some((*id).clone());
    }

    ids.iter()
        .find(|id| catalog.resolve(id).is_some_and(|d| d.matches_partial(&query)))
        .map(|id| (*id).clone())
}

/// Standard item behaviour
pub fn apply_item(item: &ItemDefinition, ctx: &mut UseContext<'_>) -> ItemUse {
    let effect = match &item.kind {
        ItemKind::Consumable { effect } => effect,
        ItemKind::Equipment { .. } => {
            return ItemUse::fail(format!("You should equip the {} instead.", item.name))
        }
        ItemKind::Key { .. } => {
            return ItemUse::fail(format!("Try to unlock something with the {}.", item.name))
        }
        ItemKind::Treasure { .. } => return ItemUse::fail(format!("Try opening the {}.", item.name)),
        ItemKind::Misc => return ItemUse::fail(format!("You can't use the {}.", item.name)),
    };

    match effect {
        ItemEffect::Heal { amount } => {
            if ctx.user.health >= ctx.user.max_health {
                return ItemUse::fail("You are already at full health.");
            }
            let healed = ctx.user.heal(*amount);
            ItemUse::ok(format!(
                "You use the {} and recover {} health.",
                item.name, healed
            ))
        }
        ItemEffect::Apply { spec } => {
            let outcome = ctx.user.apply_effect(spec.instantiate(ctx.now), ctx.now);
            match outcome.surfaced() {
                Some(message) => ItemUse::ok(format!("You use the {}. {}", item.name, message)),
                None if outcome.applied => ItemUse::ok(format!("You use the {}.", item.name)),
                None => ItemUse::fail(format!("The {} would have no effect.", item.name)),
            }
        }
        ItemEffect::Harm { amount } => {
            let living = ctx.enemies.iter().filter(|e| e.is_alive()).count();
            if !ctx.in_combat || living == 0 {
                return ItemUse::fail(format!("There is nothing to use the {} on.", item.name));
            }
            for enemy in ctx.enemies.iter_mut().filter(|e| e.is_alive()) {
                enemy.take_damage(*amount);
            }
            ItemUse::ok(format!(
                "The {} bursts, dealing {} damage to every enemy.",
                item.name, amount
            ))
        }
        ItemEffect::Cure { name } => match ctx.user.cure(name) {
            Some(outcome) => ItemUse::ok(format!(
                "You use the {}. {}",
                item.name,
                outcome.surfaced().unwrap_or_default()
            )),
            None => ItemUse::fail(format!("You are not affected by {}.", name)),
        },
    }
}

/// In-memory catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaticCatalog {
    items: BTreeMap<String, ItemDefinition>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: ItemDefinition) -> Self {
        self.insert(item);
        self
    }

    pub fn insert(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl ContentCatalog for StaticCatalog {
    fn resolve(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }
}
