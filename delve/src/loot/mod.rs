//! Loot generation
//!
//! Rarity-tiered, weighted item drops plus a coin roll:
//! - Coins: uniform in the tier's range, plus `(level - 1) * U[1, cap]`
//! - Items: weighted draws from every tier at or below the requested one,
//!   with the requested tier's own weights doubled
//! - Special drop: one extra Bernoulli trial against the tier's special pool
//!
//! Generation is pure given its random source.

mod treasure;

pub use treasure::{TreasureContainer, UnlockError};

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

/// Key under which coins appear in a loot bundle
pub const COIN_KEY: &str = "coins";

/// Chance that a special roll also considers the tier below
pub const LOWER_TIER_SPECIAL_CHANCE: f64 = 0.3;

/// Item id (or [`COIN_KEY`]) to quantity
pub type LootBundle = BTreeMap<String, u32>;

/// Ordered rarity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// All tiers, lowest first
    pub fn all() -> &'static [Rarity] {
        &[
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::Epic,
            Rarity::Legendary,
        ]
    }

    /// The next tier down, if any
    pub fn below(&self) -> Option<Rarity> {
        match self {
            Rarity::Common => None,
            Rarity::Uncommon => Some(Rarity::Common),
            Rarity::Rare => Some(Rarity::Uncommon),
            Rarity::Epic => Some(Rarity::Rare),
            Rarity::Legendary => Some(Rarity::Epic),
        }
    }
}

impl FromStr for Rarity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            "epic" => Ok(Rarity::Epic),
            "legendary" => Ok(Rarity::Legendary),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        };
        write!(f, "{}", s)
    }
}

/// One weighted entry of a tier's item pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    pub weight: u32,
    /// Stackable items may be drawn more than once per roll
    #[serde(default)]
    pub stackable: bool,
}

impl LootEntry {
    pub fn new(item: &str, weight: u32) -> Self {
        Self {
            item: item.to_string(),
            weight,
            stackable: false,
        }
    }

    pub fn stackable(mut self) -> Self {
        self.stackable = true;
        self
    }
}

/// Tuning for one rarity tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierTable {
    /// Inclusive coin range
    pub coins: (u32, u32),
    /// Inclusive item count range
    pub item_count: (u32, u32),
    /// Upper bound of the per-level coin bonus
    pub level_bonus_cap: u32,
    /// Probability of the extra special drop
    pub special_chance: f64,
    #[serde(default)]
    pub items: Vec<LootEntry>,
    #[serde(default)]
    pub special: Vec<String>,
}

impl TierTable {
    pub fn new(coins: (u32, u32), item_count: (u32, u32)) -> Self {
        Self {
            coins,
            item_count,
            level_bonus_cap: 0,
            special_chance: 0.0,
            items: Vec::new(),
            special: Vec::new(),
        }
    }

    pub fn with_level_bonus(mut self, cap: u32) -> Self {
        self.level_bonus_cap = cap;
        self
    }

    pub fn with_item(mut self, entry: LootEntry) -> Self {
        self.items.push(entry);
        self
    }

    pub fn with_special(mut self, chance: f64, items: &[&str]) -> Self {
        self.special_chance = chance;
        self.special = items.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Loot tables for every tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LootTable {
    pub tiers: BTreeMap<Rarity, TierTable>,
}

impl LootTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tier(mut self, rarity: Rarity, table: TierTable) -> Self {
        self.tiers.insert(rarity, table);
        self
    }
}

/// Rolls loot bundles from a [`LootTable`]
#[derive(Debug, Clone, Default)]
pub struct LootGenerator {
    table: LootTable,
}

impl LootGenerator {
    pub fn new(table: LootTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &LootTable {
        &self.table
    }

    /// Roll a loot bundle for `tier` at `player_level`
    pub fn generate<R: Rng + ?Sized>(&self, tier: Rarity, player_level: u32, rng: &mut R) -> LootBundle {
        let mut bundle = LootBundle::new();
        let Some(table) = self.table.tiers.get(&tier) else {
            return bundle;
        };

        let coins = roll_range(rng, table.coins) + level_bonus(rng, player_level, table.level_bonus_cap);
        if coins > 0 {
            bundle.insert(COIN_KEY.to_string(), coins);
        }

        let count = roll_range(rng, table.item_count);
        let mut pool = self.item_pool(tier);
        for _ in 0..count {
            let Some(index) = pick_weighted(rng, pool.iter().map(|e| e.weight)) else {
                break;
            };
            *bundle.entry(pool[index].item.clone()).or_insert(0) += 1;
            if !pool[index].stackable {
                pool.remove(index);
            }
        }

        if table.special_chance > 0.0 && rng.random_bool(table.special_chance.min(1.0)) {
            if let Some(item) = self.roll_special(tier, rng) {
                *bundle.entry(item).or_insert(0) += 1;
            }
        }

        debug!("Rolled {} loot at level {}: {:?}", tier, player_level, bundle);
        bundle
    }

    /// Merged pool of every tier up to `tier`, own tier weighted double
    fn item_pool(&self, tier: Rarity) -> Vec<LootEntry> {
        let mut merged: BTreeMap<String, LootEntry> = BTreeMap::new();
        for (rarity, table) in self.table.tiers.range(..=tier) {
            let factor = if *rarity == tier { 2 } else { 1 };
            for entry in &table.items {
                let slot = merged.entry(entry.item.clone()).or_insert_with(|| LootEntry {
                    item: entry.item.clone(),
                    weight: 0,
                    stackable: false,
                });
                slot.weight += entry.weight * factor;
                slot.stackable |= entry.stackable;
            }
        }
        merged.into_values().filter(|e| e.weight > 0).collect()
    }

    fn roll_special<R: Rng + ?Sized>(&self, tier: Rarity, rng: &mut R) -> Option<String> {
        // Own items weigh 2, the tier below weighs 1 (half)
        let mut candidates: Vec<(&str, u32)> = self
            .table
            .tiers
            .get(&tier)
            .map(|t| t.special.iter().map(|s| (s.as_str(), 2)).collect())
            .unwrap_or_default();

        if let Some(lower) = tier.below().and_then(|r| self.table.tiers.get(&r)) {
            if rng.random_bool(LOWER_TIER_SPECIAL_CHANCE) {
                candidates.extend(lower.special.iter().map(|s| (s.as_str(), 1)));
            }
        }

        pick_weighted(rng, candidates.iter().map(|(_, w)| *w)).map(|i| candidates[i].0.to_string())
    }
}

fn roll_range<R: Rng + ?Sized>(rng: &mut R, (low, high): (u32, u32)) -> u32 {
    if high <= low {
        low
    } else {
        rng.random_range(low..=high)
    }
}

fn level_bonus<R: Rng + ?Sized>(rng: &mut R, level: u32, cap: u32) -> u32 {
    if level <= 1 || cap == 0 {
        return 0;
    }
    (level - 1) * rng.random_range(1..=cap)
}

/// Index of a weighted choice, or None if nothing has weight
fn pick_weighted<R: Rng + ?Sized>(rng: &mut R, weights: impl Iterator<Item = u32> + Clone) -> Option<usize> {
    let total: u32 = weights.clone().sum();
    if total == 0 {
        return None;
    }
    let mut roll = rng.random_range(0..total);
    for (index, weight) in weights.enumerate() {
        if roll < weight {
            return Some(index);
        }
        roll -= weight;
    }
    None
}
