//! The player character
//!
//! Wraps the combat [`Entity`] with everything only the player has:
//! - Coins and a stacked inventory
//! - Equipped items, whose bonuses feed the entity's gear stats
//! - A preferred inventory sort order

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::catalog::{ContentCatalog, EquipSlot, ItemKind};
use crate::entity::Entity;

/// Item id to quantity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    items: BTreeMap<String, u32>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, id: &str, quantity: u32) {
        if quantity > 0 {
            *self.items.entry(id.to_string()).or_insert(0) += quantity;
        }
    }

    /// Remove `quantity`; fails without change if fewer are held
    pub fn remove(&mut self, id: &str, quantity: u32) -> bool {
        match self.items.get_mut(id) {
            Some(held) if *held >= quantity => {
                *held -= quantity;
                if *held == 0 {
                    self.items.remove(id);
                }
                true
            }
            _ => false,
        }
    }

    pub fn count(&self, id: &str) -> u32 {
        self.items.get(id).copied().unwrap_or(0)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.count(id) > 0
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.items.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, u32)> {
        self.items.iter().map(|(id, qty)| (id, *qty))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Inventory listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Name,
    Quantity,
    Value,
    Type,
}

impl FromStr for SortKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" | "alpha" => Ok(SortKey::Name),
            "quantity" | "qty" | "count" => Ok(SortKey::Quantity),
            "value" | "price" => Ok(SortKey::Value),
            "type" | "kind" => Ok(SortKey::Type),
            _ => Err(()),
        }
    }
}

/// The player: an entity plus belongings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub entity: Entity,
    pub coins: u32,
    pub inventory: Inventory,
    pub equipment: BTreeMap<EquipSlot, String>,
    #[serde(default)]
    pub sort: SortKey,
}

impl Player {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            coins: 0,
            inventory: Inventory::new(),
            equipment: BTreeMap::new(),
            sort: SortKey::Name,
        }
    }

    pub fn with_coins(mut self, coins: u32) -> Self {
        self.coins = coins;
        self
    }

    pub fn with_item(mut self, id: &str, quantity: u32) -> Self {
        self.inventory.add(id, quantity);
        self
    }

    /// Recompute gear bonuses from equipped items
    pub fn refresh_gear(&mut self, catalog: &dyn ContentCatalog) {
        let (mut attack, mut defense) = (0, 0);
        for id in self.equipment.values() {
            if let Some(ItemKind::Equipment {
                attack: a,
                defense: d,
                ..
            }) = catalog.resolve(id).map(|def| &def.kind)
            {
                attack += a;
                defense += d;
            }
        }
        self.entity.gear_attack = attack;
        self.entity.gear_defense = defense;
    }

    /// Equip an inventory item into its slot, swapping out any current item
    pub fn equip(&mut self, id: &str, catalog: &dyn ContentCatalog) -> Result<String, String> {
        let def = catalog
            .resolve(id)
            .ok_or_else(|| format!("You don't have {}.", id))?;
        let ItemKind::Equipment { slot, .. } = def.kind else {
            return Err(format!("You can't equip the {}.", def.name));
        };
        if !self.inventory.remove(id, 1) {
            return Err(format!("You don't have the {}.", def.name));
        }

        let message = match self.equipment.insert(slot, id.to_string()) {
            Some(previous) => {
                self.inventory.add(&previous, 1);
                format!(
                    "You swap the {} for the {}.",
                    catalog.display_name(&previous),
                    def.name
                )
            }
            None => format!("You equip the {} ({}).", def.name, slot),
        };
        self.refresh_gear(catalog);
        Ok(message)
    }

    /// Return the item in `slot` to the inventory
    pub fn unequip(&mut self, slot: EquipSlot, catalog: &dyn ContentCatalog) -> Result<String, String> {
        let id = self
            .equipment
            .remove(&slot)
            .ok_or_else(|| format!("You have nothing equipped on your {}.", slot))?;
        self.inventory.add(&id, 1);
        self.refresh_gear(catalog);
        Ok(format!("You unequip the {}.", catalog.display_name(&id)))
    }

    /// Slot holding the equipped item matching `query`
    pub fn equipped_slot(&self, query: &str, catalog: &dyn ContentCatalog) -> Option<EquipSlot> {
        let query = query.to_lowercase();
        self.equipment.iter().find_map(|(slot, id)| {
            let def = catalog.resolve(id)?;
            (def.matches_exact(&query) || def.matches_partial(&query)).then_some(*slot)
        })
    }

    /// Inventory lines in the preferred order
    pub fn inventory_listing(&self, catalog: &dyn ContentCatalog) -> String {
        let mut rows: Vec<(String, u32, u32, &'static str)> = self
            .inventory
            .iter()
            .map(|(id, qty)| match catalog.resolve(id) {
                Some(def) => (def.name.clone(), qty, def.value, def.kind.label()),
                None => (id.clone(), qty, 0, "unknown"),
            })
            .collect();

        match self.sort {
            SortKey::Name => rows.sort_by(|a, b| a.0.cmp(&b.0)),
            SortKey::Quantity => rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0))),
            SortKey::Value => rows.sort_by(|a, b| b.2.cmp(&a.2).then(a.0.cmp(&b.0))),
            SortKey::Type => rows.sort_by(|a, b| a.3.cmp(b.3).then(a.0.cmp(&b.0))),
        }

        let mut lines = vec![format!("Coins: {}", self.coins)];
        if rows.is_empty() {
            lines.push("You are carrying nothing.".to_string());
        }
        for (name, qty, _, _) in rows {
            if qty > 1 {
                lines.push(format!("  {} x{}", name, qty));
            } else {
                lines.push(format!("  {}", name));
            }
        }
        for (slot, id) in &self.equipment {
            lines.push(format!("  [{}] {}", slot, catalog.display_name(id)));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ItemDefinition, StaticCatalog};

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_item(
                ItemDefinition::new(
                    "iron-sword",
                    "Iron Sword",
                    ItemKind::Equipment {
                        slot: EquipSlot::Weapon,
                        attack: 3,
                        defense: 0,
                    },
                )
                .with_value(20),
            )
            .with_item(ItemDefinition::new(
                "steel-sword",
                "Steel Sword",
                ItemKind::Equipment {
                    slot: EquipSlot::Weapon,
                    attack: 5,
                    defense: 0,
                },
            ))
            .with_item(ItemDefinition::new(
                "iron-helmet",
                "Iron Helmet",
                ItemKind::Equipment {
                    slot: EquipSlot::Head,
                    attack: 0,
                    defense: 2,
                },
            ))
            .with_item(ItemDefinition::new("pebble", "Pebble", ItemKind::Misc).with_value(1))
    }

    fn hero() -> Player {
        Player::new(Entity::new("Hero", 30, 10, 5))
    }

    #[test]
    fn test_inventory_remove_requires_enough() {
        let mut inventory = Inventory::new();
        inventory.add("pebble", 2);
        assert!(!inventory.remove("pebble", 3));
        assert_eq!(inventory.count("pebble"), 2);
        assert!(inventory.remove("pebble", 2));
        assert!(!inventory.contains("pebble"));
        assert!(inventory.is_empty());
    }

    #[test]
    fn test_equip_applies_gear() {
        let catalog = catalog();
        let mut player = hero().with_item("iron-sword", 1).with_item("iron-helmet", 1);
        player.equip("iron-sword", &catalog).unwrap();
        player.equip("iron-helmet", &catalog).unwrap();
        assert_eq!(player.entity.effective_attack(), 13);
        assert_eq!(player.entity.effective_defense(), 7);
        assert!(player.inventory.is_empty());
    }

    #[test]
    fn test_equip_swaps_slot() {
        let catalog = catalog();
        let mut player = hero().with_item("iron-sword", 1).with_item("steel-sword", 1);
        player.equip("iron-sword", &catalog).unwrap();
        let message = player.equip("steel-sword", &catalog).unwrap();
        assert!(message.contains("swap"));
        assert!(player.inventory.contains("iron-sword"));
        assert_eq!(player.entity.gear_attack, 5);
    }

    #[test]
    fn test_equip_errors_leave_state() {
        let catalog = catalog();
        let mut player = hero().with_item("pebble", 1);
        assert!(player.equip("pebble", &catalog).is_err());
        assert!(player.equip("iron-sword", &catalog).is_err());
        assert!(player.unequip(EquipSlot::Head, &catalog).is_err());
        assert_eq!(player.inventory.count("pebble"), 1);
    }

    #[test]
    fn test_unequip_by_name() {
        let catalog = catalog();
        let mut player = hero().with_item("iron-helmet", 1);
        player.equip("iron-helmet", &catalog).unwrap();
        let slot = player.equipped_slot("helmet", &catalog).unwrap();
        assert_eq!(slot, EquipSlot::Head);
        player.unequip(slot, &catalog).unwrap();
        assert_eq!(player.entity.gear_defense, 0);
        assert!(player.inventory.contains("iron-helmet"));
    }

    #[test]
    fn test_listing_sort_by_value() {
        let catalog = catalog();
        let mut player = hero().with_item("pebble", 4).with_item("iron-sword", 1);
        player.sort = SortKey::Value;
        let listing = player.inventory_listing(&catalog);
        let sword = listing.find("Iron Sword").unwrap();
        let pebble = listing.find("Pebble").unwrap();
        assert!(sword < pebble);

        player.sort = SortKey::Quantity;
        let listing = player.inventory_listing(&catalog);
        assert!(listing.find("Pebble x4").unwrap() < listing.find("Iron Sword").unwrap());
    }
}
