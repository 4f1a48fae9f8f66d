//! Built-in demo content
//!
//! A village, a forest and some ruins. Enough to exercise every mode;
//! the binary runs it and the integration tests play through it.

use std::sync::Arc;

use crate::catalog::{EffectSpec, EquipSlot, ItemDefinition, ItemEffect, ItemKind, StaticCatalog};
use crate::combat::{DiceRoll, EffectKind, SkillBook, SkillPower, StandardSkill};
use crate::entity::Entity;
use crate::game::Game;
use crate::loot::{LootEntry, LootGenerator, LootTable, Rarity, TierTable};
use crate::player::Player;
use crate::world::{Direction, Exit, Npc, Room, World};

pub const START_ROOM: &str = "square";

fn consumable(id: &str, name: &str, effect: ItemEffect, value: u32) -> ItemDefinition {
    ItemDefinition::new(id, name, ItemKind::Consumable { effect }).with_value(value)
}

fn gear(id: &str, name: &str, slot: EquipSlot, attack: i32, defense: i32, value: u32) -> ItemDefinition {
    ItemDefinition::new(
        id,
        name,
        ItemKind::Equipment {
            slot,
            attack,
            defense,
        },
    )
    .with_value(value)
}

pub fn catalog() -> StaticCatalog {
    StaticCatalog::new()
        .with_item(
            consumable("healing-potion", "Healing Potion", ItemEffect::Heal { amount: 15 }, 10)
                .with_aliases(&["potion"])
                .with_description("A red draught that knits wounds."),
        )
        .with_item(consumable("bread", "Bread", ItemEffect::Heal { amount: 3 }, 2))
        .with_item(
            consumable(
                "antidote",
                "Antidote",
                ItemEffect::Cure {
                    name: "poison".to_string(),
                },
                8,
            )
            .with_description("Bitter herbs that purge venom."),
        )
        .with_item(consumable(
            "strength-tonic",
            "Strength Tonic",
            ItemEffect::Apply {
                spec: EffectSpec::new(
                    "strength",
                    EffectKind::Modifier {
                        attack: 3,
                        defense: 0,
                    },
                    1,
                    30.0,
                ),
            },
            12,
        ))
        .with_item(consumable("fire-bomb", "Fire Bomb", ItemEffect::Harm { amount: 8 }, 15))
        .with_item(gear("iron-sword", "Iron Sword", EquipSlot::Weapon, 3, 0, 20).with_aliases(&["sword"]))
        .with_item(gear("leather-armor", "Leather Armor", EquipSlot::Chest, 0, 2, 15))
        .with_item(gear("iron-helmet", "Iron Helmet", EquipSlot::Head, 0, 1, 8))
        .with_item(ItemDefinition::new(
            "small-key",
            "Small Key",
            ItemKind::Key { single_use: true },
        ))
        .with_item(ItemDefinition::new(
            "rusty-key",
            "Rusty Key",
            ItemKind::Key { single_use: false },
        ))
        .with_item(
            ItemDefinition::new(
                "old-chest",
                "Old Chest",
                ItemKind::Treasure {
                    rarity: Rarity::Uncommon,
                    key: Some("small-key".to_string()),
                },
            )
            .with_aliases(&["chest"]),
        )
        .with_item(ItemDefinition::new("wolf-pelt", "Wolf Pelt", ItemKind::Misc).with_value(6))
        .with_item(ItemDefinition::new("gold-ring", "Gold Ring", ItemKind::Misc).with_value(40))
        .with_item(ItemDefinition::new("silver-charm", "Silver Charm", ItemKind::Misc).with_value(60))
        .with_item(ItemDefinition::new("dragon-scale", "Dragon Scale", ItemKind::Misc).with_value(500))
}

pub fn world() -> World {
    World::new(START_ROOM)
        .with_room(
            Room::new(
                "square",
                "Village Square",
                "Cobblestones ring a dry fountain. The forest looms to the north.",
            )
            .with_exit(Direction::North, Exit::open("forest"))
            .with_exit(Direction::East, Exit::open("inn"))
            .with_exit(Direction::West, Exit::open("outfitters"))
            .with_item("bread", 2)
            .with_npc(Npc::new(
                "Old Mara",
                &[
                    "The forest to the north has grown dangerous.",
                    "Wolves, they say. And worse beneath the old ruins.",
                    "Take care, child.",
                ],
            )),
        )
        .with_room(
            Room::new("inn", "The Sleepy Boar", "A low-beamed common room that smells of stew.")
                .with_exit(Direction::West, Exit::open("square"))
                .with_inn(5, &["The innkeeper hums an old tune as you drift off."]),
        )
        .with_room(
            Room::new("outfitters", "Hilda's Outfitters", "Racks of blades and boiled leather.")
                .with_exit(Direction::East, Exit::open("square"))
                .with_shop(
                    "Hilda",
                    &[
                        ("healing-potion", 12),
                        ("antidote", 10),
                        ("iron-sword", 30),
                        ("leather-armor", 20),
                    ],
                ),
        )
        .with_room(
            Room::new("forest", "Dark Forest", "Pines crowd out the sky.")
                .with_exit(Direction::South, Exit::open("square"))
                .with_exit(Direction::North, Exit::open("clearing"))
                .with_item("small-key", 1)
                .with_enemy(
                    Entity::new("Grey Wolf", 14, 6, 1)
                        .with_description("Lean and hungry.")
                        .with_experience(30)
                        .with_loot(Rarity::Common),
                )
                .with_enemy(
                    Entity::new("Young Wolf", 10, 5, 0)
                        .with_description("Still more pup than predator.")
                        .with_experience(20),
                ),
        )
        .with_room(
            Room::new("clearing", "Moonlit Clearing", "Silver light falls on a mossy trapdoor.")
                .with_exit(Direction::South, Exit::open("forest"))
                .with_exit(Direction::Down, Exit::locked("ruins", "rusty-key"))
                .with_item("old-chest", 1)
                .with_item("rusty-key", 1),
        )
        .with_room(
            Room::new("ruins", "Sunken Ruins", "Broken columns drip in the dark.")
                .with_exit(Direction::Up, Exit::open("clearing"))
                .with_enemy(
                    Entity::new("Ruin Ghoul", 30, 9, 3)
                        .with_description("It smells of old graves.")
                        .with_initiative(1)
                        .with_experience(80)
                        .with_loot(Rarity::Rare)
                        .aggressive(),
                ),
        )
}

pub fn loot_table() -> LootTable {
    LootTable::new()
        .with_tier(
            Rarity::Common,
            TierTable::new((2, 8), (0, 2))
                .with_level_bonus(3)
                .with_item(LootEntry::new("bread", 5).stackable())
                .with_item(LootEntry::new("wolf-pelt", 3).stackable())
                .with_item(LootEntry::new("healing-potion", 2))
                .with_special(0.05, &["gold-ring"]),
        )
        .with_tier(
            Rarity::Uncommon,
            TierTable::new((5, 15), (1, 2))
                .with_level_bonus(5)
                .with_item(LootEntry::new("healing-potion", 3))
                .with_item(LootEntry::new("antidote", 2))
                .with_item(LootEntry::new("iron-helmet", 1))
                .with_special(0.1, &["silver-charm"]),
        )
        .with_tier(
            Rarity::Rare,
            TierTable::new((15, 40), (1, 3))
                .with_level_bonus(8)
                .with_item(LootEntry::new("strength-tonic", 2))
                .with_item(LootEntry::new("fire-bomb", 2))
                .with_item(LootEntry::new("leather-armor", 1))
                .with_special(0.2, &["gold-ring"]),
        )
        .with_tier(
            Rarity::Legendary,
            TierTable::new((50, 120), (2, 4))
                .with_level_bonus(12)
                .with_item(LootEntry::new("iron-sword", 1))
                .with_special(0.5, &["dragon-scale"]),
        )
}

pub fn skills() -> SkillBook {
    SkillBook::new()
        .with_skill(StandardSkill::new(
            "power strike",
            8.0,
            SkillPower::Strike { multiplier: 1.5 },
        ))
        .with_skill(StandardSkill::new(
            "firebolt",
            6.0,
            SkillPower::Dice {
                dice: DiceRoll::new(2, 6, 0),
            },
        ))
        .with_skill(StandardSkill::new(
            "venom strike",
            10.0,
            SkillPower::Inflict {
                spec: EffectSpec::new(
                    "poison",
                    EffectKind::Poison {
                        damage: 2,
                        message_cooldown: 10.0,
                    },
                    2,
                    9.0,
                )
                .with_tick_interval(3.0),
            },
        ))
        .with_skill(StandardSkill::new("mend", 20.0, SkillPower::Mend { amount: 10 }))
}

pub fn player() -> Player {
    Player::new(
        Entity::new("Hero", 30, 10, 5)
            .with_description("A wanderer with more courage than sense.")
            .with_initiative(1),
    )
    .with_coins(10)
    .with_item("healing-potion", 2)
}

/// The full demo game, on the title screen
pub fn game() -> Game {
    Game::new(world(), Arc::new(catalog()), player())
        .with_loot(LootGenerator::new(loot_table()))
        .with_skills(skills())
}
