//! Exploration mode: moving around and interacting with rooms

use std::sync::Arc;
use tracing::{info, warn};

use super::{dialogue, inventory, rest, shop, Game, GameMode, TransitionContext, NOWHERE};
use crate::catalog::{find_item, ItemKind};
use crate::commands::{Command, Verb};
use crate::history::Color;
use crate::loot::TreasureContainer;
use crate::world::Direction;

pub(super) fn update(_game: &mut Game) {}

pub(super) fn command(game: &mut Game, cmd: &Command) -> Option<String> {
    let reply = match cmd.verb? {
        Verb::Look => match cmd.target() {
            Some(target) => examine(game, &target),
            None => game.describe_room(),
        },
        Verb::Go => go(game, cmd),
        Verb::Take => take(game, cmd),
        Verb::Drop => inventory::drop_item(game, cmd),
        Verb::Inventory => {
            game.transition_to(GameMode::Inventory, TransitionContext::default());
            game.player.inventory_listing(game.catalog.as_ref())
        }
        Verb::Examine => match cmd.target() {
            Some(target) => examine(game, &target),
            None => "Examine what?".to_string(),
        },
        Verb::Attack => attack(game, cmd),
        Verb::Use => match cmd.target() {
            Some(query) => game.use_item(&query).message,
            None => "Use what?".to_string(),
        },
        Verb::Equip => inventory::equip(game, cmd),
        Verb::Unequip => inventory::unequip(game, cmd),
        Verb::Status => game.status_text(),
        Verb::Unlock => unlock(game, cmd),
        Verb::Open => match cmd.target() {
            Some(query) => open(game, &query),
            None => "Open what?".to_string(),
        },
        Verb::Talk => dialogue::begin(game, cmd),
        Verb::Shop | Verb::Buy | Verb::Sell | Verb::List => shop::enter(game),
        Verb::Rest => rest::enter(game),
        Verb::Menu => {
            game.transition_to(GameMode::Menu, TransitionContext::default());
            "Game paused. (save, load, resume, quit)".to_string()
        }
        Verb::Flee | Verb::Skill => "You are not in combat.".to_string(),
        Verb::Quit => {
            game.quit = true;
            "Farewell.".to_string()
        }
        _ => return None,
    };
    Some(reply)
}

fn go(game: &mut Game, cmd: &Command) -> String {
    let Some(direction) = cmd.direction() else {
        return "Go where?".to_string();
    };
    let Some(room) = game.room() else {
        return NOWHERE.to_string();
    };
    let to = match room.exits.get(&direction) {
        None => return "You can't go that way.".to_string(),
        Some(exit) if exit.locked => return format!("The way {} is locked.", direction),
        Some(exit) => exit.to.clone(),
    };
    if !game.world.set_current_room(&to) {
        warn!("exit {} leads to missing room {}", direction, to);
        return "That way leads nowhere.".to_string();
    }
    info!("moved {} to {}", direction, to);

    let description = game.describe_room();
    let ambushers: Vec<usize> = game
        .room()
        .map(|room| {
            room.enemies
                .iter()
                .enumerate()
                .filter(|(_, e)| e.is_alive() && e.aggressive)
                .map(|(i, _)| i)
                .collect()
        })
        .unwrap_or_default();
    if !ambushers.is_empty() {
        game.log("You are ambushed!", Some(Color::Red));
        game.transition_to(GameMode::Combat, TransitionContext::enemies(ambushers));
    }
    description
}

fn take(game: &mut Game, cmd: &Command) -> String {
    let Some(query) = cmd.target() else {
        return "Take what?".to_string();
    };
    let catalog = Arc::clone(&game.catalog);
    let Some(room) = game.world.current_room_mut() else {
        return NOWHERE.to_string();
    };
    let Some(id) = find_item(catalog.as_ref(), &query, room.items.ids()) else {
        return format!("There is no {} here.", query);
    };
    let quantity = room.items.count(&id);
    room.items.remove(&id, quantity);
    game.player.inventory.add(&id, quantity);

    let name = catalog.display_name(&id);
    match quantity {
        1 => format!("You take the {}.", name),
        n => format!("You take the {} (x{}).", name, n),
    }
}

/// Describe an item, enemy or person, looking at the pack first
pub(super) fn examine(game: &Game, query: &str) -> String {
    let catalog = game.catalog.as_ref();
    let carried = game
        .player
        .inventory
        .ids()
        .chain(game.player.equipment.values());
    let on_floor = game.room().map(|room| room.items.ids().collect::<Vec<_>>());
    let item = find_item(catalog, query, carried)
        .or_else(|| on_floor.and_then(|ids| find_item(catalog, query, ids)));
    if let Some(def) = item.as_deref().and_then(|id| catalog.resolve(id)) {
        return if def.description.is_empty() {
            format!("{} ({}).", def.name, def.kind.label())
        } else {
            format!("{}: {}", def.name, def.description)
        };
    }

    let Some(room) = game.room() else {
        return NOWHERE.to_string();
    };
    if let Some(enemy) = room.find_enemy(query).and_then(|i| room.enemies.get(i)) {
        return format!(
            "{}: {} {} {}/{}",
            enemy.name,
            enemy.description,
            super::health_bar(enemy.health_fraction()),
            enemy.health,
            enemy.max_health
        );
    }
    if let Some(npc) = room.find_npc(query).and_then(|i| room.npcs.get(i)) {
        return format!("{} looks like they have something to say.", npc.name);
    }
    format!("You see no {} here.", query)
}

fn attack(game: &mut Game, cmd: &Command) -> String {
    let Some(room) = game.room() else {
        return NOWHERE.to_string();
    };
    let living: Vec<usize> = room
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_alive())
        .map(|(i, _)| i)
        .collect();
    let target = match cmd.target() {
        Some(query) => match room.find_enemy(&query) {
            Some(i) => i,
            None => return format!("There is no {} here.", query),
        },
        None => match living.first() {
            Some(i) => *i,
            None => return "There is nothing here to attack.".to_string(),
        },
    };
    let name = room.enemies[target].name.clone();
    game.transition_to(GameMode::Combat, TransitionContext::enemies(living));
    format!("You engage the {}!", name)
}

fn unlock(game: &mut Game, cmd: &Command) -> String {
    let Some(target) = cmd.target() else {
        return "Unlock what?".to_string();
    };
    let Some(direction) = Direction::from_word(&target) else {
        return open(game, &target);
    };

    let catalog = Arc::clone(&game.catalog);
    let Some(room) = game.world.current_room_mut() else {
        return NOWHERE.to_string();
    };
    let Some(exit) = room.exits.get_mut(&direction) else {
        return format!("There is no way {}.", direction);
    };
    if !exit.locked {
        return format!("The way {} is not locked.", direction);
    }
    let Some(key) = exit.key.clone() else {
        return format!("The way {} cannot be unlocked.", direction);
    };
    if !game.player.inventory.contains(&key) {
        return format!(
            "You need the {} to unlock the way {}.",
            catalog.display_name(&key),
            direction
        );
    }

    exit.locked = false;
    let single_use = matches!(
        catalog.resolve(&key).map(|d| &d.kind),
        Some(ItemKind::Key { single_use: true })
    );
    let mut reply = format!(
        "You unlock the way {} with the {}.",
        direction,
        catalog.display_name(&key)
    );
    if single_use {
        game.player.inventory.remove(&key, 1);
        reply.push_str(" The key is used up.");
    }
    reply
}

/// Open a treasure container carried or lying in the room
fn open(game: &mut Game, query: &str) -> String {
    let catalog = Arc::clone(&game.catalog);
    let (id, on_floor) = match find_item(catalog.as_ref(), query, game.player.inventory.ids()) {
        Some(id) => (id, false),
        None => {
            let found = game
                .room()
                .and_then(|room| find_item(catalog.as_ref(), query, room.items.ids()));
            match found {
                Some(id) => (id, true),
                None => return format!("There is no {} here to open.", query),
            }
        }
    };
    let Some(def) = catalog.resolve(&id) else {
        return format!("There is no {} here to open.", query);
    };
    let container = match TreasureContainer::from_definition(def) {
        Ok(container) => container,
        Err(err) => return sentence(&err.to_string()),
    };

    let level = game.player.entity.level;
    let loot = match container.unlock(
        &mut game.player.inventory,
        catalog.as_ref(),
        &game.loot,
        level,
        &mut game.rng,
    ) {
        Ok(loot) => loot,
        Err(err) => return sentence(&err.to_string()),
    };

    if on_floor {
        if let Some(room) = game.world.current_room_mut() {
            room.items.remove(&id, 1);
        }
    } else {
        game.player.inventory.remove(&id, 1);
    }
    info!("opened {} ({})", container.item_id, container.rarity);
    let found = game.collect_loot(loot, false);
    if found.is_empty() {
        format!("You open the {}. It is empty.", container.name)
    } else {
        format!("You open the {} and find {}.", container.name, found)
    }
}

fn sentence(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}
