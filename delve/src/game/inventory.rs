//! Inventory mode: managing the pack and equipment

use std::sync::Arc;

use super::{exploration, Game, NOWHERE};
use crate::catalog::find_item;
use crate::commands::{parse_slot, Command, Verb};
use crate::player::SortKey;

pub(super) fn update(_game: &mut Game) {}

pub(super) fn command(game: &mut Game, cmd: &Command) -> Option<String> {
    let reply = match cmd.verb? {
        Verb::Inventory => game.player.inventory_listing(game.catalog.as_ref()),
        Verb::Look | Verb::Examine => match cmd.target() {
            Some(target) => exploration::examine(game, &target),
            None => game.player.inventory_listing(game.catalog.as_ref()),
        },
        Verb::Use => match cmd.target() {
            Some(query) => game.use_item(&query).message,
            None => "Use what?".to_string(),
        },
        Verb::Drop => drop_item(game, cmd),
        Verb::Equip => equip(game, cmd),
        Verb::Unequip => unequip(game, cmd),
        Verb::Sort => sort(game, cmd),
        Verb::Status => game.status_text(),
        Verb::Back => {
            game.return_to_previous();
            "You close your pack.".to_string()
        }
        _ => return None,
    };
    Some(reply)
}

/// Move one of an item from the pack to the floor
pub(super) fn drop_item(game: &mut Game, cmd: &Command) -> String {
    let Some(query) = cmd.target() else {
        return "Drop what?".to_string();
    };
    let catalog = Arc::clone(&game.catalog);
    let Some(id) = find_item(catalog.as_ref(), &query, game.player.inventory.ids()) else {
        return format!("You don't have any {}.", query);
    };
    let Some(room) = game.world.current_room_mut() else {
        return NOWHERE.to_string();
    };
    game.player.inventory.remove(&id, 1);
    room.items.add(&id, 1);
    format!("You drop the {}.", catalog.display_name(&id))
}

pub(super) fn equip(game: &mut Game, cmd: &Command) -> String {
    let Some(query) = cmd.target() else {
        return "Equip what?".to_string();
    };
    let catalog = Arc::clone(&game.catalog);
    let Some(id) = find_item(catalog.as_ref(), &query, game.player.inventory.ids()) else {
        return format!("You don't have any {}.", query);
    };
    match game.player.equip(&id, catalog.as_ref()) {
        Ok(message) | Err(message) => message,
    }
}

/// Unequip by slot name, slot alias or the equipped item's name
pub(super) fn unequip(game: &mut Game, cmd: &Command) -> String {
    let Some(query) = cmd.target() else {
        return "Unequip what?".to_string();
    };
    let catalog = Arc::clone(&game.catalog);
    let slot = parse_slot(&query).or_else(|| game.player.equipped_slot(&query, catalog.as_ref()));
    let Some(slot) = slot else {
        return format!("You are not wearing any {}.", query);
    };
    match game.player.unequip(slot, catalog.as_ref()) {
        Ok(message) | Err(message) => message,
    }
}

fn sort(game: &mut Game, cmd: &Command) -> String {
    let key = cmd
        .args
        .iter()
        .find(|a| a.as_str() != "by")
        .map(|a| a.parse::<SortKey>());
    match key {
        Some(Ok(key)) => {
            game.player.sort = key;
            game.player.inventory_listing(game.catalog.as_ref())
        }
        _ => "Sort by name, quantity, value or type.".to_string(),
    }
}
